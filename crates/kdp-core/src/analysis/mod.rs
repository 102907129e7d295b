//! Analysis Module
//!
//! Turns a captured page into validated content fields:
//! - Summarizer collaborator (remote text model) producing untrusted JSON
//! - Balanced-span JSON extraction from free-form model output
//! - Parse-and-repair normalization into [`AnalysisResult`]
//! - Keyword heuristic used when the summarizer is missing or fails

mod extract;
mod fallback;
mod normalize;
mod summarizer;

#[cfg(feature = "gemini")]
mod gemini;

pub use extract::{extract_json_object, parse_analysis_text};
pub use fallback::{fallback_analysis, FALLBACK_CONCEPT_CHARS};
pub use normalize::{normalize, AnalysisResult};
pub(crate) use normalize::{normalize_complexity, normalize_string, string_items};
pub use summarizer::{build_prompt, Summarizer, SummarizerError, PROMPT_CONTENT_CHARS};

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiSummarizer, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

use serde::{Deserialize, Serialize};

/// Where the content fields of an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Remote summarizer output, normalized
    Summarizer,
    /// Local keyword heuristic
    Fallback,
}

impl AnalysisSource {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Summarizer => "summarizer",
            AnalysisSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
