//! Summarizer collaborator
//!
//! A remote text model that reads a captured page and answers with a JSON
//! object `{concepts, summary, complexity, domain}`. The answer is returned
//! raw; callers must pass it through [`super::normalize`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Page content characters included in the prompt
pub const PROMPT_CONTENT_CHARS: usize = 2000;

/// Summarizer error type
///
/// None of these reach the end user; the capture pipeline logs them and
/// falls back to the keyword heuristic.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    /// Transport failure (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),
    /// Endpoint answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// No answer within the allotted time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// Response body or embedded JSON could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// Response text contained no JSON object
    #[error("No JSON object found in response")]
    NoJson,
}

/// Remote analysis of a captured page
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Analyze a page; the returned value is untrusted
    async fn request_analysis(
        &self,
        title: &str,
        content: &str,
        time_spent_secs: u64,
    ) -> Result<Value, SummarizerError>;
}

/// Build the analysis prompt sent to the model
pub fn build_prompt(title: &str, content: &str, time_spent_secs: u64) -> String {
    let excerpt: String = content.chars().take(PROMPT_CONTENT_CHARS).collect();

    format!(
        r#"You are a cognitive learning expert. Analyze this learning content and return a JSON response.

Content Title: {title}
Content: {excerpt}
Time Spent: {time_spent_secs} seconds

Return ONLY a valid JSON object with this exact structure (no markdown, no extra text):
{{
  "concepts": ["concept1", "concept2", "concept3"],
  "summary": "2-3 sentence summary of what was learned",
  "complexity": 3,
  "domain": "programming"
}}

Complexity scale:
1 = Very Simple (basic facts)
2 = Simple (straightforward concepts)
3 = Moderate (requires understanding)
4 = Complex (multiple interconnected ideas)
5 = Very Complex (abstract/advanced concepts)

Extract 3-5 key concepts maximum."#
    )
}
