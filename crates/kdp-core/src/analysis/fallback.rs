//! Heuristic fallback analysis
//!
//! Used when no summarizer is configured or the remote call fails. Derives
//! domain and complexity from keywords in the page title alone.

use super::AnalysisResult;
use crate::memory::{title_placeholder, DEFAULT_COMPLEXITY, DEFAULT_DOMAIN};

/// Maximum title characters used as the placeholder concept
pub const FALLBACK_CONCEPT_CHARS: usize = 50;

const PROGRAMMING_KEYWORDS: &[&str] = &["python", "javascript", "code"];
const MATHEMATICS_KEYWORDS: &[&str] = &["math", "calculus", "algebra"];
const STUDY_KEYWORDS: &[&str] = &["tutorial", "learn"];

/// Complexity assigned to titles in a recognized technical domain
const TECHNICAL_COMPLEXITY: u8 = 4;

/// Complexity assigned to tutorial-style titles outside a known domain
const STUDY_COMPLEXITY: u8 = 3;

fn mentions_any(title: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| title.contains(k))
}

/// Derive an analysis from the page title only
///
/// The output satisfies every normalizer invariant on its own.
pub fn fallback_analysis(title: &str) -> AnalysisResult {
    let lowered = title.to_lowercase();

    let (domain, complexity) = if mentions_any(&lowered, PROGRAMMING_KEYWORDS) {
        ("programming", TECHNICAL_COMPLEXITY)
    } else if mentions_any(&lowered, MATHEMATICS_KEYWORDS) {
        ("mathematics", TECHNICAL_COMPLEXITY)
    } else if mentions_any(&lowered, STUDY_KEYWORDS) {
        (DEFAULT_DOMAIN, STUDY_COMPLEXITY)
    } else {
        (DEFAULT_DOMAIN, DEFAULT_COMPLEXITY)
    };

    AnalysisResult {
        concepts: vec![title_placeholder(title)],
        summary: format!("Learning session: {}", title),
        complexity,
        domain: domain.to_string(),
    }
}
