//! Memory module - Core types and data structures
//!
//! - Learning entries (one per captured study session)
//! - One level of subtopics grouped under a main topic
//! - Capture events handed over by the page tracker

mod entry;

pub use entry::{CaptureEvent, LearningEntry, Subtopic};
pub(crate) use entry::title_placeholder;

// ============================================================================
// FIELD DEFAULTS
// ============================================================================

/// Maximum number of concepts kept per entry
pub const MAX_CONCEPTS: usize = 5;

/// Lowest valid complexity rating
pub const MIN_COMPLEXITY: u8 = 1;

/// Highest valid complexity rating
pub const MAX_COMPLEXITY: u8 = 5;

/// Complexity used when the rating is missing or out of range
pub const DEFAULT_COMPLEXITY: u8 = 3;

/// Domain used when none could be determined
pub const DEFAULT_DOMAIN: &str = "general";

/// Summary used when none could be determined
pub const DEFAULT_SUMMARY: &str = "Learning session";

/// Concept used when the concept list is empty or unusable
pub const PLACEHOLDER_CONCEPT: &str = "General Topic";

/// Returns `complexity` when it is a valid 1-5 rating, otherwise the default
pub(crate) fn valid_complexity(complexity: u8) -> u8 {
    if (MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&complexity) {
        complexity
    } else {
        DEFAULT_COMPLEXITY
    }
}

/// Keeps at most [`MAX_CONCEPTS`] non-blank concepts, falling back to a placeholder
pub(crate) fn valid_concepts<I>(concepts: I, placeholder: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let kept: Vec<String> = concepts
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .take(MAX_CONCEPTS)
        .collect();

    if kept.is_empty() {
        vec![placeholder.to_string()]
    } else {
        kept
    }
}
