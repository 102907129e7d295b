//! Learning Entry - The fundamental unit of history
//!
//! Each entry represents one study session on a web page with:
//! - Page identity (title, url)
//! - Model-derived content fields (concepts, summary, domain, complexity)
//! - The capture timestamp that anchors the forgetting curve

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{valid_complexity, valid_concepts, DEFAULT_COMPLEXITY, DEFAULT_DOMAIN, DEFAULT_SUMMARY};
use crate::analysis::{normalize_complexity, normalize_string, string_items, AnalysisResult};
use crate::retention::Decaying;

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_complexity() -> u8 {
    DEFAULT_COMPLEXITY
}

// Content fields of stored and imported entries follow the normalizer's rules:
// a value of the wrong type becomes the field default instead of an error.

fn lenient_complexity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_complexity(Some(&value)))
}

fn lenient_concepts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(string_items(Some(&value)))
}

fn lenient_summary<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_string(Some(&value), DEFAULT_SUMMARY))
}

fn lenient_domain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_string(Some(&value), DEFAULT_DOMAIN))
}

// ============================================================================
// LEARNING ENTRY
// ============================================================================

/// A learned topic in the history
///
/// Field names serialize in camelCase so that exported files match the
/// browser extension's storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEntry {
    /// Unique identifier, stable for the entry's lifetime
    pub id: String,
    /// Page title at capture time
    pub title: String,
    /// Page URL, also the duplicate-detection key
    pub url: String,
    /// Observed engagement in seconds (informational only)
    #[serde(default)]
    pub time_spent: u64,
    /// Capture time in milliseconds since the Unix epoch
    pub learned_at: i64,
    /// Key concepts (1-5)
    #[serde(default, deserialize_with = "lenient_concepts")]
    pub concepts: Vec<String>,
    /// Short summary of what was learned
    #[serde(default, deserialize_with = "lenient_summary")]
    pub summary: String,
    /// Complexity rating (1 = very simple, 5 = very complex)
    #[serde(default = "default_complexity", deserialize_with = "lenient_complexity")]
    pub complexity: u8,
    /// Knowledge domain (programming, mathematics, general, ...)
    #[serde(default = "default_domain", deserialize_with = "lenient_domain")]
    pub domain: String,
    /// Related captures grouped under this topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopics: Option<Vec<Subtopic>>,
}

impl LearningEntry {
    /// Build a new entry from a capture event and its (already normalized) analysis
    pub fn from_capture(event: &CaptureEvent, analysis: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: event.title.clone(),
            url: event.url.clone(),
            time_spent: event.time_spent,
            learned_at: event.timestamp,
            concepts: analysis.concepts,
            summary: analysis.summary,
            complexity: analysis.complexity,
            domain: analysis.domain,
            subtopics: None,
        }
    }

    /// Repair field-level invariants on entries that did not come through the
    /// normalizer (imported files, hand-edited backups).
    pub fn sanitize(&mut self) {
        let placeholder = title_placeholder(&self.title);
        self.complexity = valid_complexity(self.complexity);
        self.concepts = valid_concepts(std::mem::take(&mut self.concepts), &placeholder);
        if let Some(subtopics) = self.subtopics.as_mut() {
            for subtopic in subtopics.iter_mut() {
                subtopic.sanitize();
            }
        }
    }

    /// Number of subtopics grouped under this entry
    pub fn subtopic_count(&self) -> usize {
        self.subtopics.as_ref().map_or(0, Vec::len)
    }

    /// Reset the decay anchor, as if the topic had just been learned
    pub fn restore_at(&mut self, now_ms: i64) {
        self.learned_at = now_ms;
    }
}

impl Decaying for LearningEntry {
    fn complexity(&self) -> u8 {
        self.complexity
    }

    fn learned_at(&self) -> i64 {
        self.learned_at
    }
}

// ============================================================================
// SUBTOPIC
// ============================================================================

/// A capture grouped under a main topic
///
/// Same shape as [`LearningEntry`] minus `subtopics`, so nesting is exactly
/// one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub time_spent: u64,
    pub learned_at: i64,
    #[serde(default, deserialize_with = "lenient_concepts")]
    pub concepts: Vec<String>,
    #[serde(default, deserialize_with = "lenient_summary")]
    pub summary: String,
    #[serde(default = "default_complexity", deserialize_with = "lenient_complexity")]
    pub complexity: u8,
    #[serde(default = "default_domain", deserialize_with = "lenient_domain")]
    pub domain: String,
}

impl Subtopic {
    fn sanitize(&mut self) {
        let placeholder = title_placeholder(&self.title);
        self.complexity = valid_complexity(self.complexity);
        self.concepts = valid_concepts(std::mem::take(&mut self.concepts), &placeholder);
    }
}

/// Demotes an entry to a subtopic. Any subtopics of its own are dropped.
impl From<LearningEntry> for Subtopic {
    fn from(entry: LearningEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            url: entry.url,
            time_spent: entry.time_spent,
            learned_at: entry.learned_at,
            concepts: entry.concepts,
            summary: entry.summary,
            complexity: entry.complexity,
            domain: entry.domain,
        }
    }
}

impl Decaying for Subtopic {
    fn complexity(&self) -> u8 {
        self.complexity
    }

    fn learned_at(&self) -> i64 {
        self.learned_at
    }
}

/// Placeholder concept for an entry with no usable concepts: the title, cut
/// to the same length the fallback heuristic uses.
pub(crate) fn title_placeholder(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        super::PLACEHOLDER_CONCEPT.to_string()
    } else {
        trimmed
            .chars()
            .take(crate::analysis::FALLBACK_CONCEPT_CHARS)
            .collect()
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// A finished study session reported by the page tracker
///
/// Uses `deny_unknown_fields` so that a malformed capture message fails
/// loudly instead of silently dropping data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureEvent {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Extracted page text
    #[serde(default)]
    pub content: String,
    /// Seconds the page was visible
    #[serde(default)]
    pub time_spent: u64,
    /// When the session ended, in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl CaptureEvent {
    /// Create a capture event stamped with the current time
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        time_spent: u64,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            time_spent,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Override the capture timestamp
    pub fn at(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
