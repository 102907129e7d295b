//! Capture qualification
//!
//! Decides whether a page visit counts as a study session. Applied by the
//! page tracker before a [`CaptureEvent`] is produced; the pipeline itself
//! accepts any event.

use serde::{Deserialize, Serialize};

use crate::memory::CaptureEvent;

/// URL fragments of sites treated as learning resources
pub const DEFAULT_LEARNING_DOMAINS: &[&str] = &[
    "youtube.com/watch",
    "coursera.org",
    "udemy.com",
    "khanacademy.org",
    "edx.org",
    "medium.com",
    "stackoverflow.com",
    "github.com",
    "wikipedia.org",
    "freecodecamp.org",
];

/// Thresholds a page visit must meet to be captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePolicy {
    /// A URL qualifies when it contains any of these fragments
    pub domains: Vec<String>,
    /// Minimum visible time, inclusive
    pub min_time_spent_secs: u64,
    /// Content must be strictly longer than this many characters
    pub min_content_chars: usize,
    /// Content is cut to this many characters before the length check
    pub max_content_chars: usize,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self {
            domains: DEFAULT_LEARNING_DOMAINS.iter().map(|d| d.to_string()).collect(),
            min_time_spent_secs: 30,
            min_content_chars: 100,
            max_content_chars: 3000,
        }
    }
}

impl CapturePolicy {
    pub fn is_learning_url(&self, url: &str) -> bool {
        self.domains.iter().any(|d| url.contains(d.as_str()))
    }

    /// Cap page text at `max_content_chars`, then trim whitespace
    pub fn trim_content(&self, content: &str) -> String {
        let capped: String = content.chars().take(self.max_content_chars).collect();
        capped.trim().to_string()
    }

    /// Apply the policy to a raw visit
    ///
    /// Returns the event to hand to the pipeline, with its content already
    /// trimmed, or `None` when the visit doesn't qualify.
    pub fn qualify(&self, mut event: CaptureEvent) -> Option<CaptureEvent> {
        if event.time_spent < self.min_time_spent_secs || !self.is_learning_url(&event.url) {
            return None;
        }
        event.content = self.trim_content(&event.content);
        if event.content.chars().count() <= self.min_content_chars {
            return None;
        }
        Some(event)
    }

    /// Whether a raw visit qualifies
    pub fn qualifies(&self, event: &CaptureEvent) -> bool {
        self.qualify(event.clone()).is_some()
    }
}
