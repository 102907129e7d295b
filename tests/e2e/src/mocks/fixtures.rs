//! Test Data Factory
//!
//! Generates learning entries and capture events:
//! - Single entries with chosen age and complexity
//! - Batches with unique URLs for capacity tests
//! - A decay scenario spanning every memory bucket

use chrono::Utc;
use kdp_core::{CaptureEvent, ExportSnapshot, LearningEntry};
use uuid::Uuid;

/// Milliseconds per hour
pub const HOUR_MS: i64 = 3_600_000;

/// Factory for creating test data
pub struct TestDataFactory;

impl TestDataFactory {
    /// Current time in milliseconds
    pub fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// A complete entry
    pub fn entry(title: &str, url: &str, learned_at: i64, complexity: u8) -> LearningEntry {
        LearningEntry {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            url: url.to_string(),
            time_spent: 90,
            learned_at,
            concepts: vec![title.to_lowercase()],
            summary: format!("Notes on {}", title),
            complexity,
            domain: "general".to_string(),
            subtopics: None,
        }
    }

    /// An entry with a fixed id
    pub fn entry_with_id(id: &str, learned_at: i64) -> LearningEntry {
        let mut entry = Self::entry(
            &format!("Topic {}", id),
            &format!("https://example.com/topics/{}", id),
            learned_at,
            3,
        );
        entry.id = id.to_string();
        entry
    }

    /// An entry learned `hours` before `now`
    pub fn entry_hours_ago(title: &str, complexity: u8, hours: f64, now: i64) -> LearningEntry {
        let learned_at = now - (hours * HOUR_MS as f64) as i64;
        let url = format!("https://example.com/{}", title.to_lowercase().replace(' ', "-"));
        Self::entry(title, &url, learned_at, complexity)
    }

    /// `count` entries with unique URLs, one minute apart, oldest first
    pub fn batch(count: usize, base_time: i64) -> Vec<LearningEntry> {
        (0..count)
            .map(|i| {
                Self::entry(
                    &format!("Batch topic {}", i),
                    &format!("https://example.com/batch/{}", i),
                    base_time + i as i64 * 60_000,
                    (i % 5) as u8 + 1,
                )
            })
            .collect()
    }

    /// One strong, one review and one forgotten entry at `now`
    ///
    /// Complexity 3 (36h half-life): 1h -> ~98%, 24h -> ~63%, 72h -> 25%.
    pub fn decay_scenario(now: i64) -> Vec<LearningEntry> {
        vec![
            Self::entry_hours_ago("Fresh topic", 3, 1.0, now),
            Self::entry_hours_ago("Fading topic", 3, 24.0, now),
            Self::entry_hours_ago("Forgotten topic", 3, 72.0, now),
        ]
    }

    /// A capture event at a fixed time with enough content to qualify
    pub fn capture_event(title: &str, url: &str, at: i64) -> CaptureEvent {
        let content = format!("{} ", title).repeat(40);
        CaptureEvent::new(title, url, content, 120).at(at)
    }

    /// Serialized export file holding `entries`
    pub fn export_json(entries: Vec<LearningEntry>) -> String {
        serde_json::to_string_pretty(&ExportSnapshot::new(entries, Utc::now()))
            .expect("snapshot serializes")
    }
}
