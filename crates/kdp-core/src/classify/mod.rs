//! Classifier
//!
//! Buckets scored entries by retention:
//!
//! | Bucket      | Score        |
//! |-------------|--------------|
//! | strong      | >= 80        |
//! | review      | 50 .. 80     |
//! | forgotten   | < 50         |
//!
//! Scores are computed at display time and never stored.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::memory::{LearningEntry, Subtopic};
use crate::retention::Decaying;

/// Lowest score counted as strong
pub const STRONG_THRESHOLD: f64 = 80.0;

/// Lowest score counted as review (below is forgotten)
pub const REVIEW_THRESHOLD: f64 = 50.0;

// ============================================================================
// BUCKETS
// ============================================================================

/// Memory strength bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryBucket {
    Strong,
    Review,
    Forgotten,
}

impl MemoryBucket {
    /// Bucket for a retention score
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_THRESHOLD {
            MemoryBucket::Strong
        } else if score >= REVIEW_THRESHOLD {
            MemoryBucket::Review
        } else {
            MemoryBucket::Forgotten
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryBucket::Strong => "strong",
            MemoryBucket::Review => "review",
            MemoryBucket::Forgotten => "forgotten",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strong" => Some(MemoryBucket::Strong),
            "review" => Some(MemoryBucket::Review),
            "forgotten" => Some(MemoryBucket::Forgotten),
            _ => None,
        }
    }
}

impl std::fmt::Display for MemoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemoryBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s).ok_or_else(|| format!("Unknown memory bucket: {}", s))
    }
}

/// Filter selection: everything, or a single bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketFilter {
    #[default]
    All,
    Only(MemoryBucket),
}

impl BucketFilter {
    pub fn matches(&self, bucket: MemoryBucket) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Only(b) => *b == bucket,
        }
    }
}

impl std::fmt::Display for BucketFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketFilter::All => write!(f, "all"),
            BucketFilter::Only(b) => write!(f, "{}", b),
        }
    }
}

impl FromStr for BucketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(BucketFilter::All)
        } else {
            s.parse().map(BucketFilter::Only)
        }
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// An item paired with its retention score at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    /// Retention score in [0, 100]
    pub score: f64,
    pub bucket: MemoryBucket,
}

impl<T: Decaying> Scored<T> {
    pub fn new(item: T, now: i64) -> Self {
        let score = item.retention_at(now);
        Self {
            item,
            score,
            bucket: MemoryBucket::from_score(score),
        }
    }
}

/// A top-level entry with its score
pub type ScoredEntry = Scored<LearningEntry>;

/// Score every entry at `now`, preserving order
pub fn score_entries(entries: Vec<LearningEntry>, now: i64) -> Vec<ScoredEntry> {
    entries.into_iter().map(|e| Scored::new(e, now)).collect()
}

/// Score an entry's subtopics at `now`
pub fn score_subtopics(entry: &LearningEntry, now: i64) -> Vec<Scored<Subtopic>> {
    entry
        .subtopics
        .iter()
        .flatten()
        .cloned()
        .map(|s| Scored::new(s, now))
        .collect()
}

/// Keep the entries in the selected bucket, preserving relative order
pub fn filter_entries<T>(scored: Vec<Scored<T>>, filter: BucketFilter) -> Vec<Scored<T>> {
    scored
        .into_iter()
        .filter(|s| filter.matches(s.bucket))
        .collect()
}

// ============================================================================
// STATS
// ============================================================================

/// Aggregate view over the scored history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub strong: usize,
    pub review: usize,
    /// Entries below the review threshold (the "needs review" count)
    pub forgotten: usize,
    /// Mean score, 0 when empty
    pub average_score: f64,
}

impl HistoryStats {
    pub fn from_scored<T>(scored: &[Scored<T>]) -> Self {
        let mut stats = HistoryStats {
            total: scored.len(),
            ..Default::default()
        };
        if scored.is_empty() {
            return stats;
        }

        let mut sum = 0.0;
        for s in scored {
            sum += s.score;
            match s.bucket {
                MemoryBucket::Strong => stats.strong += 1,
                MemoryBucket::Review => stats.review += 1,
                MemoryBucket::Forgotten => stats.forgotten += 1,
            }
        }
        stats.average_score = sum / scored.len() as f64;
        stats
    }
}
