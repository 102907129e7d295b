//! # KDP Core
//!
//! Learning-history engine for the Knowledge Decay Predictor. Tracks what a
//! user has studied on the web and estimates how much of it is still
//! remembered:
//!
//! - **Retention Model**: exponential forgetting curve, `R = 100 * 0.5^(t/h)`,
//!   with a half-life that shrinks as topic complexity grows
//! - **Analysis Normalizer**: parse-and-repair boundary for untrusted model
//!   output, plus a keyword heuristic when no model is reachable
//! - **History Store**: most-recent-first topic history with duplicate
//!   suppression, a 100-entry cap, restore, export and merge-by-id import
//! - **Classifier**: strong / review / forgotten buckets and aggregate stats
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kdp_core::{CaptureEvent, CapturePipeline, HistoryStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(HistoryStore::in_memory());
//! let pipeline = CapturePipeline::new(Arc::clone(&store));
//!
//! let outcome = pipeline
//!     .capture(CaptureEvent::new("Intro to Python", "https://example.com/py", "...", 120))
//!     .await?;
//!
//! let now = chrono::Utc::now().timestamp_millis();
//! let scored = kdp_core::score_entries(store.all().await?, now);
//! ```
//!
//! ## Feature Flags
//!
//! - `gemini` (default): remote analysis through the Gemini `generateContent` API
//! - `bundled-sqlite` (default): compile SQLite into the binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod analysis;
pub mod capture;
pub mod classify;
pub mod memory;
pub mod retention;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Data model
pub use memory::{
    CaptureEvent, LearningEntry, Subtopic, DEFAULT_COMPLEXITY, DEFAULT_DOMAIN, DEFAULT_SUMMARY,
    MAX_COMPLEXITY, MAX_CONCEPTS, MIN_COMPLEXITY, PLACEHOLDER_CONCEPT,
};

// Forgetting curve
pub use retention::{
    elapsed_hours, half_life_hours, hours_remaining, hours_until, retention, Decaying,
    DEFAULT_HALF_LIFE_HOURS, MS_PER_HOUR,
};

// Analysis boundary
pub use analysis::{
    build_prompt, extract_json_object, fallback_analysis, normalize, parse_analysis_text,
    AnalysisResult, AnalysisSource, Summarizer, SummarizerError,
};

#[cfg(feature = "gemini")]
pub use analysis::{GeminiConfig, GeminiSummarizer};

// Storage layer
pub use storage::{
    import_merge, insert_entry, is_duplicate, ExportSnapshot, HistoryStore, ImportError,
    ImportMode, ImportSummary, InsertOutcome, KeyValueStore, MemoryStore, Result, SqliteStore,
    StoreError, DEDUP_WINDOW_MS, EXPORT_VERSION, HISTORY_CAPACITY, HISTORY_KEY,
};

// Classification
pub use classify::{
    filter_entries, score_entries, score_subtopics, BucketFilter, HistoryStats, MemoryBucket,
    Scored, ScoredEntry, REVIEW_THRESHOLD, STRONG_THRESHOLD,
};

// Capture pipeline
pub use capture::{CaptureOutcome, CapturePipeline, CapturePolicy, DEFAULT_LEARNING_DOMAINS};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisResult, BucketFilter, CaptureEvent, CapturePipeline, HistoryStats, HistoryStore,
        ImportMode, InsertOutcome, LearningEntry, MemoryBucket, Result, ScoredEntry, StoreError,
    };
}
