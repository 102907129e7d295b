//! Storage Module
//!
//! Persistence for the learning history:
//! - `KeyValueStore` trait, the opaque get/set collaborator
//! - In-memory and SQLite-backed implementations
//! - `HistoryStore`, the single owner of the ordered topic collection
//! - Export snapshots and import merge

mod history;
mod kv;
mod migrations;
mod snapshot;
mod sqlite;

pub use history::{
    import_merge, insert_entry, is_duplicate, HistoryStore, InsertOutcome, DEDUP_WINDOW_MS,
    HISTORY_CAPACITY, HISTORY_KEY,
};
pub use kv::{KeyValueStore, MemoryStore};
pub use migrations::MIGRATIONS;
pub use snapshot::{ExportSnapshot, ImportError, ImportMode, ImportSummary, EXPORT_VERSION};
pub use sqlite::{default_data_dir, SqliteStore, DB_FILE_NAME};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// A connection lock was poisoned by a panicking holder
    #[error("Lock poisoned: {0}")]
    Lock(String),
    /// Failure reported by a custom persistence backend
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;
