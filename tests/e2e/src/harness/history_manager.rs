//! Test History Manager
//!
//! Provides isolated history instances for testing:
//! - Volatile histories over a `MemoryStore`
//! - SQLite-backed histories in a temporary directory, cleaned up on drop
//! - Reopening the same persisted slot to check durability

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kdp_core::{
    CapturePipeline, HistoryStore, KeyValueStore, LearningEntry, MemoryStore, SqliteStore,
    Summarizer,
};
use tempfile::TempDir;

/// Manager for test histories
///
/// # Example
///
/// ```rust,ignore
/// let history = TestHistory::new_temp();
/// history.pipeline().capture(event).await?;
///
/// // Fresh store over the same database file
/// let reopened = history.reopen();
/// ```
pub struct TestHistory {
    /// The history under test
    pub store: Arc<HistoryStore>,
    backend: Arc<dyn KeyValueStore>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    db_path: Option<PathBuf>,
}

impl TestHistory {
    /// Volatile history
    pub fn in_memory() -> Self {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Self {
            store: Arc::new(HistoryStore::new(Arc::clone(&backend))),
            backend,
            _temp_dir: None,
            db_path: None,
        }
    }

    /// SQLite-backed history in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_kdp.db");

        let backend: Arc<dyn KeyValueStore> =
            Arc::new(SqliteStore::new(Some(db_path.clone())).expect("Failed to create test store"));

        Self {
            store: Arc::new(HistoryStore::new(Arc::clone(&backend))),
            backend,
            _temp_dir: Some(temp_dir),
            db_path: Some(db_path),
        }
    }

    /// History over a caller-supplied backend
    pub fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: Arc::new(HistoryStore::new(Arc::clone(&backend))),
            backend,
            _temp_dir: None,
            db_path: None,
        }
    }

    /// Database file, for SQLite-backed histories
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// A new `HistoryStore` over the same persisted state
    ///
    /// SQLite histories open a fresh connection to the database file.
    pub fn reopen(&self) -> HistoryStore {
        match &self.db_path {
            Some(path) => HistoryStore::new(Arc::new(
                SqliteStore::new(Some(path.clone())).expect("Failed to reopen test store"),
            )),
            None => HistoryStore::new(Arc::clone(&self.backend)),
        }
    }

    /// Capture pipeline without a summarizer
    pub fn pipeline(&self) -> CapturePipeline {
        CapturePipeline::new(Arc::clone(&self.store))
    }

    /// Capture pipeline with `summarizer`
    pub fn pipeline_with(&self, summarizer: Arc<dyn Summarizer>) -> CapturePipeline {
        self.pipeline().with_summarizer(summarizer)
    }

    // ========================================================================
    // SEEDING / INSPECTION
    // ========================================================================

    /// Insert entries oldest-first so the newest ends up on top
    ///
    /// Returns the number actually inserted.
    pub async fn seed(&self, mut entries: Vec<LearningEntry>) -> usize {
        entries.sort_by_key(|e| e.learned_at);
        let mut inserted = 0;
        for entry in entries {
            if self.store.insert(entry).await.expect("seed insert failed")
                == kdp_core::InsertOutcome::Inserted
            {
                inserted += 1;
            }
        }
        inserted
    }

    /// Ids in history order
    pub async fn ids(&self) -> Vec<String> {
        self.store
            .all()
            .await
            .expect("read failed")
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    /// Number of top-level entries
    pub async fn count(&self) -> usize {
        self.store.len().await.expect("read failed")
    }
}
