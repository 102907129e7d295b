//! History Store
//!
//! Owns the ordered topic collection (most-recent-first, at most
//! [`HISTORY_CAPACITY`] entries) persisted as one JSON blob under
//! [`HISTORY_KEY`]. Every read-modify-write runs under one writer lock so
//! duplicate suppression and the capacity cap hold with concurrent callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{
    ExportSnapshot, ImportError, ImportMode, ImportSummary, KeyValueStore, MemoryStore, Result,
};
use crate::memory::{LearningEntry, Subtopic};

/// Persistence key of the history blob
pub const HISTORY_KEY: &str = "learningHistory";

/// Maximum number of top-level entries kept
pub const HISTORY_CAPACITY: usize = 100;

/// Same-URL captures closer than this are duplicates (5 minutes)
pub const DEDUP_WINDOW_MS: i64 = 300_000;

// ============================================================================
// PURE COLLECTION OPERATIONS
// ============================================================================

/// What happened to an inserted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertOutcome {
    /// Entry was prepended to the history
    Inserted,
    /// Entry was a duplicate and the history is unchanged
    Skipped,
}

impl InsertOutcome {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertOutcome::Inserted => "inserted",
            InsertOutcome::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for InsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `candidate` duplicates a top-level entry
///
/// The time test is one-sided: `candidate.learned_at - existing.learned_at`
/// below the window. A candidate older than a stored capture of the same URL
/// yields a negative difference and is always a duplicate. An id already in
/// the collection is a duplicate too.
pub fn is_duplicate(existing: &[LearningEntry], candidate: &LearningEntry) -> bool {
    existing.iter().any(|e| {
        e.id == candidate.id
            || (e.url == candidate.url
                && candidate.learned_at.saturating_sub(e.learned_at) < DEDUP_WINDOW_MS)
    })
}

/// Prepend `entry` unless it is a duplicate, then trim to capacity
pub fn insert_entry(entries: &mut Vec<LearningEntry>, entry: LearningEntry) -> InsertOutcome {
    if is_duplicate(entries, &entry) {
        return InsertOutcome::Skipped;
    }
    entries.insert(0, entry);
    entries.truncate(HISTORY_CAPACITY);
    InsertOutcome::Inserted
}

/// Combine the current history with imported entries
///
/// `Replace` adopts `incoming`. `Merge` keys both sides by id, with incoming
/// records replacing existing ones whole. Either way the result has unique
/// ids (last occurrence wins), is ordered most-recent-first by `learned_at`
/// and is cut to [`HISTORY_CAPACITY`].
pub fn import_merge(
    existing: Vec<LearningEntry>,
    incoming: Vec<LearningEntry>,
    mode: ImportMode,
) -> Vec<LearningEntry> {
    let combined: Vec<LearningEntry> = match mode {
        ImportMode::Replace => incoming,
        ImportMode::Merge => existing.into_iter().chain(incoming).collect(),
    };

    let mut positions: HashMap<String, usize> = HashMap::with_capacity(combined.len());
    let mut merged: Vec<LearningEntry> = Vec::with_capacity(combined.len());
    for entry in combined {
        match positions.get(&entry.id) {
            Some(&pos) => merged[pos] = entry,
            None => {
                positions.insert(entry.id.clone(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged.sort_by(|a, b| b.learned_at.cmp(&a.learned_at));
    merged.truncate(HISTORY_CAPACITY);
    merged
}

// ============================================================================
// HISTORY STORE
// ============================================================================

/// The learning history, backed by a [`KeyValueStore`]
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Create a history over `backend`
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// History over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    async fn load(&self) -> Result<Vec<LearningEntry>> {
        match self.backend.get(HISTORY_KEY).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[LearningEntry]) -> Result<()> {
        let blob = serde_json::to_string(entries)?;
        self.backend.set(HISTORY_KEY, blob).await
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// All top-level entries, most recent first
    pub async fn all(&self) -> Result<Vec<LearningEntry>> {
        self.load().await
    }

    /// Top-level entry by id
    pub async fn get(&self, id: &str) -> Result<Option<LearningEntry>> {
        Ok(self.load().await?.into_iter().find(|e| e.id == id))
    }

    /// Number of top-level entries
    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    /// True when the history holds no top-level entries
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Insert a new entry with duplicate suppression
    pub async fn insert(&self, entry: LearningEntry) -> Result<InsertOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let url = entry.url.clone();
        let outcome = insert_entry(&mut entries, entry);
        match outcome {
            InsertOutcome::Inserted => {
                self.save(&entries).await?;
                tracing::info!(url = %url, total = entries.len(), "Learning entry stored");
            }
            InsertOutcome::Skipped => {
                tracing::debug!(url = %url, "Duplicate capture skipped");
            }
        }
        Ok(outcome)
    }

    /// Remove a top-level entry; `false` when no entry has that id
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }

        self.save(&entries).await?;
        tracing::info!(id, "Learning entry deleted");
        Ok(true)
    }

    /// Mark a topic as freshly reviewed (retention back to 100)
    pub async fn restore_memory(&self, id: &str) -> Result<Option<LearningEntry>> {
        self.restore_memory_at(id, Utc::now().timestamp_millis()).await
    }

    /// Reset `learned_at` of a top-level entry to `now_ms`
    ///
    /// No other field changes and the entry keeps its position.
    pub async fn restore_memory_at(&self, id: &str, now_ms: i64) -> Result<Option<LearningEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        entry.restore_at(now_ms);
        let restored = entry.clone();

        self.save(&entries).await?;
        tracing::info!(id, "Memory restored");
        Ok(Some(restored))
    }

    /// Empty the history, returning how many entries were removed
    pub async fn clear_all(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let removed = self.load().await?.len();
        self.save(&[]).await?;
        tracing::info!(removed, "History cleared");
        Ok(removed)
    }

    /// Move top-level `child_id` under top-level `parent_id` as a subtopic
    ///
    /// Returns the updated parent, or `None` when either id is missing or
    /// both are the same entry. The child's own subtopics are dropped.
    pub async fn attach_subtopic(
        &self,
        parent_id: &str,
        child_id: &str,
    ) -> Result<Option<LearningEntry>> {
        if parent_id == child_id {
            return Ok(None);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        if !entries.iter().any(|e| e.id == parent_id) {
            return Ok(None);
        }
        let Some(child_pos) = entries.iter().position(|e| e.id == child_id) else {
            return Ok(None);
        };

        let child = Subtopic::from(entries.remove(child_pos));
        let Some(parent) = entries.iter_mut().find(|e| e.id == parent_id) else {
            return Ok(None);
        };
        parent.subtopics.get_or_insert_with(Vec::new).push(child);
        let updated = parent.clone();

        self.save(&entries).await?;
        tracing::info!(parent_id, child_id, "Subtopic attached");
        Ok(Some(updated))
    }

    // ========================================================================
    // EXPORT / IMPORT
    // ========================================================================

    /// Snapshot the whole history
    pub async fn export(&self) -> Result<ExportSnapshot> {
        Ok(ExportSnapshot::new(self.load().await?, Utc::now()))
    }

    /// Import a snapshot file
    ///
    /// The file is validated completely before the history is touched.
    pub async fn import(
        &self,
        snapshot_json: &str,
        mode: ImportMode,
    ) -> std::result::Result<ImportSummary, ImportError> {
        let incoming = ExportSnapshot::parse_entries(snapshot_json)?;
        let incoming_count = incoming.len();

        let _guard = self.write_lock.lock().await;
        let existing = self.load().await?;
        let previous = existing.len();

        let merged = import_merge(existing, incoming, mode);
        self.save(&merged).await?;

        tracing::info!(
            mode = %mode,
            incoming = incoming_count,
            previous,
            total = merged.len(),
            "History imported"
        );

        Ok(ImportSummary {
            mode,
            incoming: incoming_count,
            previous,
            total: merged.len(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
