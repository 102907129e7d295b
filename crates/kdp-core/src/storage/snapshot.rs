//! Export / import file format
//!
//! ```json
//! { "version": "1.0", "exportDate": "2024-05-01T12:00:00.000Z", "totalTopics": 2, "data": [ ... ] }
//! ```

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;
use crate::memory::LearningEntry;

/// Format version written into every export
pub const EXPORT_VERSION: &str = "1.0";

// ============================================================================
// EXPORT
// ============================================================================

/// A portable copy of the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub version: String,
    /// ISO-8601 export time
    pub export_date: String,
    pub total_topics: usize,
    pub data: Vec<LearningEntry>,
}

impl ExportSnapshot {
    /// Snapshot `data` as of `at`
    pub fn new(data: Vec<LearningEntry>, at: DateTime<Utc>) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_topics: data.len(),
            data,
        }
    }

    /// Validate an import file and return its entries
    ///
    /// Only `data` is required. `version`, `exportDate` and `totalTopics`
    /// are informational and may be missing or stale.
    pub fn parse_entries(json: &str) -> Result<Vec<LearningEntry>, ImportError> {
        let mut root: Value = serde_json::from_str(json).map_err(ImportError::InvalidJson)?;

        if let Some(version) = root.get("version").and_then(Value::as_str) {
            if version != EXPORT_VERSION {
                tracing::debug!(version, "Importing snapshot with unknown version");
            }
        }

        let data = match root.get_mut("data") {
            None | Some(Value::Null) => return Err(ImportError::MissingData),
            Some(Value::Array(items)) => std::mem::take(items),
            Some(_) => return Err(ImportError::DataNotArray),
        };

        data.into_iter()
            .enumerate()
            .map(|(index, item)| {
                let mut entry: LearningEntry = serde_json::from_value(item)
                    .map_err(|source| ImportError::InvalidEntry { index, source })?;
                entry.sanitize();
                Ok(entry)
            })
            .collect()
    }
}

// ============================================================================
// IMPORT
// ============================================================================

/// How imported entries combine with the current history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Discard the current history and adopt the file's entries
    Replace,
    /// Keep current entries; file entries win on matching ids
    #[default]
    Merge,
}

impl ImportMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "replace" => Some(ImportMode::Replace),
            "merge" => Some(ImportMode::Merge),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s).ok_or_else(|| format!("Unknown import mode: {}", s))
    }
}

/// Result of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub mode: ImportMode,
    /// Entries read from the file
    pub incoming: usize,
    /// Entries in the history before the import
    pub previous: usize,
    /// Entries in the history after the import
    pub total: usize,
}

/// Import error type
///
/// Any of these leaves the persisted history untouched.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// File is not JSON at all
    #[error("Invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
    /// No `data` field
    #[error("Invalid file format: missing data")]
    MissingData,
    /// `data` is not an array
    #[error("Invalid file format: data is not an array")]
    DataNotArray,
    /// An element of `data` is not a learning entry
    #[error("Invalid entry at index {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    /// Reading or writing the history failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
