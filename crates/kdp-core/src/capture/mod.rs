//! Capture pipeline
//!
//! Capture event -> analysis (summarizer with timeout, or keyword fallback)
//! -> normalized entry -> [`HistoryStore::insert`].
//!
//! A summarizer failure never aborts a capture; only persistence errors
//! reach the caller.

mod policy;

pub use policy::{CapturePolicy, DEFAULT_LEARNING_DOMAINS};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::analysis::{
    fallback_analysis, normalize, AnalysisResult, AnalysisSource, Summarizer, SummarizerError,
};
use crate::memory::{CaptureEvent, LearningEntry};
use crate::storage::{HistoryStore, InsertOutcome, Result};

/// Default bound on a summarizer call
pub const DEFAULT_SUMMARIZER_TIMEOUT: Duration = Duration::from_secs(20);

/// Result of one capture
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutcome {
    /// The entry built from the event (not stored when skipped)
    pub entry: LearningEntry,
    pub decision: InsertOutcome,
    /// Where the content fields came from
    pub source: AnalysisSource,
}

/// Turns capture events into history entries
pub struct CapturePipeline {
    store: Arc<HistoryStore>,
    summarizer: Option<Arc<dyn Summarizer>>,
    timeout: Duration,
}

impl CapturePipeline {
    /// Pipeline without a summarizer; every capture uses the fallback
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self {
            store,
            summarizer: None,
            timeout: DEFAULT_SUMMARIZER_TIMEOUT,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    /// Analyze an event without storing anything
    pub async fn analyze(&self, event: &CaptureEvent) -> (AnalysisResult, AnalysisSource) {
        let Some(summarizer) = self.summarizer.as_ref() else {
            return (fallback_analysis(&event.title), AnalysisSource::Fallback);
        };

        match self.request_with_timeout(summarizer.as_ref(), event).await {
            Ok(raw) => (normalize(Some(&raw)), AnalysisSource::Summarizer),
            Err(e) => {
                tracing::warn!(
                    summarizer = summarizer.name(),
                    error = %e,
                    "Summarizer failed, using fallback analysis"
                );
                (fallback_analysis(&event.title), AnalysisSource::Fallback)
            }
        }
    }

    /// One summarizer call bounded by the pipeline timeout
    async fn request_with_timeout(
        &self,
        summarizer: &dyn Summarizer,
        event: &CaptureEvent,
    ) -> std::result::Result<Value, SummarizerError> {
        let request = summarizer.request_analysis(&event.title, &event.content, event.time_spent);
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| SummarizerError::Timeout(self.timeout))?
    }

    /// Analyze and store one capture event
    pub async fn capture(&self, event: CaptureEvent) -> Result<CaptureOutcome> {
        let (analysis, source) = self.analyze(&event).await;
        let entry = LearningEntry::from_capture(&event, analysis);

        let decision = self.store.insert(entry.clone()).await?;
        tracing::debug!(
            url = %entry.url,
            decision = %decision,
            source = %source,
            "Capture processed"
        );

        Ok(CaptureOutcome {
            entry,
            decision,
            source,
        })
    }
}
