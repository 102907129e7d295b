//! Summarizer doubles

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kdp_core::{Summarizer, SummarizerError};
use serde_json::Value;

/// Replays queued responses in order and records the titles it was asked about
///
/// Once the queue is empty every call fails with `NoJson`.
#[derive(Default)]
pub struct ScriptedSummarizer {
    responses: Mutex<VecDeque<Result<Value, SummarizerError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful raw analysis
    pub fn respond(self, raw: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(raw));
        self
    }

    /// Queue a failure
    pub fn fail(self, error: SummarizerError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Titles passed to `request_analysis`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_analysis(
        &self,
        title: &str,
        _content: &str,
        _time_spent_secs: u64,
    ) -> Result<Value, SummarizerError> {
        self.calls.lock().unwrap().push(title.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SummarizerError::NoJson))
    }
}

/// Always fails with a network error
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn request_analysis(&self, _: &str, _: &str, _: u64) -> Result<Value, SummarizerError> {
        Err(SummarizerError::Network("connection refused".into()))
    }
}

/// Answers with `raw` after `delay`
pub struct SlowSummarizer {
    pub delay: Duration,
    pub raw: Value,
}

#[async_trait]
impl Summarizer for SlowSummarizer {
    fn name(&self) -> &str {
        "slow"
    }

    async fn request_analysis(&self, _: &str, _: &str, _: u64) -> Result<Value, SummarizerError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.raw.clone())
    }
}
