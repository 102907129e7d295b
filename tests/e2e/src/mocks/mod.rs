//! Mocks and fixtures

mod backend;
mod fixtures;
mod summarizers;

pub use backend::FailingBackend;
pub use fixtures::{TestDataFactory, HOUR_MS};
pub use summarizers::{FailingSummarizer, ScriptedSummarizer, SlowSummarizer};
