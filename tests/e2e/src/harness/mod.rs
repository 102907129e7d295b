//! Test harness

mod history_manager;

pub use history_manager::TestHistory;
