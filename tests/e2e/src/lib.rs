//! KDP end-to-end test support
//!
//! - `harness`: isolated history instances (in-memory or SQLite in a temp dir)
//! - `mocks`: test data factory, scripted summarizers, failing backends

pub mod harness;
pub mod mocks;
