//! Key-value persistence collaborator
//!
//! The history lives under a single key as one JSON blob, the same way the
//! browser extension keeps it in `chrome.storage.local`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Result;

/// Opaque string slots addressed by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `None` when it was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Volatile store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.slots.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
