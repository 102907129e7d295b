//! Persistence doubles

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use kdp_core::{KeyValueStore, MemoryStore, StoreError};

/// In-memory backend whose writes can be switched to fail
#[derive(Default)]
pub struct FailingBackend {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FailingBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.set(key, value).await
    }
}
