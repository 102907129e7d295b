//! Journey: history survives restarts and backend failures
//!
//! 1. Mutations on a SQLite-backed history are visible after reopening
//! 2. A failed write surfaces as a store error and changes nothing

use std::sync::Arc;

use kdp_core::{HistoryStore, InsertOutcome, KeyValueStore, StoreError, HISTORY_KEY};
use kdp_e2e_tests::harness::TestHistory;
use kdp_e2e_tests::mocks::{FailingBackend, TestDataFactory};

const T0: i64 = 1_717_243_200_000;

#[tokio::test]
async fn test_mutations_survive_reopen() {
    let history = TestHistory::new_temp();
    assert!(history.path().is_some());
    history.seed(TestDataFactory::batch(4, T0)).await;

    let ids = history.ids().await;
    history.store.delete(&ids[1]).await.unwrap();
    history.store.restore_memory_at(&ids[2], T0 + 86_400_000).await.unwrap();

    let reopened = history.reopen();
    let entries = reopened.all().await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.id != ids[1]));
    assert_eq!(reopened.get(&ids[2]).await.unwrap().unwrap().learned_at, T0 + 86_400_000);

    reopened.clear_all().await.unwrap();
    assert_eq!(history.reopen().len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_persisted_blob_uses_extension_format() {
    let history = TestHistory::in_memory();
    history.seed(vec![TestDataFactory::entry_with_id("a", T0)]).await;

    let backend_view = history.reopen();
    assert_eq!(backend_view.len().await.unwrap(), 1);

    let export = serde_json::to_value(history.store.all().await.unwrap()).unwrap();
    let first = &export[0];
    assert!(first.get("learnedAt").is_some());
    assert!(first.get("timeSpent").is_some());
    assert!(first.get("subtopics").is_none());
}

#[tokio::test]
async fn test_failed_write_is_reported_and_harmless() {
    let backend = Arc::new(FailingBackend::new());
    let history = TestHistory::with_backend(backend.clone());
    history.seed(TestDataFactory::batch(2, T0)).await;
    let before = history.store.all().await.unwrap();

    backend.set_fail_writes(true);
    let entry = TestDataFactory::entry("New topic", "https://example.com/new", T0 + 600_000, 2);
    assert!(matches!(history.store.insert(entry.clone()).await, Err(StoreError::Backend(_))));
    assert!(history.store.delete(&before[0].id).await.is_err());
    assert!(history.store.clear_all().await.is_err());
    assert_eq!(history.store.all().await.unwrap(), before);

    backend.set_fail_writes(false);
    assert_eq!(history.store.insert(entry).await.unwrap(), InsertOutcome::Inserted);
    assert_eq!(history.count().await, 3);
}

#[tokio::test]
async fn test_corrupt_slot_is_reported() {
    let backend = Arc::new(FailingBackend::new());
    backend.set(HISTORY_KEY, "not json".into()).await.unwrap();

    let store = HistoryStore::new(backend);
    assert!(matches!(store.all().await, Err(StoreError::Serialization(_))));
    assert!(store.insert(TestDataFactory::entry_with_id("a", T0)).await.is_err());
}

#[tokio::test]
async fn test_concurrent_captures_share_one_history() {
    let history = TestHistory::new_temp();
    let mut handles = Vec::new();

    for i in 0..16i64 {
        let pipeline = history.pipeline();
        handles.push(tokio::spawn(async move {
            let event = TestDataFactory::capture_event(
                &format!("Parallel lesson {}", i),
                &format!("https://www.edx.org/course/{}", i % 4),
                T0 + i,
            );
            pipeline.capture(event).await.unwrap().decision
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap() == InsertOutcome::Inserted {
            inserted += 1;
        }
    }

    // Four distinct URLs, all captures within the dedup window
    assert_eq!(inserted, 4);
    assert_eq!(history.reopen().len().await.unwrap(), 4);
}
