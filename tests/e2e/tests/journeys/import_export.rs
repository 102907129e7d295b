//! Journey: back up a history and restore it elsewhere
//!
//! 1. Export a history to a file
//! 2. Import it into another history (merge and replace)
//! 3. Reject malformed files without touching the target

use kdp_core::{ImportError, ImportMode, EXPORT_VERSION, HISTORY_CAPACITY};
use kdp_e2e_tests::harness::TestHistory;
use kdp_e2e_tests::mocks::TestDataFactory;
use tempfile::tempdir;

const T0: i64 = 1_717_243_200_000;

#[tokio::test]
async fn test_export_file_round_trip() {
    let source = TestHistory::new_temp();
    source.seed(TestDataFactory::batch(12, T0)).await;

    let snapshot = source.store.export().await.unwrap();
    assert_eq!(snapshot.version, EXPORT_VERSION);
    assert_eq!(snapshot.total_topics, 12);

    let dir = tempdir().unwrap();
    let file = dir.path().join("kdp-backup.json");
    std::fs::write(&file, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    let target = TestHistory::in_memory();
    let json = std::fs::read_to_string(&file).unwrap();
    let summary = target.store.import(&json, ImportMode::Merge).await.unwrap();
    assert_eq!(summary.total, 12);
    assert_eq!(target.store.all().await.unwrap(), source.store.all().await.unwrap());
}

#[tokio::test]
async fn test_merge_overwrites_matching_ids() {
    let history = TestHistory::in_memory();
    history
        .seed(vec![
            TestDataFactory::entry_with_id("1", T0 + 2),
            TestDataFactory::entry_with_id("2", T0 + 1),
        ])
        .await;

    let mut updated = TestDataFactory::entry_with_id("2", T0 + 1);
    updated.summary = "Revised notes".into();
    let file = TestDataFactory::export_json(vec![updated, TestDataFactory::entry_with_id("3", T0)]);

    history.store.import(&file, ImportMode::Merge).await.unwrap();

    let entries = history.store.all().await.unwrap();
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(entries[1].summary, "Revised notes");
}

#[tokio::test]
async fn test_replace_discards_current_history() {
    let history = TestHistory::in_memory();
    history.seed(TestDataFactory::batch(5, T0)).await;

    let file = TestDataFactory::export_json(vec![TestDataFactory::entry_with_id("only", T0)]);
    let summary = history.store.import(&file, ImportMode::Replace).await.unwrap();

    assert_eq!(summary.previous, 5);
    assert_eq!(summary.total, 1);
    assert_eq!(history.ids().await, vec!["only".to_string()]);
}

#[tokio::test]
async fn test_merge_respects_capacity() {
    let history = TestHistory::in_memory();
    history.seed(TestDataFactory::batch(70, T0)).await;

    let file = TestDataFactory::export_json(TestDataFactory::batch(70, T0 + 86_400_000));
    let summary = history.store.import(&file, ImportMode::Merge).await.unwrap();
    assert_eq!(summary.total, HISTORY_CAPACITY);

    let entries = history.store.all().await.unwrap();
    assert!(entries.windows(2).all(|w| w[0].learned_at >= w[1].learned_at));
    assert!(entries.iter().filter(|e| e.learned_at >= T0 + 86_400_000).count() == 70);
}

#[tokio::test]
async fn test_malformed_files_leave_history_untouched() {
    let history = TestHistory::in_memory();
    history.seed(TestDataFactory::batch(3, T0)).await;
    let before = history.store.all().await.unwrap();

    let cases = [
        ("{}", "missing data"),
        (r#"{"version": "1.0", "data": "nope"}"#, "data not array"),
        (r#"{"data": [{"title": "no id or url"}]}"#, "bad entry"),
        ("[1, 2, 3", "not json"),
    ];

    for (file, label) in cases {
        let result = history.store.import(file, ImportMode::Replace).await;
        assert!(result.is_err(), "{} should fail", label);
        assert_eq!(history.store.all().await.unwrap(), before, "{} touched history", label);
    }

    assert!(matches!(
        history.store.import("{}", ImportMode::Merge).await,
        Err(ImportError::MissingData)
    ));
}

#[tokio::test]
async fn test_imported_entries_are_repaired() {
    let history = TestHistory::in_memory();
    let file = serde_json::json!({
        "version": "1.0",
        "exportDate": "2024-06-01T12:00:00.000Z",
        "totalTopics": 1,
        "data": [{
            "id": "legacy",
            "title": "Ancient Rome",
            "url": "https://en.wikipedia.org/wiki/Ancient_Rome",
            "learnedAt": T0,
            "concepts": [],
            "complexity": 0
        }]
    });

    history.store.import(&file.to_string(), ImportMode::Merge).await.unwrap();
    let entry = history.store.get("legacy").await.unwrap().unwrap();
    assert_eq!(entry.complexity, 3);
    assert_eq!(entry.domain, "general");
    assert_eq!(entry.concepts, vec!["Ancient Rome".to_string()]);
}
