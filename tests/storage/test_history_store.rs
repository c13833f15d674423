// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! History store tests: persistence across instances, concurrent appends,
//! on-disk format

use fabstir_vision_node::detection::{new_result_id, DetectionResult};
use fabstir_vision_node::storage::{HistoryStore, ResultsLayout, StoreError};
use fabstir_vision_node::vision::{BoundingBox, Detection};

fn result(layout: &ResultsLayout) -> DetectionResult {
    DetectionResult::new(
        new_result_id(),
        vec![Detection {
            name: "car".to_string(),
            class: 2,
            confidence: 0.5,
            bbox: BoundingBox::new(1.0, 2.0, 3.0, 4.0),
        }],
        layout,
    )
}

#[tokio::test]
async fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path(), "/static");
    let item = result(&layout);

    HistoryStore::new(layout.history_file(), None)
        .append(item.clone())
        .await
        .unwrap();

    let reopened = HistoryStore::new(layout.history_file(), None);
    assert_eq!(reopened.list().await.unwrap(), vec![item]);
}

#[tokio::test]
async fn test_concurrent_appends_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path(), "/static");
    let store = HistoryStore::new(layout.history_file(), None);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        let item = result(&layout);
        handles.push(tokio::spawn(async move { store.append(item).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let items = store.list().await.unwrap();
    assert_eq!(items.len(), 16);
    let mut ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn test_on_disk_format_is_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path(), "/static");
    let store = HistoryStore::new(layout.history_file(), None);
    let item = result(&layout);
    store.append(item.clone()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(layout.history_file()).unwrap()).unwrap();
    let entry = &raw.as_array().unwrap()[0];
    assert_eq!(entry["id"], item.id.as_str());
    assert_eq!(entry["detections"][0]["box"]["x2"], 3.0);
    assert!(entry["date"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn test_corrupt_history_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path(), "/static");
    std::fs::write(layout.history_file(), b"{ not json").unwrap();

    let store = HistoryStore::new(layout.history_file(), None);
    assert!(matches!(store.list().await, Err(StoreError::Json { .. })));
}

#[tokio::test]
async fn test_cap_keeps_newest() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path(), "/static");
    let store = HistoryStore::new(layout.history_file(), Some(3));

    let mut all = Vec::new();
    for _ in 0..5 {
        let item = result(&layout);
        all.push(item.clone());
        store.append(item).await.unwrap();
    }

    assert_eq!(store.list().await.unwrap(), all[2..].to_vec());
}
