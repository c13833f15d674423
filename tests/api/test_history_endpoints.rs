// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! History endpoint tests: GET /history and DELETE /history/{item_id}

use super::helpers::*;
use axum::http::StatusCode;

#[tokio::test]
async fn test_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    for uri in ["/history", "/api/history"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_history_keeps_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let mut ids = Vec::new();
    for size in [10, 12, 14] {
        let json = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(size, size))).await).await;
        ids.push(json["id"].as_str().unwrap().to_string());
    }

    let history = body_json(send(&app, get("/history")).await).await;
    let listed: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_delete_history_item() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let first = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await).await;
    let second = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await).await;
    let first_id = first["id"].as_str().unwrap();
    let image_path = dir.path().join(format!("{}_annotated.jpg", first_id));
    assert!(image_path.exists());

    let response = send(&app, delete(&format!("/history/{}", first_id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"message": "Deleted successfully"})
    );
    assert!(!image_path.exists());

    let history = body_json(send(&app, get("/history")).await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0], second);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let result = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await).await;
    let uri = format!("/api/history/{}", result["id"].as_str().unwrap());

    assert_eq!(send(&app, delete(&uri)).await.status(), StatusCode::OK);

    let response = send(&app, delete(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Item not found");
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, delete("/history/does-not-exist")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_keeps_latest_result() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let result = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await).await;
    send(&app, delete(&format!("/history/{}", result["id"].as_str().unwrap()))).await;

    let latest = send(&app, get("/results")).await;
    assert_eq!(latest.status(), StatusCode::OK);
    assert_eq!(body_json(latest).await["id"], result["id"]);
}
