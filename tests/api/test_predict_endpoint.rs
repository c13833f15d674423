// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Predict endpoint tests
//!
//! These tests verify that:
//! - A valid upload returns a result with a 32-char hex id
//! - The annotated image lands at the derived path
//! - Undecodable uploads are rejected with no files written
//! - Predictions without a model return 503
//! - Oversized uploads return 413 whichever limit they hit

use super::helpers::*;
use axum::http::StatusCode;
use fabstir_vision_node::api::{create_app, AppState};
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn test_predict_small_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let id = json["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(json["detections"].is_array());

    let url = json["annotated_image_url"].as_str().unwrap();
    assert_eq!(url, format!("/static/results/{}_annotated.jpg", id));
    assert!(dir.path().join(format!("{}_annotated.jpg", id)).exists());
    assert!(Path::new(json["annotated_image_path"].as_str().unwrap()).exists());

    let history = body_json(send(&app, get("/history")).await).await;
    let items = history.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_predict_detection_shape() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, predict_request("/predict", "image", &jpeg_bytes(40, 20))).await;
    let json = body_json(response).await;

    let detection = &json["detections"][0];
    assert_eq!(detection["name"], "person");
    assert_eq!(detection["class"], 0);
    assert!(detection["confidence"].as_f64().unwrap() > 0.8);
    assert_eq!(detection["box"]["x1"].as_f64().unwrap(), 10.0);
    assert_eq!(detection["box"]["y2"].as_f64().unwrap(), 15.0);
}

#[tokio::test]
async fn test_predict_under_api_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, predict_request("/api/predict", "image", &jpeg_bytes(12, 12))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let latest = send(&app, get("/results")).await;
    assert_eq!(latest.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_invalid_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, predict_request("/predict", "image", b"not really a jpeg")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid image"));

    assert!(!dir.path().join("results.json").exists());
    assert!(!dir.path().join("history.json").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_predict_missing_image_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, predict_request("/predict", "file", &jpeg_bytes(10, 10))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "image field is required");
}

#[tokio::test]
async fn test_predict_without_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(Arc::new(AppState::new(service_in(dir.path(), false))));

    let response = send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let history = body_json(send(&app, get("/history")).await).await;
    assert_eq!(history, serde_json::json!([]));
}

#[tokio::test]
async fn test_predict_rejects_get() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, get("/predict")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_predict_image_over_upload_limit() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let oversized = vec![0u8; MAX_UPLOAD + 1];
    let response = send(&app, predict_request("/predict", "image", &oversized)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("limit"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_predict_body_over_request_limit() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    // Larger than the upload limit plus the multipart allowance, so the
    // body limit trips while the multipart stream is being read
    let oversized = vec![0u8; MAX_UPLOAD + 200 * 1024];
    let response = send(&app, predict_request("/api/predict", "image", &oversized)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("limit"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_health_and_version_under_api_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let health = send(&app, get("/api/health")).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_json(health).await["status"], "healthy");

    let version = send(&app, get("/api/version")).await;
    assert_eq!(version.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["model_name"], "centre-box");
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let json = body_json(send(&app, get("/version")).await).await;
    assert_eq!(json["version"], fabstir_vision_node::version::VERSION_NUMBER);
}
