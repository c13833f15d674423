// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Latest result endpoint tests: /results, /results/full, /results/image

use super::helpers::*;
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[tokio::test]
async fn test_results_before_any_predict() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    for uri in ["/results", "/results/full", "/results/image", "/api/results"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No results found", "{}", uri);
    }
}

#[tokio::test]
async fn test_results_returns_latest_only() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await;
    let second = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(20, 20))).await).await;

    let latest = body_json(send(&app, get("/results")).await).await;
    assert_eq!(latest["id"], second["id"]);
    assert_eq!(latest["detections"], second["detections"]);
}

#[tokio::test]
async fn test_full_result_base64_matches_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let result = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(16, 16))).await).await;
    let id = result["id"].as_str().unwrap();

    let full = body_json(send(&app, get("/results/full")).await).await;
    assert_eq!(full["id"], id);

    let decoded = STANDARD
        .decode(full["annotated_image_base64"].as_str().unwrap())
        .unwrap();
    let on_disk = std::fs::read(dir.path().join(format!("{}_annotated.jpg", id))).unwrap();
    assert_eq!(decoded, on_disk);
}

#[tokio::test]
async fn test_results_image_is_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());
    send(&app, predict_request("/predict", "image", &jpeg_bytes(16, 16))).await;

    let response = send(&app, get("/results/image")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");

    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_results_image_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path());

    let result = body_json(send(&app, predict_request("/predict", "image", &jpeg_bytes(10, 10))).await).await;
    std::fs::remove_file(result["annotated_image_path"].as_str().unwrap()).unwrap();

    let response = send(&app, get("/results/image")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Image not found");

    // The record itself is still served
    assert_eq!(send(&app, get("/results")).await.status(), StatusCode::OK);
}
