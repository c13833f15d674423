// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for API tests: a fixed-output engine, JPEG uploads and
//! multipart request builders.

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use fabstir_vision_node::{
    api::{create_app, AppState},
    detection::DetectionService,
    storage::ResultsLayout,
    vision::{encode_jpeg, BoundingBox, Detection, DetectionEngine, DetectionModelManager},
};
use image::{Rgb, RgbImage};
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "----vision-test-boundary";
pub const MAX_UPLOAD: usize = 256 * 1024;

/// Engine reporting one "person" box covering the centre of the image
pub struct CentreBoxEngine;

impl DetectionEngine for CentreBoxEngine {
    fn name(&self) -> &str {
        "centre-box"
    }

    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let (w, h) = (image.width() as f32, image.height() as f32);
        Ok(vec![Detection {
            name: "person".to_string(),
            class: 0,
            confidence: 0.87,
            bbox: BoundingBox::new(w * 0.25, h * 0.25, w * 0.75, h * 0.75),
        }])
    }
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
    encode_jpeg(&image, 90).unwrap()
}

pub fn service_in(dir: &Path, with_model: bool) -> Arc<DetectionService> {
    let models = if with_model {
        DetectionModelManager::with_engine(Arc::new(CentreBoxEngine))
    } else {
        DetectionModelManager::default()
    };
    Arc::new(DetectionService::new(
        models,
        ResultsLayout::new(dir, "/static"),
        None,
        MAX_UPLOAD,
    ))
}

pub fn app_in(dir: &Path) -> Router {
    create_app(Arc::new(AppState::new(service_in(dir, true))))
}

/// multipart/form-data body with a single file field
pub fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload.jpg\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, bytes)))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
