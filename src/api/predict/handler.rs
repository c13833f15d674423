// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict endpoint handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use tracing::{debug, info, warn};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::DetectionResult;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// POST /predict - Detect objects in an uploaded image
///
/// Expects `multipart/form-data` with the image in the `image` field. The
/// annotated image is saved under the results directory and the result is
/// recorded as both the latest result and a new history entry.
///
/// # Errors
/// - 400 Bad Request: missing `image` field, malformed multipart, undecodable image
/// - 413 Payload Too Large: image exceeds the configured upload limit
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference or persistence failed
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DetectionResult>, ApiError> {
    let max_bytes = state.service.max_upload_bytes();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e, max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read image", e, max_bytes))?;
        image = Some(bytes);
        break;
    }

    let bytes = image.ok_or_else(|| {
        warn!("Predict request without an image field");
        ApiError::InvalidRequest("image field is required".to_string())
    })?;

    if bytes.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Image is {} bytes, limit is {} bytes",
            bytes.len(),
            max_bytes
        )));
    }

    debug!("Predict request: {} bytes", bytes.len());
    let result = state.service.predict(&bytes).await?;

    info!(
        "Predict {} returned {} detections",
        result.id,
        result.detections.len()
    );
    Ok(Json(result))
}

/// Body-limit hits become 413, anything else is a malformed request
fn multipart_error(context: &str, e: MultipartError, max_bytes: usize) -> ApiError {
    warn!("{}: {}", context, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload exceeds the limit of {} bytes", max_bytes))
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, e))
    }
}
