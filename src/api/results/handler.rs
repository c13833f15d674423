// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::{DetectionResult, FullResult};

/// GET /results - Latest detection result
pub async fn results_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DetectionResult>, ApiError> {
    Ok(Json(state.service.latest().await?))
}

/// GET /results/full - Latest result with `annotated_image_base64`
pub async fn full_results_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FullResult>, ApiError> {
    Ok(Json(state.service.latest_full().await?))
}

/// GET /results/image - Latest annotated image as JPEG
pub async fn results_image_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let bytes = state.service.latest_image().await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}
