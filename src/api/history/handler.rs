// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::response::DeleteResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::DetectionResult;

/// GET /history - All past results, oldest first
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DetectionResult>>, ApiError> {
    Ok(Json(state.service.history().await?))
}

/// DELETE /history/{item_id} - Remove one entry and its annotated image
pub async fn delete_history_item_handler(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.service.delete_history_item(&item_id).await?;
    info!("🗑️ Deleted history item {}", item_id);
    Ok(Json(DeleteResponse::deleted()))
}
