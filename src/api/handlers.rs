// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub history_items: usize,
    pub version: String,
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let report = state.service.health().await;
    Json(HealthResponse {
        status: report.status,
        model_loaded: report.model_loaded,
        model_name: report.model_name,
        history_items: report.history_items,
        version: version::VERSION_NUMBER.to_string(),
    })
}

/// GET /version
pub async fn version_handler() -> Json<serde_json::Value> {
    Json(version::get_version_info())
}
