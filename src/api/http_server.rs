// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring
//!
//! Every route, health and version included, is served both unprefixed
//! and under `/api`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{health_handler, version_handler};
use super::history::{delete_history_item_handler, history_handler};
use super::predict::predict_handler;
use super::results::{full_results_handler, results_handler, results_image_handler};
use crate::config::NodeConfig;
use crate::detection::DetectionService;

/// Multipart framing allowance on top of the raw image size
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DetectionService>,
}

impl AppState {
    pub fn new(service: Arc<DetectionService>) -> Self {
        Self { service }
    }
}

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/results", get(results_handler))
        .route("/results/full", get(full_results_handler))
        .route("/results/image", get(results_image_handler))
        .route("/history", get(history_handler))
        .route("/history/:item_id", delete(delete_history_item_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
}

/// Build the application router
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.service.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn start_server(config: &NodeConfig, service: Arc<DetectionService>) -> Result<()> {
    let addr = config.listen_addr()?;
    let app = create_app(Arc::new(AppState::new(service)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🌐 Vision API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
