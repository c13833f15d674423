// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use fabstir_vision_node::{api::start_server, config::NodeConfig, detection::DetectionService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // RUST_LOG wins, otherwise info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Starting {}...\n", fabstir_vision_node::version::get_version_string());
    println!("📦 BUILD VERSION: {}", fabstir_vision_node::version::VERSION);
    println!("📅 Build Date: {}", fabstir_vision_node::version::BUILD_DATE);
    println!();

    let config = NodeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!("📁 Results directory: {}", config.results_dir.display());
    match config.model.model_path {
        Some(ref path) => info!("🧠 Detection model: {}", path.display()),
        None => warn!("⚠️ MODEL_PATH is empty, predictions are disabled"),
    }
    if let Some(cap) = config.max_history_items {
        info!("🧹 History capped at {} entries", cap);
    }

    let service = Arc::new(DetectionService::from_config(&config).await?);
    if !service.models().has_engine() {
        warn!("⚠️ Running without a detection model, /predict will return 503");
    }

    start_server(&config, service).await?;

    println!("\n👋 Vision node stopped");
    Ok(())
}
