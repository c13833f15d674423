// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::start_server;
use crate::config::NodeConfig;
use crate::detection::DetectionService;
use crate::storage::{HistoryStore, ResultsLayout};
use crate::vision::{
    decode_image_bytes, draw_detections, encode_jpeg, DetectionModelManager,
    ANNOTATED_JPEG_QUALITY,
};

/// Arguments for the serve command; each flag overrides its environment variable
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for results.json, history.json and annotated images
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// ONNX model to load
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Class labels file, one name per line
    #[arg(long)]
    pub labels_path: Option<PathBuf>,

    /// Keep at most this many history entries
    #[arg(long)]
    pub max_history_items: Option<usize>,
}

impl ServeArgs {
    pub fn apply(self, config: &mut NodeConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.results_dir {
            config.results_dir = dir;
        }
        if let Some(path) = self.model_path {
            config.model.model_path = Some(path);
        }
        if let Some(path) = self.labels_path {
            config.model.labels_path = Some(path);
        }
        if self.max_history_items.is_some() {
            config.max_history_items = self.max_history_items;
        }
    }
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Image to analyze
    pub image: PathBuf,

    /// Write the annotated JPEG here
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// ONNX model to load (defaults to MODEL_PATH)
    #[arg(long)]
    pub model_path: Option<PathBuf>,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Results directory (defaults to RESULTS_DIR)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
}

pub async fn serve(config: NodeConfig) -> Result<()> {
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let service = Arc::new(DetectionService::from_config(&config).await?);
    start_server(&config, service).await
}

pub async fn detect(args: DetectArgs, mut config: NodeConfig) -> Result<()> {
    if let Some(path) = args.model_path {
        config.model.model_path = Some(path);
    }
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let models = DetectionModelManager::new(config.model.clone()).await?;
    let engine = models
        .get_engine()
        .ok_or_else(|| anyhow!("Detection model not loaded"))?;

    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let (image, _) = decode_image_bytes(&bytes, config.max_upload_bytes)?;

    let (detections, image) = tokio::task::spawn_blocking(move || {
        let detections = engine.detect(&image)?;
        anyhow::Ok((detections, image))
    })
    .await??;

    if let Some(output) = args.output {
        let annotated = draw_detections(&image, &detections);
        let jpeg = encode_jpeg(&annotated, ANNOTATED_JPEG_QUALITY)?;
        tokio::fs::write(&output, jpeg)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Annotated image written to {}", output.display());
    }

    println!("{}", serde_json::to_string_pretty(&detections)?);
    Ok(())
}

pub async fn history(args: HistoryArgs, config: NodeConfig) -> Result<()> {
    let dir = args.results_dir.unwrap_or(config.results_dir);
    let layout = ResultsLayout::new(dir, &config.static_url_prefix);
    let store = HistoryStore::new(layout.history_file(), None);

    let items = store.list().await?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
