// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage::ResultsLayout;
use crate::vision::DetectionModelConfig;

/// Default maximum upload size (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the vision node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Interface to bind the HTTP server to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Directory holding results.json, history.json and annotated images
    pub results_dir: PathBuf,
    /// URL prefix under which the results directory is published
    pub static_url_prefix: String,
    /// Detection model settings
    pub model: DetectionModelConfig,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Optional cap on history length (oldest entries evicted first)
    pub max_history_items: Option<usize>,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl NodeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let model_defaults = DetectionModelConfig::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            results_dir: env::var("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_dir),
            static_url_prefix: env::var("STATIC_URL_PREFIX")
                .unwrap_or(defaults.static_url_prefix),
            model: DetectionModelConfig {
                // MODEL_PATH="" disables the detector entirely
                model_path: match env::var("MODEL_PATH") {
                    Ok(v) if v.trim().is_empty() => None,
                    Ok(v) => Some(PathBuf::from(v)),
                    Err(_) => model_defaults.model_path,
                },
                labels_path: env::var("LABELS_PATH")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from),
                input_size: env_or("MODEL_INPUT_SIZE", model_defaults.input_size),
                confidence_threshold: env_or(
                    "CONFIDENCE_THRESHOLD",
                    model_defaults.confidence_threshold,
                ),
                iou_threshold: env_or("IOU_THRESHOLD", model_defaults.iou_threshold),
                max_detections: env_or("MAX_DETECTIONS", model_defaults.max_detections),
            },
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_history_items: env::var("MAX_HISTORY_ITEMS")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.static_url_prefix.starts_with('/') {
            return Err(format!(
                "Static URL prefix must start with '/', got '{}'",
                self.static_url_prefix
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err("Max upload size must be greater than 0".to_string());
        }
        if self.max_history_items == Some(0) {
            return Err("History cap must be greater than 0 when set".to_string());
        }
        self.model.validate()
    }

    /// Socket address the HTTP server binds to
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }

    /// File layout of the results directory
    pub fn layout(&self) -> ResultsLayout {
        ResultsLayout::new(self.results_dir.clone(), &self.static_url_prefix)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            results_dir: PathBuf::from("static/results"),
            static_url_prefix: "/static".to_string(),
            model: DetectionModelConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_history_items: None,
        }
    }
}
