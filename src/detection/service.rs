// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict-and-persist flow plus result and history queries

use std::path::Path;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::errors::ServiceError;
use super::types::{new_result_id, DetectionResult};
use crate::config::NodeConfig;
use crate::storage::{HistoryStore, ResultStore, ResultsLayout};
use crate::vision::{
    decode_image_bytes, encode_jpeg, DetectionModelManager, ANNOTATED_JPEG_QUALITY,
};

/// Latest result with the annotated image inlined
#[derive(Debug, Clone, Serialize)]
pub struct FullResult {
    #[serde(flatten)]
    pub result: DetectionResult,
    pub annotated_image_base64: String,
}

/// Service health snapshot
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
    pub model_name: Option<String>,
    pub history_items: usize,
}

/// Owns the detector and both stores
pub struct DetectionService {
    models: DetectionModelManager,
    layout: ResultsLayout,
    results: ResultStore,
    history: HistoryStore,
    max_upload_bytes: usize,
}

impl DetectionService {
    pub fn new(
        models: DetectionModelManager,
        layout: ResultsLayout,
        max_history_items: Option<usize>,
        max_upload_bytes: usize,
    ) -> Self {
        let results = ResultStore::new(layout.results_file());
        let history = HistoryStore::new(layout.history_file(), max_history_items);
        Self {
            models,
            layout,
            results,
            history,
            max_upload_bytes,
        }
    }

    /// Load the model named by `config` and initialize the results directory
    ///
    /// A model that fails to load only disables predictions.
    pub async fn from_config(config: &NodeConfig) -> anyhow::Result<Self> {
        let models = DetectionModelManager::new(config.model.clone()).await?;
        let service = Self::new(
            models,
            config.layout(),
            config.max_history_items,
            config.max_upload_bytes,
        );
        service
            .initialize()
            .await
            .context("Failed to initialize results directory")?;
        Ok(service)
    }

    /// Create the results directory and an empty history file
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        self.layout.ensure_dir().await.map_err(|e| {
            ServiceError::internal(format!(
                "Failed to create {}: {}",
                self.layout.dir().display(),
                e
            ))
        })?;
        self.history.initialize().await?;
        info!("📁 Results directory ready at {}", self.layout.dir().display());
        Ok(())
    }

    pub fn layout(&self) -> &ResultsLayout {
        &self.layout
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn models(&self) -> &DetectionModelManager {
        &self.models
    }

    /// Run detection on an uploaded image and persist the result
    ///
    /// Nothing is written if the upload does not decode. Failures after
    /// inference are not rolled back.
    pub async fn predict(&self, bytes: &[u8]) -> Result<DetectionResult, ServiceError> {
        let (image, info) = decode_image_bytes(bytes, self.max_upload_bytes).map_err(|e| {
            warn!("Failed to decode upload: {}", e);
            ServiceError::from(e)
        })?;
        debug!(
            "Decoded upload: {}x{} {:?}, {} bytes",
            info.width, info.height, info.format, info.size_bytes
        );

        let engine = self.models.get_engine().ok_or_else(|| {
            warn!("Prediction requested but no detection model is loaded");
            ServiceError::ServiceUnavailable("Detection model not loaded".to_string())
        })?;

        let (analysis, jpeg) = tokio::task::spawn_blocking(move || {
            let analysis = engine.analyze(&image)?;
            let jpeg = encode_jpeg(&analysis.annotated, ANNOTATED_JPEG_QUALITY)?;
            anyhow::Ok((analysis, jpeg))
        })
        .await
        .map_err(|e| ServiceError::internal(format!("Detection task failed: {}", e)))?
        .map_err(|e| {
            error!("Detection failed: {:#}", e);
            ServiceError::internal(format!("Detection failed: {:#}", e))
        })?;

        let id = new_result_id();
        let result = DetectionResult::new(id, analysis.detections, &self.layout);

        self.layout.ensure_dir().await.map_err(ServiceError::internal)?;
        let image_path = self.layout.image_path(&result.id);
        tokio::fs::write(&image_path, &jpeg).await.map_err(|e| {
            error!("Failed to write {}: {}", image_path.display(), e);
            ServiceError::internal(format!("Failed to save annotated image: {}", e))
        })?;

        self.results.replace(&result).await?;
        let evicted = self.history.append(result.clone()).await?;
        self.remove_evicted_images(&evicted).await;

        info!(
            "✅ Prediction {} complete: {} detections, {}ms",
            result.id,
            result.detections.len(),
            analysis.processing_time_ms
        );
        Ok(result)
    }

    /// Most recent result
    pub async fn latest(&self) -> Result<DetectionResult, ServiceError> {
        self.results
            .latest()
            .await?
            .ok_or_else(|| ServiceError::not_found("No results found"))
    }

    /// Most recent result with its annotated image as base64
    pub async fn latest_full(&self) -> Result<FullResult, ServiceError> {
        let result = self.latest().await?;
        let bytes = self.read_image(&result.id).await?;
        Ok(FullResult {
            result,
            annotated_image_base64: STANDARD.encode(bytes),
        })
    }

    /// JPEG bytes of the most recent annotated image
    pub async fn latest_image(&self) -> Result<Vec<u8>, ServiceError> {
        let result = self.latest().await?;
        self.read_image(&result.id).await
    }

    /// Full history, oldest first
    pub async fn history(&self) -> Result<Vec<DetectionResult>, ServiceError> {
        Ok(self.history.list().await?)
    }

    /// Delete one history entry and its annotated image
    pub async fn delete_history_item(&self, id: &str) -> Result<DetectionResult, ServiceError> {
        let removed = self
            .history
            .remove(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item not found"))?;

        remove_image(&self.layout.image_path(&removed.id)).await;
        Ok(removed)
    }

    pub async fn health(&self) -> HealthReport {
        let history_items = match self.history.len().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Health check could not read history: {}", e);
                0
            }
        };
        let model = self.models.model_info();

        HealthReport {
            status: if model.available { "healthy" } else { "degraded" }.to_string(),
            model_loaded: model.available,
            model_name: model.available.then_some(model.name),
            history_items,
        }
    }

    /// Delete the images of entries dropped by the history cap
    ///
    /// A concurrent predict can leave `results.json` pointing at an entry
    /// that another append just evicted; that image is kept so
    /// `/results/image` stays valid.
    async fn remove_evicted_images(&self, evicted: &[DetectionResult]) {
        if evicted.is_empty() {
            return;
        }
        let latest_id = match self.results.latest().await {
            Ok(latest) => latest.map(|r| r.id),
            Err(e) => {
                warn!("Could not read latest result before eviction: {}", e);
                None
            }
        };
        for old in evicted {
            if latest_id.as_deref() == Some(old.id.as_str()) {
                debug!("Keeping image of evicted entry {}, still the latest result", old.id);
                continue;
            }
            remove_image(&self.layout.image_path(&old.id)).await;
        }
    }

    async fn read_image(&self, id: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.layout.image_path(id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ServiceError::not_found("Image not found"))
            }
            Err(e) => Err(ServiceError::internal(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Best-effort image removal; failures are only logged
async fn remove_image(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) => warn!("⚠️ Could not remove {}: {}", path.display(), e),
    }
}
