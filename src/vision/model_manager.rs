// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection model manager for loading and providing the active detector

use std::path::PathBuf;
use std::sync::Arc;

use crate::vision::engine::DetectionEngine;
use crate::vision::yolo::{load_labels, PostprocessConfig, YoloOnnxModel, YOLO_INPUT_SIZE};

/// Configuration for loading the detection model
#[derive(Debug, Clone)]
pub struct DetectionModelConfig {
    /// Path to the ONNX model (None disables detection)
    pub model_path: Option<PathBuf>,
    /// Optional class labels file, one label per line
    pub labels_path: Option<PathBuf>,
    /// Square model input size in pixels
    pub input_size: u32,
    /// Minimum class score to keep a detection
    pub confidence_threshold: f32,
    /// IoU above which same-class boxes are suppressed
    pub iou_threshold: f32,
    /// Maximum detections returned per image
    pub max_detections: usize,
}

impl Default for DetectionModelConfig {
    fn default() -> Self {
        Self {
            model_path: Some(PathBuf::from("./models/best.onnx")),
            labels_path: None,
            input_size: YOLO_INPUT_SIZE,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
        }
    }
}

impl DetectionModelConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size == 0 || self.input_size % 32 != 0 {
            return Err(format!(
                "Model input size must be a positive multiple of 32, got {}",
                self.input_size
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err("Confidence threshold must be between 0 and 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err("IoU threshold must be between 0 and 1".to_string());
        }
        if self.max_detections == 0 {
            return Err("Max detections must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn postprocess(&self) -> PostprocessConfig {
        PostprocessConfig {
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            max_detections: self.max_detections,
        }
    }
}

/// Information about the configured detection model
#[derive(Debug, Clone)]
pub struct DetectionModelInfo {
    /// Model name
    pub name: String,
    /// Whether the model is available
    pub available: bool,
}

/// Manager for the detection model
///
/// A missing or broken model is not fatal: the node still serves results and
/// history, and predictions report the service as unavailable.
#[derive(Clone, Default)]
pub struct DetectionModelManager {
    engine: Option<Arc<dyn DetectionEngine>>,
}

impl DetectionModelManager {
    /// Load the detector described by `config`
    pub async fn new(config: DetectionModelConfig) -> anyhow::Result<Self> {
        let Some(ref model_path) = config.model_path else {
            tracing::info!("No detection model configured");
            return Ok(Self::default());
        };

        let labels = match config.labels_path {
            Some(ref path) => match load_labels(path) {
                Ok(labels) => labels,
                Err(e) => {
                    tracing::warn!("⚠️ Failed to load labels from {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let engine = match YoloOnnxModel::load(
            model_path,
            labels,
            config.input_size,
            config.postprocess(),
        ) {
            Ok(model) => {
                tracing::info!("✅ YOLO model loaded from {}", model_path.display());
                Some(Arc::new(model) as Arc<dyn DetectionEngine>)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Failed to load detection model from {}: {:#}",
                    model_path.display(),
                    e
                );
                None
            }
        };

        Ok(Self { engine })
    }

    /// Wrap an already constructed engine
    pub fn with_engine(engine: Arc<dyn DetectionEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Get the detection engine if available
    pub fn get_engine(&self) -> Option<Arc<dyn DetectionEngine>> {
        self.engine.clone()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn model_name(&self) -> Option<String> {
        self.engine.as_ref().map(|e| e.name().to_string())
    }

    pub fn model_info(&self) -> DetectionModelInfo {
        DetectionModelInfo {
            name: self.model_name().unwrap_or_else(|| "none".to_string()),
            available: self.engine.is_some(),
        }
    }
}
