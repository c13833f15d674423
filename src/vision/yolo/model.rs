// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO object detection model on ONNX Runtime
//!
//! Loads a YOLOv8-style ONNX export and runs it on CPU.

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::postprocess::{decode_output, PostprocessConfig};
use super::preprocessing::preprocess_for_detection;
use crate::vision::engine::{Detection, DetectionEngine};

/// Load class labels from a text file, one label per line
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels file {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// YOLO detection model
#[derive(Clone)]
pub struct YoloOnnxModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Display name (file stem of the model)
    name: String,
    /// Class labels indexed by class id
    labels: Vec<String>,
    /// Square input size
    input_size: u32,
    postprocess: PostprocessConfig,
}

impl std::fmt::Debug for YoloOnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloOnnxModel")
            .field("name", &self.name)
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .field("postprocess", &self.postprocess)
            .finish_non_exhaustive()
    }
}

impl YoloOnnxModel {
    /// Load the detection model from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        labels: Vec<String>,
        input_size: u32,
        postprocess: PostprocessConfig,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        info!("Loading YOLO detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Detection model input shape: {:?}", input.input_type);
        }

        let name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yolo".to_string());

        info!(
            "✅ YOLO model '{}' loaded (input: {}, {} labels, CPU-only)",
            name,
            input_name,
            labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            name,
            labels,
            input_size,
            postprocess,
        })
    }
}

impl DetectionEngine for YoloOnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let (input, letterbox) = preprocess_for_detection(image, self.input_size);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Detection session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Detection output shape: {:?}", output_tensor.shape());

        let detections = decode_output(
            output_tensor.view(),
            &letterbox,
            &self.labels,
            &self.postprocess,
        )?;

        debug!("Detected {} objects", detections.len());
        Ok(detections)
    }
}
