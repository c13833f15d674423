// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based object detection
//!
//! This module provides:
//! - The `DetectionEngine` trait and detection types
//! - A YOLO backend running ONNX exports on CPU
//! - Annotation rendering and image encode/decode helpers

pub mod annotate;
pub mod engine;
pub mod image_utils;
pub mod model_manager;
pub mod yolo;

pub use annotate::draw_detections;
pub use engine::{Analysis, BoundingBox, Detection, DetectionEngine};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg, ImageError, ImageInfo, ANNOTATED_JPEG_QUALITY,
};
pub use model_manager::{DetectionModelConfig, DetectionModelInfo, DetectionModelManager};
