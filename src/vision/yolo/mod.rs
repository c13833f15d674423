// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO object detection on ONNX Runtime
//!
//! Components:
//! - `preprocessing` - Letterbox resize and tensor conversion
//! - `postprocess` - Output decoding and non-maximum suppression
//! - `model` - ONNX session wrapper implementing `DetectionEngine`

pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use model::{load_labels, YoloOnnxModel};
pub use postprocess::{decode_output, non_maximum_suppression, PostprocessConfig};
pub use preprocessing::{letterbox, preprocess_for_detection, Letterbox, YOLO_INPUT_SIZE};
