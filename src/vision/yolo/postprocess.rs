// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of raw YOLO output tensors into detections

use std::cmp::Ordering;

use anyhow::Result;
use ndarray::{ArrayViewD, Axis, Ix3};

use super::preprocessing::Letterbox;
use crate::vision::engine::{BoundingBox, Detection};

/// Thresholds applied after inference
#[derive(Debug, Clone, Copy)]
pub struct PostprocessConfig {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
        }
    }
}

/// Label for a class index, falling back to `class_{id}`
pub fn label_for(class: u32, labels: &[String]) -> String {
    labels
        .get(class as usize)
        .cloned()
        .unwrap_or_else(|| format!("class_{}", class))
}

/// Decode a YOLOv8-style output tensor
///
/// Accepts `[1, 4 + C, N]` (the default export) or the transposed
/// `[1, N, 4 + C]`. Boxes are returned in original-image pixels, filtered,
/// NMS-suppressed and sorted by confidence.
pub fn decode_output(
    output: ArrayViewD<f32>,
    letterbox: &Letterbox,
    labels: &[String],
    config: &PostprocessConfig,
) -> Result<Vec<Detection>> {
    let shape = output.shape().to_vec();
    let output = output
        .into_dimensionality::<Ix3>()
        .map_err(|_| anyhow::anyhow!("Unexpected output shape: {:?}, expected 3 dims", shape))?;

    if shape[0] != 1 {
        anyhow::bail!("Unexpected batch size in output: {}", shape[0]);
    }

    // anchors outnumber channels in every real export
    let output = if shape[1] > shape[2] {
        output.permuted_axes([0, 2, 1])
    } else {
        output
    };
    let output = output.index_axis_move(Axis(0), 0);

    let channels = output.shape()[0];
    let anchors = output.shape()[1];
    if channels < 5 {
        anyhow::bail!("Output has {} channels, need 4 box values and at least one class", channels);
    }
    let num_classes = channels - 4;

    let mut candidates = Vec::new();
    for i in 0..anchors {
        let mut best_class = 0usize;
        let mut best_score = f32::MIN;
        for c in 0..num_classes {
            let score = output[[4 + c, i]];
            if score > best_score {
                best_score = score;
                best_class = c;
            }
        }

        if best_score < config.confidence_threshold {
            continue;
        }

        let input_box = BoundingBox::from_center(
            output[[0, i]],
            output[[1, i]],
            output[[2, i]],
            output[[3, i]],
        );
        let bbox = letterbox.to_original(input_box);
        if bbox.area() <= 0.0 {
            continue;
        }

        candidates.push(Detection {
            name: label_for(best_class as u32, labels),
            class: best_class as u32,
            confidence: best_score,
            bbox,
        });
    }

    let mut kept = non_maximum_suppression(candidates, config.iou_threshold);
    kept.truncate(config.max_detections);
    Ok(kept)
}

/// Class-aware greedy NMS; output is sorted by confidence descending
pub fn non_maximum_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        let suppressed = kept.iter().any(|k| {
            k.class == candidate.class && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
