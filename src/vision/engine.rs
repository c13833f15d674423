// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection engine abstraction and the detection types it produces

use std::time::Instant;

use anyhow::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::annotate::draw_detections;

/// Axis-aligned box in original-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from YOLO centre/size form
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 > x1 && y2 > y1 {
            (x2 - x1) * (y2 - y1)
        } else {
            0.0
        }
    }

    /// Intersection over union, 0.0 when the union is empty
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Clamp into `[0, width] x [0, height]`
    pub fn clamp(&self, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            x1: self.x1.clamp(0.0, w),
            y1: self.y1.clamp(0.0, h),
            x2: self.x2.clamp(0.0, w),
            y2: self.y2.clamp(0.0, h),
        }
    }
}

/// A single detected object
///
/// Field names follow the JSON the upstream YOLO tooling emits, so clients
/// built against it keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label
    pub name: String,
    /// Class index
    pub class: u32,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Bounding box location
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Output of one engine run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub detections: Vec<Detection>,
    /// Input image with detections drawn on it
    pub annotated: RgbImage,
    pub processing_time_ms: u64,
}

/// An object detector that can be plugged into the detection service
///
/// Implementations are synchronous and CPU bound; callers run them on a
/// blocking thread.
pub trait DetectionEngine: Send + Sync {
    /// Model name reported by the health endpoint
    fn name(&self) -> &str;

    /// Run detection on an RGB image
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>>;

    /// Detect and render the annotated image
    fn analyze(&self, image: &RgbImage) -> Result<Analysis> {
        let start = Instant::now();
        let detections = self.detect(image)?;
        let annotated = draw_detections(image, &detections);

        Ok(Analysis {
            detections,
            annotated,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
