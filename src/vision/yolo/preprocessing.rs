// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLO detection models

use image::{imageops::FilterType, Rgb, RgbImage};
use ndarray::Array4;

use crate::vision::engine::BoundingBox;

/// Default square input size for YOLOv8 exports
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Letterbox padding colour (matches the training pipeline)
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox resize, used to map boxes back to the original image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub new_width: u32,
    pub new_height: u32,
    pub orig_width: u32,
    pub orig_height: u32,
}

impl Letterbox {
    /// Compute the letterbox for an image of `orig_w` x `orig_h` into a `target` square
    pub fn compute(orig_w: u32, orig_h: u32, target: u32) -> Self {
        let orig_w = orig_w.max(1);
        let orig_h = orig_h.max(1);
        let scale = (target as f32 / orig_w as f32).min(target as f32 / orig_h as f32);

        let new_width = ((orig_w as f32 * scale).round() as u32).clamp(1, target);
        let new_height = ((orig_h as f32 * scale).round() as u32).clamp(1, target);

        Self {
            scale,
            pad_x: (target - new_width) / 2,
            pad_y: (target - new_height) / 2,
            new_width,
            new_height,
            orig_width: orig_w,
            orig_height: orig_h,
        }
    }

    /// Map a box from model-input space to original-image pixels
    pub fn to_original(&self, bbox: BoundingBox) -> BoundingBox {
        let px = self.pad_x as f32;
        let py = self.pad_y as f32;
        BoundingBox {
            x1: (bbox.x1 - px) / self.scale,
            y1: (bbox.y1 - py) / self.scale,
            x2: (bbox.x2 - px) / self.scale,
            y2: (bbox.y2 - py) / self.scale,
        }
        .clamp(self.orig_width, self.orig_height)
    }

    /// Map a box from original-image pixels to model-input space
    pub fn to_input(&self, bbox: BoundingBox) -> BoundingBox {
        let px = self.pad_x as f32;
        let py = self.pad_y as f32;
        BoundingBox {
            x1: bbox.x1 * self.scale + px,
            y1: bbox.y1 * self.scale + py,
            x2: bbox.x2 * self.scale + px,
            y2: bbox.y2 * self.scale + py,
        }
    }
}

/// Resize with aspect ratio preservation onto a gray square canvas
pub fn letterbox(image: &RgbImage, target: u32) -> (RgbImage, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();
    let geometry = Letterbox::compute(orig_w, orig_h, target);

    let mut output = RgbImage::from_pixel(target, target, Rgb([PAD_VALUE; 3]));
    if orig_w == 0 || orig_h == 0 {
        return (output, geometry);
    }

    let resized = image::imageops::resize(
        image,
        geometry.new_width,
        geometry.new_height,
        FilterType::Triangle,
    );

    for y in 0..geometry.new_height {
        for x in 0..geometry.new_width {
            let pixel = resized.get_pixel(x, y);
            output.put_pixel(x + geometry.pad_x, y + geometry.pad_y, *pixel);
        }
    }

    (output, geometry)
}

/// Preprocess an image for YOLO detection
///
/// Steps:
/// 1. Letterbox to `target` x `target` with gray (114) padding
/// 2. Scale pixels to 0.0-1.0
/// 3. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_detection(image: &RgbImage, target: u32) -> (Array4<f32>, Letterbox) {
    let (canvas, geometry) = letterbox(image, target);
    let size = target as usize;

    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, geometry)
}
