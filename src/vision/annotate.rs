// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rendering of detection boxes and label tags onto images

use image::{Rgb, RgbImage};

use super::engine::Detection;

/// Box colours, cycled by class index
const PALETTE: [[u8; 3]; 10] = [
    [255, 56, 56],
    [255, 157, 151],
    [255, 112, 31],
    [255, 178, 29],
    [207, 210, 49],
    [72, 249, 10],
    [26, 147, 52],
    [0, 212, 187],
    [52, 69, 147],
    [203, 56, 255],
];

/// Colour for a class index
pub fn class_color(class: u32) -> Rgb<u8> {
    Rgb(PALETTE[class as usize % PALETTE.len()])
}

/// Line thickness scaled to the image size (minimum 2px)
pub fn line_thickness(width: u32, height: u32) -> u32 {
    let avg = (width + height) as f32 / 2.0;
    ((avg * 0.003).round() as u32).max(2)
}

/// Label text colour
const LABEL_TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// Return a copy of `image` with every detection outlined and tagged
/// with its class name and confidence
pub fn draw_detections(image: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut annotated = image.clone();
    let (width, height) = annotated.dimensions();
    let thickness = line_thickness(width, height);

    for detection in detections {
        if let Some(bbox_px) = to_pixel_box(detection, width, height) {
            let color = class_color(detection.class);
            draw_rect(&mut annotated, bbox_px, color, thickness);
            draw_label(
                &mut annotated,
                [bbox_px[0], bbox_px[1]],
                &label_text(detection),
                color,
                (thickness / 2).max(1),
            );
        }
    }

    annotated
}

/// Tag text for a detection, e.g. `PERSON 0.87`
pub fn label_text(detection: &Detection) -> String {
    format!("{} {:.2}", detection.name, detection.confidence).to_uppercase()
}

/// Draw a filled tag with `text` above the box corner, or just inside it
/// when there is no room above
pub fn draw_label(img: &mut RgbImage, corner: [u32; 2], text: &str, color: Rgb<u8>, scale: u32) {
    let (w, h) = img.dimensions();
    let glyph_w = (GLYPH_WIDTH + 1) * scale;
    let tag_w = text.chars().count() as u32 * glyph_w + scale;
    let tag_h = (GLYPH_HEIGHT + 2) * scale;

    let [x0, box_y0] = corner;
    let y0 = if box_y0 >= tag_h { box_y0 - tag_h } else { box_y0 };

    for y in y0..(y0 + tag_h).min(h) {
        for x in x0..(x0 + tag_w).min(w) {
            img.put_pixel(x, y, color);
        }
    }

    for (i, c) in text.chars().enumerate() {
        let gx = x0 + scale + i as u32 * glyph_w;
        let gy = y0 + scale;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = gx + col * scale + dx;
                        let py = gy + row as u32 * scale + dy;
                        if px < w && py < h {
                            img.put_pixel(px, py, LABEL_TEXT);
                        }
                    }
                }
            }
        }
    }
}

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// 3x5 bitmap glyphs, one row per byte, high bit on the left
fn glyph(c: char) -> [u8; 5] {
    match c {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0; 5],
        _ => [0b110, 0b001, 0b010, 0b000, 0b010],
    }
}

/// Convert a detection box to inclusive pixel corners, `None` if it falls outside
fn to_pixel_box(detection: &Detection, width: u32, height: u32) -> Option<[u32; 4]> {
    if width == 0 || height == 0 {
        return None;
    }
    let bbox = detection.bbox.clamp(width, height);
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;

    let x0 = bbox.x1.floor().min(max_x) as u32;
    let y0 = bbox.y1.floor().min(max_y) as u32;
    let x1 = bbox.x2.ceil().min(max_x) as u32;
    let y1 = bbox.y2.ceil().min(max_y) as u32;

    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some([x0, y0, x1, y1])
}

/// Draw a rectangle border with given thickness
pub fn draw_rect(img: &mut RgbImage, bbox_px: [u32; 4], color: Rgb<u8>, thickness: u32) {
    let (w, h) = img.dimensions();
    let [x0, y0, x1, y1] = bbox_px;
    for t in 0..thickness {
        let xx0 = x0.saturating_add(t);
        let yy0 = y0.saturating_add(t);
        let xx1 = x1.saturating_sub(t);
        let yy1 = y1.saturating_sub(t);
        if xx0 >= w || yy0 >= h || xx1 >= w || yy1 >= h || xx0 > xx1 || yy0 > yy1 {
            continue;
        }
        for x in xx0..=xx1 {
            img.put_pixel(x, yy0, color);
            img.put_pixel(x, yy1, color);
        }
        for y in yy0..=yy1 {
            img.put_pixel(xx0, y, color);
            img.put_pixel(xx1, y, color);
        }
    }
}
