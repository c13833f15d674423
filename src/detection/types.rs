// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persisted detection result record

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::storage::ResultsLayout;
use crate::vision::Detection;

/// Outcome of one predict call, as stored in `results.json` and `history.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// 32-char lowercase hex identifier
    pub id: String,
    /// When the prediction was made
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    /// Public URL of the annotated image
    pub annotated_image_url: String,
    /// Filesystem path of the annotated image
    #[serde(default)]
    pub annotated_image_path: String,
    /// Detected objects
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    /// Build a record for `id`, deriving image locations from the layout
    pub fn new(id: String, detections: Vec<Detection>, layout: &ResultsLayout) -> Self {
        Self {
            annotated_image_url: layout.image_url(&id),
            annotated_image_path: layout.image_path(&id).to_string_lossy().into_owned(),
            id,
            date: Utc::now(),
            detections,
        }
    }
}

/// Naive timestamp layout found in records from older nodes, read as UTC
const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Accept RFC 3339 or the legacy `2025-01-01 12:34:56.123456` form
fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, LEGACY_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid date {:?}: {}", raw, e)))
}

/// Generate a random result identifier (UUID v4, simple hex form)
pub fn new_result_id() -> String {
    Uuid::new_v4().simple().to_string()
}
