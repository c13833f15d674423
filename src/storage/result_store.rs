// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Latest Result Storage Module
//!
//! Single-slot store holding the most recent detection result. Every
//! predict overwrites it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::errors::StoreError;
use super::json_file::{read_json, write_json_atomic};
use crate::detection::DetectionResult;

/// Store for the latest detection result
#[derive(Clone)]
pub struct ResultStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl ResultStore {
    /// Create a store backed by `path` (created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Current record, `None` before the first predict
    pub async fn latest(&self) -> Result<Option<DetectionResult>, StoreError> {
        let _guard = self.lock.read().await;
        read_json(&self.path).await
    }

    /// Overwrite the slot with `result`
    pub async fn replace(&self, result: &DetectionResult) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;
        debug!("📥 Storing latest result {}", result.id);
        write_json_atomic(&self.path, result).await?;
        info!(
            "✅ Latest result is now {} ({} detections)",
            result.id,
            result.detections.len()
        );
        Ok(())
    }
}
