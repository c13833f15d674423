// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection History Storage Module
//!
//! Insertion-ordered list of past results persisted as one JSON array.
//! Reads share the lock; append and remove hold it exclusively for the
//! whole read-modify-write.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::errors::StoreError;
use super::json_file::{read_json, write_json_atomic};
use crate::detection::DetectionResult;

/// Store for the detection history
#[derive(Clone)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
    max_items: Option<usize>,
}

impl HistoryStore {
    /// Create a store backed by `path`, optionally capped at `max_items`
    pub fn new(path: impl Into<PathBuf>, max_items: Option<usize>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
            max_items,
        }
    }

    /// Create an empty history file if none exists yet
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;
        if read_json::<Vec<DetectionResult>>(&self.path).await?.is_none() {
            info!("Initializing empty history at {}", self.path.display());
            write_json_atomic(&self.path, &Vec::<DetectionResult>::new()).await?;
        }
        Ok(())
    }

    /// All entries, oldest first; empty when never initialized
    pub async fn list(&self) -> Result<Vec<DetectionResult>, StoreError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }

    /// Append `item`; returns entries evicted by the history cap, oldest first
    pub async fn append(&self, item: DetectionResult) -> Result<Vec<DetectionResult>, StoreError> {
        let _guard = self.lock.write().await;
        let mut history = self.load().await?;

        if history.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }

        debug!("📥 Appending {} to history ({} entries)", item.id, history.len());
        history.push(item);

        let evicted: Vec<DetectionResult> = match self.max_items {
            Some(max) if history.len() > max => {
                let excess = history.len() - max;
                history.drain(..excess).collect()
            }
            _ => Vec::new(),
        };

        write_json_atomic(&self.path, &history).await?;

        if !evicted.is_empty() {
            info!(
                "🧹 History cap reached, evicted {} oldest entries",
                evicted.len()
            );
        }
        Ok(evicted)
    }

    /// Remove the entry with `id`, preserving the order of the rest
    ///
    /// Returns the removed entry, or `None` if no entry matched (the file is
    /// left untouched in that case).
    pub async fn remove(&self, id: &str) -> Result<Option<DetectionResult>, StoreError> {
        let _guard = self.lock.write().await;
        let mut history = self.load().await?;

        let Some(position) = history.iter().position(|item| item.id == id) else {
            warn!("⚠️ No history entry to remove for {}", id);
            return Ok(None);
        };

        let removed = history.remove(position);
        write_json_atomic(&self.path, &history).await?;

        info!("✅ Removed {} from history ({} remaining)", id, history.len());
        Ok(Some(removed))
    }

    async fn load(&self) -> Result<Vec<DetectionResult>, StoreError> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }
}
