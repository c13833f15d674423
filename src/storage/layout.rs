// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-disk layout of the results directory

use std::path::{Path, PathBuf};

/// Name of the single-slot latest result file
pub const RESULTS_FILE_NAME: &str = "results.json";

/// Name of the history file
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Where results, history and annotated images live, and how images are published
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    dir: PathBuf,
    url_base: String,
}

impl ResultsLayout {
    /// `static_url_prefix` is the URL the static root is published under (e.g. `/static`)
    pub fn new(dir: impl Into<PathBuf>, static_url_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            url_base: format!("{}/results", static_url_prefix.trim_end_matches('/')),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn results_file(&self) -> PathBuf {
        self.dir.join(RESULTS_FILE_NAME)
    }

    pub fn history_file(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE_NAME)
    }

    pub fn image_file_name(id: &str) -> String {
        format!("{}_annotated.jpg", id)
    }

    /// Annotated image path for a result id
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.dir.join(Self::image_file_name(id))
    }

    /// Public URL of the annotated image for a result id
    pub fn image_url(&self, id: &str) -> String {
        format!("{}/{}", self.url_base, Self::image_file_name(id))
    }

    /// Create the results directory if needed
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }
}
