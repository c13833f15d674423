// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod detection;
pub mod storage;
pub mod version;
pub mod vision;

pub use config::NodeConfig;
pub use detection::{DetectionResult, DetectionService, ServiceError};
pub use storage::{HistoryStore, ResultStore, ResultsLayout, StoreError};
pub use vision::{Detection, DetectionEngine, DetectionModelManager};
