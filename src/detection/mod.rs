// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection service
//!
//! Ties the detection engine to the result and history stores. HTTP
//! handlers are thin adapters over [`DetectionService`].

pub mod errors;
pub mod service;
pub mod types;

pub use errors::ServiceError;
pub use service::{DetectionService, FullResult, HealthReport};
pub use types::{new_result_id, DetectionResult};
