// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for detection service operations

use thiserror::Error;

use crate::storage::StoreError;
use crate::vision::ImageError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Upload could not be decoded as an image
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    /// Requested record or file does not exist
    #[error("{0}")]
    NotFound(String),

    /// No detection model is loaded
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Store access failed
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Inference, encoding or file write failed
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        ServiceError::Internal(msg.to_string())
    }
}
