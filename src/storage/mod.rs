// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! File-backed persistence for detection results
//!
//! - `ResultStore` - single-slot `results.json` holding the latest result
//! - `HistoryStore` - `history.json` array of every retained result
//! - `ResultsLayout` - where results, history and annotated images live
//!
//! Each store serializes its own file access and replaces files atomically,
//! so concurrent requests never observe a torn file.

pub mod errors;
pub mod history_store;
pub mod json_file;
pub mod layout;
pub mod result_store;

pub use errors::StoreError;
pub use history_store::HistoryStore;
pub use layout::ResultsLayout;
pub use result_store::ResultStore;
