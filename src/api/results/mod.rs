// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Latest result endpoints: /results, /results/full, /results/image

pub mod handler;

pub use handler::{full_results_handler, results_handler, results_image_handler};
