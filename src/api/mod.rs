// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod history;
pub mod http_server;
pub mod predict;
pub mod results;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use history::{delete_history_item_handler, history_handler, DeleteResponse};
pub use http_server::{create_app, start_server, AppState};
pub use predict::predict_handler;
pub use results::{full_results_handler, results_handler, results_image_handler};
