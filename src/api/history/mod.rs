// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! History endpoints: GET /history and DELETE /history/{item_id}

pub mod handler;
pub mod response;

pub use handler::{delete_history_item_handler, history_handler};
pub use response::DeleteResponse;
