//! HTTP API.
//!
//! [`router`] builds the full axum application over an [`AppState`]. Every
//! handler answers JSON; failures are `{"message": ...}` bodies produced by
//! [`ApiError`].

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::clock::Clock;
use crate::store::Store;

mod auth;
mod chat;
pub mod error;
mod files;

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            store,
            clock,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health_endpoint))
        .route("/api/whoami", get(auth::handle_whoami))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/register", post(auth::handle_register))
        .route(
            "/api/files",
            get(files::handle_list_files).post(files::handle_create_file),
        )
        .route(
            "/api/files/{id}",
            get(files::handle_get_file)
                .put(files::handle_update_file)
                .delete(files::handle_delete_file),
        )
        .route(
            "/api/recent-files",
            get(files::handle_list_recent_files).post(files::handle_add_recent_file),
        )
        .route("/api/chat/price", get(chat::handle_price))
        .route("/api/chat/blockchain", post(chat::handle_blockchain))
        .route("/api/blockchain/block/{tag}", get(chat::handle_raw_block))
        .with_state(state)
}

/// Status reported by a live server.
pub const HEALTHY: &str = "healthy";

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

/// Handler for GET /health
async fn handle_health_endpoint() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTHY.to_string(),
    })
}
