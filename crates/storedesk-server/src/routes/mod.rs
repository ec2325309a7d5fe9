//! HTTP route handlers and router configuration

mod admin;
mod search;

pub use admin::{HealthResponse, MeResponse};
pub use search::{SearchParams, SearchResponse};

use crate::state::AppState;
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the main application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(admin::health))
        .route("/me", get(admin::me))
        .route("/search", get(search::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
