//! Storedesk HTTP server
//!
//! Exposes the permission-scoped global search over HTTP:
//! - `GET /search?q=<term>[&types=a,b][&limit=n]`
//! - `GET /me`
//! - `GET /health`

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::build_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind address {}", addr))?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
