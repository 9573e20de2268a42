//! HTTP API for the note service

pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub use error::AppError;
pub use handlers::{NotesState, ServerState};
pub use routes::create_router;

use crate::NoteService;

/// Serves the API on `addr` until Ctrl-C.
pub async fn serve(service: NoteService, addr: SocketAddr) -> Result<()> {
    let app = create_router(ServerState::new(service));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
