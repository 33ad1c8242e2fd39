//! Router and listener.

use crate::handlers::{health::handle_health, messages::handle_messages, stream::handle_stream};
use crate::state::ServerState;
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/messages", post(handle_messages).get(handle_stream))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    info!(addr = %addr, "step: binding http server");
    let app = build_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        addr = %addr,
        "step: http server listening, POST /api/messages or connect a WebSocket to the same path"
    );
    axum::serve(listener, app).await.map_err(|err| {
        error!(addr = %addr, error = %err, "HTTP server terminated unexpectedly");
        anyhow::anyhow!(err)
    })
}
