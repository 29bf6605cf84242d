//! Axum-based HTTP relay — the externally reachable boundary.
//!
//! `run()` drives the axum event loop; a [`CancellationToken`] is wired to
//! axum's graceful shutdown. Every response passes through the
//! cache-suppression middleware so clients and intermediaries never cache
//! chat replies.
//!
//! ## URL layout
//!
//! ```text
//! POST /api/chat     — the chat relay endpoint
//! GET  /favicon.ico  → 204
//! GET  /             → embedded chat page
//! ```

mod api;
mod ui;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::agent::ConversationalAgent;
use crate::error::AppError;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — the agent is reference-counted.
#[derive(Clone)]
pub struct RelayState {
    pub agent: Arc<ConversationalAgent>,
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `bind_addr` and serve until `shutdown` is cancelled.
pub async fn run(
    bind_addr: &str,
    agent: Arc<ConversationalAgent>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(RelayState { agent });

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Relay(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "chat relay listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Relay(format!("server error: {e}")))?;

    info!("chat relay shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Assemble the full router. Public so integration tests can drive the
/// relay without binding a socket.
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/api/chat", post(api::chat))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/", get(ui::root))
        .layer(middleware::from_fn(no_cache_headers))
        .with_state(state)
}

/// Stamp cache-suppression headers on every response.
async fn no_cache_headers(request: axum::extract::Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}
