//! Axum handler for `POST /api/chat`.
//!
//! The one validated input is the message itself: empty or whitespace-only
//! text is a 400. Everything downstream of validation — including provider
//! failures — maps to a 200 whose `reply` is a conversational apology, so
//! the chat surface degrades instead of erroring. Tests pin that contract.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::RelayState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    message: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /api/chat
pub(super) async fn chat(
    State(state): State<RelayState>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "empty message" })))
            .into_response();
    }

    match state.agent.respond(message).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        Err(e) => {
            warn!(error = %e, "generation failed — answering with degraded reply");
            let reply = format!("Sorry, an error occurred: {e}");
            (StatusCode::OK, Json(json!({ "reply": reply }))).into_response()
        }
    }
}
