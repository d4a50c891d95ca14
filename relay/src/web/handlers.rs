//! HTTP endpoint handlers.
//!
//! These handlers are designed to be thin - they only:
//! 1. Validate the request shape
//! 2. Enqueue the message text
//! 3. Return immediately
//!
//! Pacing and Telegram delivery happen in the background consumer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::queue::MessageQueue;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<dyn MessageQueue>,
}

impl AppState {
    pub fn new(queue: Arc<dyn MessageQueue>) -> Self {
        Self { queue }
    }
}

/// Success response body.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Failure response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint.
///
/// Always returns 200; it reports process liveness, not queue reachability.
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "OK" })
}

// =============================================================================
// Message Ingestion
// =============================================================================

/// Message ingestion endpoint.
///
/// Expects `{"message": <text>}`. The message is queued for later delivery;
/// a 200 here means "accepted", not "sent".
pub async fn send_message(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Response {
    // A body that is not JSON at all also lands in the invalid branch.
    let Some(Json(body)) = body else {
        warn!("send_message_unreadable_body");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid message",
            }),
        )
            .into_response();
    };

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());

    let Some(message) = message else {
        warn!(
            has_message_field = body.get("message").is_some(),
            "send_message_invalid"
        );
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid message",
            }),
        )
            .into_response();
    };

    info!(message_length = message.len(), "send_message_received");

    if let Err(e) = state.queue.push(message).await {
        error!(error = %e, "message_enqueue_failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to queue message",
            }),
        )
            .into_response();
    }

    info!(message_length = message.len(), "message_enqueued");

    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "Message queued",
        }),
    )
        .into_response()
}
