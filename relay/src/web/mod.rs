//! Web server module for message ingestion.
//!
//! This module provides a thin web server that:
//! - Accepts messages over `POST /send-message`
//! - Validates and immediately enqueues them
//! - Answers `GET /health` regardless of queue state
//!
//! Pacing and Telegram delivery happen in the background consumer.

pub mod handlers;

pub use handlers::{health, send_message, AppState, ErrorResponse, StatusResponse};

use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/send-message", post(send_message))
        .with_state(state)
}
