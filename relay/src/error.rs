//! Error types for the relay.

use thiserror::Error;

/// Configuration error raised while loading settings from the environment.
///
/// Only missing required variables are fatal; malformed optional values
/// fall back to defaults with a warning instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Error raised by a queue store operation.
#[derive(Error, Debug)]
pub enum QueueError {
    /// Redis connection or command error
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Store unreachable for a non-Redis reason (used by test doubles
    /// and alternative backends)
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by a delivery attempt.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Telegram Bot API request failed
    #[error("telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Invalid notifier configuration (bad token or chat id)
    #[error("notifier configuration error: {0}")]
    Config(String),

    /// The channel rejected the message (used by test doubles)
    #[error("delivery rejected: {0}")]
    Rejected(String),
}
