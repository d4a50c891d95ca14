//! Pigeon - Rate-limited Telegram delivery relay.
//!
//! This library backs the `pigeon-relay` binary, which runs two halves in
//! one process:
//! - a thin web server that accepts messages and queues them in Redis
//! - a consumer that drains the queue one message at a time, paced by a
//!   fixed-interval rate limiter, and delivers to a Telegram chat
//!
//! ## Architecture
//!
//! ```text
//! POST /send-message → Queue (Redis list) → Consumer → Rate limiter → Telegram
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod limiter;
pub mod notify;
pub mod queue;
pub mod web;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::Config;
pub use consumer::{Consumer, ConsumerSettings};
pub use error::{ConfigError, NotifyError, QueueError};
pub use limiter::RateLimiter;
pub use notify::{Notifier, TelegramNotifier};
pub use queue::{InMemoryQueue, MessageQueue, RedisQueue, DEFAULT_QUEUE_KEY};
pub use web::AppState;
