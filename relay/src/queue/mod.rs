//! Message queue abstraction and backends.
//!
//! The queue is a named FIFO list of opaque byte payloads. The web layer
//! pushes onto the head, the consumer pops from the tail, so entries come
//! out in arrival order. Backends are swappable behind [`MessageQueue`].

mod memory;
mod redis;

use async_trait::async_trait;

use crate::error::QueueError;

pub use memory::InMemoryQueue;
pub use redis::RedisQueue;

/// Redis list the relay drains unless `QUEUE_KEY` overrides it.
pub const DEFAULT_QUEUE_KEY: &str = "telegram-messages";

/// A durable FIFO queue of message payloads.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Append a message to the head of the queue.
    async fn push(&self, message: &str) -> Result<(), QueueError>;

    /// Remove and return the oldest message, or `None` when empty.
    ///
    /// Payloads are returned as raw bytes; callers decide how to decode
    /// them.
    async fn pop(&self) -> Result<Option<Vec<u8>>, QueueError>;
}
