//! Redis-backed queue.
//!
//! Messages live in a single Redis list: `LPUSH` on ingest, `RPOP` on
//! consume. The connection is established lazily and re-established after
//! a command failure.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::QueueError;
use crate::queue::MessageQueue;

/// Queue backend storing messages in a Redis list.
pub struct RedisQueue {
    client: Client,
    key: String,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisQueue {
    /// Create a queue over the list `key` at `url`.
    ///
    /// Validates the URL but does not connect; the first operation does.
    pub fn new(url: &str, key: &str) -> Result<Self, QueueError> {
        let client = Client::open(url)?;
        debug!(url_length = url.len(), queue_key = %key, "redis_client_created");
        Ok(Self {
            client,
            key: key.to_string(),
            conn: RwLock::new(None),
        })
    }

    /// Get the cached connection, dialing Redis if there is none yet.
    async fn connection(&self) -> Result<MultiplexedConnection, QueueError> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.conn.write().await;
        // Another task may have connected while we waited for the lock.
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        info!(queue_key = %self.key, "redis_connected");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the cached connection so the next operation reconnects.
    async fn invalidate(&self) {
        self.conn.write().await.take();
    }
}

#[async_trait]
impl MessageQueue for RedisQueue {
    async fn push(&self, message: &str) -> Result<(), QueueError> {
        let mut conn = self.connection().await?;
        let result: RedisResult<()> = conn.lpush(&self.key, message).await;
        match result {
            Ok(()) => {
                debug!(
                    queue_key = %self.key,
                    message_length = message.len(),
                    "message_queued"
                );
                Ok(())
            }
            Err(err) => {
                self.invalidate().await;
                Err(err.into())
            }
        }
    }

    async fn pop(&self) -> Result<Option<Vec<u8>>, QueueError> {
        let mut conn = self.connection().await?;
        let result: RedisResult<Option<Vec<u8>>> = conn.rpop(&self.key, None).await;
        match result {
            Ok(entry) => Ok(entry),
            Err(err) => {
                self.invalidate().await;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_a_redis_url() {
        let queue = RedisQueue::new("redis://localhost:6379", "messages");
        assert!(queue.is_ok());
    }

    #[test]
    fn new_rejects_a_malformed_url() {
        let queue = RedisQueue::new("not-a-redis-url", "messages");
        assert!(queue.is_err());
    }
}
