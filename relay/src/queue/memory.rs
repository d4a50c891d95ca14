//! In-memory queue backend for tests and local runs without Redis.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::QueueError;
use crate::queue::MessageQueue;

/// Queue backend holding messages in process memory.
///
/// Same head/tail orientation as the Redis list, so ordering behaves
/// identically. Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryQueue {
    entries: Mutex<VecDeque<Vec<u8>>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw payload, bypassing the text-only ingest path.
    pub async fn push_raw(&self, payload: Vec<u8>) {
        self.entries.lock().await.push_front(payload);
    }

    /// Number of queued messages.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn push(&self, message: &str) -> Result<(), QueueError> {
        self.entries
            .lock()
            .await
            .push_front(message.as_bytes().to_vec());
        Ok(())
    }

    async fn pop(&self) -> Result<Option<Vec<u8>>, QueueError> {
        Ok(self.entries.lock().await.pop_back())
    }
}
