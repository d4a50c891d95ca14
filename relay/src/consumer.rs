//! Queue consumer loop.
//!
//! Pops one message at a time, paces it through the rate limiter, and
//! hands it to the notifier. Delivery is at most once: a failed attempt is
//! logged and the message dropped, never requeued.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::limiter::RateLimiter;
use crate::notify::Notifier;
use crate::queue::MessageQueue;

/// Timing knobs for the consumer loop.
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    /// Minimum spacing between deliveries.
    pub send_interval: Duration,
    /// Sleep after finding the queue empty.
    pub idle_poll: Duration,
    /// Sleep after a queue error before polling again.
    pub error_backoff: Duration,
    /// Extra delay before each delivery. Zero disables it.
    pub pre_send_delay: Duration,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_millis(1000),
            idle_poll: Duration::from_millis(1000),
            error_backoff: Duration::from_millis(5000),
            pre_send_delay: Duration::ZERO,
        }
    }
}

impl From<&Config> for ConsumerSettings {
    fn from(config: &Config) -> Self {
        Self {
            send_interval: config.send_interval,
            idle_poll: config.idle_poll,
            error_backoff: config.error_backoff,
            pre_send_delay: config.pre_send_delay,
        }
    }
}

/// The delivery worker.
pub struct Consumer {
    queue: Arc<dyn MessageQueue>,
    notifier: Arc<dyn Notifier>,
    limiter: RateLimiter,
    settings: ConsumerSettings,
}

impl Consumer {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        notifier: Arc<dyn Notifier>,
        settings: ConsumerSettings,
    ) -> Self {
        let limiter = RateLimiter::new(settings.send_interval);
        Self {
            queue,
            notifier,
            limiter,
            settings,
        }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// The loop survives every queue and delivery error. Cancellation is
    /// honored between iterations and during idle or backoff sleeps; a
    /// message already popped is still delivered before the loop exits.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            send_interval_ms = self.settings.send_interval.as_millis() as u64,
            idle_poll_ms = self.settings.idle_poll.as_millis() as u64,
            error_backoff_ms = self.settings.error_backoff.as_millis() as u64,
            "consumer_started"
        );

        while !shutdown.is_cancelled() {
            match self.queue.pop().await {
                Ok(Some(payload)) => {
                    let text = decode_payload(payload);
                    self.deliver(&text).await;
                }
                Ok(None) => {
                    self.pause(&shutdown, self.settings.idle_poll).await;
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        backoff_ms = self.settings.error_backoff.as_millis() as u64,
                        "dequeue_failed"
                    );
                    self.pause(&shutdown, self.settings.error_backoff).await;
                }
            }
        }

        info!("consumer_stopped");
    }

    /// One paced delivery attempt. Failures are logged, not returned.
    async fn deliver(&self, text: &str) {
        if !self.settings.pre_send_delay.is_zero() {
            sleep(self.settings.pre_send_delay).await;
        }

        let _permit = self.limiter.acquire().await;
        match self.notifier.deliver(text).await {
            Ok(()) => {
                info!(message_length = text.len(), "message_delivered");
            }
            Err(err) => {
                error!(
                    error = %err,
                    message_length = text.len(),
                    "delivery_failed"
                );
            }
        }
    }

    /// Sleep that wakes early on shutdown.
    async fn pause(&self, shutdown: &CancellationToken, duration: Duration) {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = sleep(duration) => {}
        }
    }
}

/// Decode a queue payload into text, replacing invalid UTF-8.
fn decode_payload(payload: Vec<u8>) -> String {
    match String::from_utf8(payload) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            warn!(payload_length = bytes.len(), "payload_not_utf8");
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}
