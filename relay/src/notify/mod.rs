//! Outbound notification channels.

mod telegram;

use async_trait::async_trait;

use crate::error::NotifyError;

pub use telegram::TelegramNotifier;

/// A channel that can deliver one text message.
///
/// Implementations perform a single delivery attempt; retry policy is the
/// caller's concern.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;
}
