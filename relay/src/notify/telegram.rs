//! Telegram delivery via the Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};
use tracing::debug;
use url::Url;

use crate::error::NotifyError;
use crate::notify::Notifier;

/// Notifier sending messages to a fixed Telegram chat.
///
/// Messages are sent with HTML parse mode, so basic tags like `<b>` and
/// `<code>` render in the chat.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id` using `token`.
    ///
    /// `chat_id` is either a numeric chat id or an `@channelusername`.
    pub fn new(token: &str, chat_id: &str) -> Result<Self, NotifyError> {
        if token.trim().is_empty() {
            return Err(NotifyError::Config("bot token cannot be empty".into()));
        }

        Ok(Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id)?,
        })
    }

    /// Point the notifier at a different Bot API endpoint.
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let sent = self
            .bot
            .send_message(self.recipient.clone(), text)
            .parse_mode(ParseMode::Html)
            .await?;

        debug!(message_id = sent.id.0, "telegram_message_sent");
        Ok(())
    }
}

fn parse_recipient(chat_id: &str) -> Result<Recipient, NotifyError> {
    let chat_id = chat_id.trim();
    if chat_id.is_empty() {
        return Err(NotifyError::Config("chat id cannot be empty".into()));
    }

    if chat_id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }

    chat_id
        .parse::<i64>()
        .map(ChatId)
        .map(Recipient::Id)
        .map_err(|_| {
            NotifyError::Config(format!(
                "chat id must be numeric or an @channelusername, got {chat_id:?}"
            ))
        })
}
