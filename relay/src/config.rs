//! Configuration module for environment variable parsing.
//!
//! All settings come from environment variables. Pacing knobs default to
//! the values the service shipped with; the Telegram settings have no
//! sane default and make [`Config::from_env`] fallible.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the HTTP server to listen on
    pub port: u16,

    /// Redis connection URL
    pub redis_url: String,

    /// Name of the Redis list holding pending messages
    pub queue_key: String,

    /// Telegram Bot API token (required)
    pub bot_token: String,

    /// Telegram destination: numeric chat id (negative for groups and
    /// channels) or an `@username` (required)
    pub chat_id: String,

    /// Minimum spacing between deliveries
    pub send_interval: Duration,

    /// Sleep between polls while the queue is empty
    pub idle_poll: Duration,

    /// Sleep after a queue error before polling again
    pub error_backoff: Duration,

    /// Optional fixed delay before each delivery (0 = off)
    pub pre_send_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails only when a required variable is missing; malformed optional
    /// values fall back to their defaults with a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            port: parse_port(3000),

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            queue_key: env::var("QUEUE_KEY")
                .unwrap_or_else(|_| crate::queue::DEFAULT_QUEUE_KEY.to_string()),

            bot_token: require("TELEGRAM_BOT_TOKEN")?,

            chat_id: require("TELEGRAM_CHAT_ID")?,

            send_interval: parse_duration_ms("SEND_INTERVAL_MS", 1000),

            idle_poll: parse_duration_ms("IDLE_POLL_MS", 1000),

            error_backoff: parse_duration_ms("ERROR_BACKOFF_MS", 5000),

            pre_send_delay: parse_duration_ms("PRE_SEND_DELAY_MS", 0),
        };

        if config.error_backoff <= config.idle_poll {
            warn!(
                error_backoff_ms = config.error_backoff.as_millis() as u64,
                idle_poll_ms = config.idle_poll.as_millis() as u64,
                "ERROR_BACKOFF_MS should be longer than IDLE_POLL_MS"
            );
        }

        Ok(config)
    }
}

/// Read a required, non-empty environment variable.
fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse the listen port from `PORT`.
fn parse_port(default: u16) -> u16 {
    let raw = match env::var("PORT") {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(value = %raw, "Invalid PORT, using default");
            default
        }
    }
}

/// Parse a millisecond duration from an environment variable.
fn parse_duration_ms(name: &str, default_ms: u64) -> Duration {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return Duration::from_millis(default_ms),
    };

    match raw.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid duration, using default");
            Duration::from_millis(default_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_valid() {
        env::set_var("TEST_DURATION", "250");
        let result = parse_duration_ms("TEST_DURATION", 0);
        assert_eq!(result, Duration::from_millis(250));
        env::remove_var("TEST_DURATION");
    }

    #[test]
    fn test_parse_duration_default() {
        let result = parse_duration_ms("NONEXISTENT_DURATION_VAR", 1500);
        assert_eq!(result, Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_duration_invalid() {
        env::set_var("TEST_BAD_DURATION", "soon");
        let result = parse_duration_ms("TEST_BAD_DURATION", 700);
        assert_eq!(result, Duration::from_millis(700));
        env::remove_var("TEST_BAD_DURATION");
    }

    #[test]
    fn test_require_rejects_blank() {
        env::set_var("TEST_BLANK_REQUIRED", "   ");
        assert!(require("TEST_BLANK_REQUIRED").is_err());
        env::remove_var("TEST_BLANK_REQUIRED");
    }

    #[test]
    fn test_require_missing() {
        let err = require("NONEXISTENT_REQUIRED_VAR").unwrap_err();
        assert!(err.to_string().contains("NONEXISTENT_REQUIRED_VAR"));
    }
}
