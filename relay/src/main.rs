//! Pigeon Relay - queue-backed Telegram message relay.
//!
//! Runs both halves of the relay in one process:
//! - a web server accepting messages on `POST /send-message`
//! - a background consumer delivering queued messages to Telegram,
//!   one at a time, paced by a fixed interval

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pigeon::web::AppState;
use pigeon::{Config, Consumer, ConsumerSettings, RedisQueue, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        queue_key = %config.queue_key,
        send_interval_ms = config.send_interval.as_millis() as u64,
        idle_poll_ms = config.idle_poll.as_millis() as u64,
        error_backoff_ms = config.error_backoff.as_millis() as u64,
        "config_loaded"
    );

    // Queue and notifier
    let queue = Arc::new(
        RedisQueue::new(&config.redis_url, &config.queue_key)
            .context("Failed to create Redis queue")?,
    );
    let notifier = Arc::new(
        TelegramNotifier::new(&config.bot_token, &config.chat_id)
            .context("Failed to create Telegram notifier")?,
    );

    // Background consumer
    let shutdown = CancellationToken::new();
    let consumer = Consumer::new(queue.clone(), notifier, ConsumerSettings::from(&config));
    let consumer_handle = tokio::spawn({
        let token = shutdown.clone();
        async move { consumer.run(token).await }
    });

    // Web server
    let state = AppState::new(queue);
    let app = pigeon::web::router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the consumer once the server has drained
    shutdown.cancel();
    consumer_handle.await.context("Consumer task failed")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_shutting_down");
}
