//! Pacing tests.
//!
//! Covered behaviors:
//! - consecutive deliveries are spaced by the configured interval
//! - spacing counts from the end of the previous attempt
//! - an idle stretch earns no burst allowance
//! - a full queue cannot push the rate past one per interval
//! - at most one delivery is in flight at any moment
//! - the optional pre-send delay runs before every delivery

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::harness::{settings_ms, spawn_consumer, DeliveryOutcome, FlakyQueue, MockNotifier};

#[tokio::test(start_paused = true)]
async fn consecutive_deliveries_are_spaced_by_the_interval() {
    let queue = Arc::new(FlakyQueue::new());
    queue.seed(&["a", "b", "c", "d", "e"]).await;
    let notifier = Arc::new(MockNotifier::new());

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 0),
    );

    tokio::time::sleep(Duration::from_millis(600)).await;
    token.cancel();
    handle.await.unwrap();

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 5);
    for pair in deliveries.windows(2) {
        assert_eq!(
            pair[1].attempted_at - pair[0].attempted_at,
            Duration::from_millis(100)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn spacing_counts_from_the_end_of_a_slow_attempt() {
    let queue = Arc::new(FlakyQueue::new());
    queue.seed(&["slow", "next"]).await;

    let notifier = Arc::new(MockNotifier::new());
    notifier.queue_outcome(DeliveryOutcome::DelayThenSucceed(Duration::from_millis(250)));

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 0),
    );

    tokio::time::sleep(Duration::from_millis(600)).await;
    token.cancel();
    handle.await.unwrap();

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 2);
    // 250ms in flight, then the full 100ms interval.
    assert_eq!(
        deliveries[1].attempted_at - deliveries[0].attempted_at,
        Duration::from_millis(350)
    );
}

#[tokio::test(start_paused = true)]
async fn an_idle_stretch_earns_no_burst_allowance() {
    let start = Instant::now();
    let queue = Arc::new(FlakyQueue::new());
    queue.seed(&["a"]).await;
    let notifier = Arc::new(MockNotifier::new());

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 0),
    );

    // Let "a" deliver, then leave the queue empty well past several
    // intervals before the next batch arrives.
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(notifier.delivery_count(), 1);

    queue.seed(&["b", "c", "d"]).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    token.cancel();
    handle.await.unwrap();

    let deliveries = notifier.deliveries();
    assert_eq!(notifier.delivered_texts(), vec!["a", "b", "c", "d"]);

    // "b" waits for the next poll tick; "c" and "d" are already queued
    // behind it and still get a full interval each, not a catch-up burst.
    assert_eq!(deliveries[1].attempted_at - start, Duration::from_millis(600));
    assert_eq!(
        deliveries[2].attempted_at - deliveries[1].attempted_at,
        Duration::from_millis(100)
    );
    assert_eq!(
        deliveries[3].attempted_at - deliveries[2].attempted_at,
        Duration::from_millis(100)
    );
}

#[tokio::test(start_paused = true)]
async fn a_full_queue_cannot_exceed_one_delivery_per_interval() {
    let start = Instant::now();
    let queue = Arc::new(FlakyQueue::new());
    let texts: Vec<String> = (0..30).map(|i| format!("msg-{i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    queue.seed(&refs).await;
    let notifier = Arc::new(MockNotifier::new());

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 0),
    );

    let window = Duration::from_millis(450);
    tokio::time::sleep(window).await;
    token.cancel();
    handle.await.unwrap();

    // Admissions inside the window land at 0, 100, 200, 300 and 400 ms.
    let in_window = notifier
        .deliveries()
        .iter()
        .filter(|d| d.attempted_at - start < window)
        .count();
    assert_eq!(in_window, 5);

    // The message popped just before the cut is still delivered, at the
    // 500ms mark; nothing beyond it is.
    assert_eq!(notifier.delivery_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn at_most_one_delivery_is_in_flight() {
    let queue = Arc::new(FlakyQueue::new());
    queue.seed(&["a", "b", "c", "d"]).await;

    let notifier = Arc::new(MockNotifier::new());
    // Every attempt stays open longer than the interval.
    notifier.set_default_outcome(DeliveryOutcome::DelayThenSucceed(Duration::from_millis(
        150,
    )));

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 0),
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;
    token.cancel();
    handle.await.unwrap();

    assert_eq!(notifier.delivery_count(), 4);
    assert_eq!(notifier.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn pre_send_delay_runs_before_every_delivery() {
    let start = Instant::now();
    let queue = Arc::new(FlakyQueue::new());
    queue.seed(&["a", "b", "c"]).await;
    let notifier = Arc::new(MockNotifier::new());

    let (token, handle) = spawn_consumer(
        queue.clone(),
        notifier.clone(),
        settings_ms(100, 100, 500, 200),
    );

    tokio::time::sleep(Duration::from_millis(1000)).await;
    token.cancel();
    handle.await.unwrap();

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 3);

    // The 200ms delay dominates the 100ms interval, so attempts land at
    // 200, 400 and 600 ms.
    assert_eq!(deliveries[0].attempted_at - start, Duration::from_millis(200));
    assert_eq!(
        deliveries[1].attempted_at - deliveries[0].attempted_at,
        Duration::from_millis(200)
    );
    assert_eq!(
        deliveries[2].attempted_at - deliveries[1].attempted_at,
        Duration::from_millis(200)
    );
}
