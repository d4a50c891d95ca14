//! Delivery rate limiter.
//!
//! A single-lane gate in front of the notifier: at most one delivery is in
//! flight at a time, and successive deliveries are spaced by a fixed
//! interval. Waiters are admitted in the order they called
//! [`RateLimiter::acquire`].

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep_until, Instant};

/// Gate bounding deliveries to one per fixed interval.
///
/// The interval is fixed at construction. Internally this is a fair async
/// mutex around the completion instant of the last admitted delivery:
/// holding the lock is the "one in flight" invariant, and tokio's mutex
/// hands the lock to waiters in FIFO order.
pub struct RateLimiter {
    interval: Duration,
    last_done: Mutex<Option<Instant>>,
}

/// Admission handle returned by [`RateLimiter::acquire`].
///
/// Hold it for the duration of the delivery attempt. Dropping it records
/// the completion instant that the next admission is spaced against.
pub struct SendPermit<'a> {
    slot: MutexGuard<'a, Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting one operation per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_done: Mutex::new(None),
        }
    }

    /// Wait until the gate admits, then return the permit.
    ///
    /// Suspends until no other delivery is in flight and at least the
    /// configured interval has elapsed since the previous delivery
    /// finished. The very first admission is immediate.
    pub async fn acquire(&self) -> SendPermit<'_> {
        let slot = self.last_done.lock().await;
        if let Some(last) = *slot {
            sleep_until(last + self.interval).await;
        }
        SendPermit { slot }
    }
}

impl Drop for SendPermit<'_> {
    fn drop(&mut self) {
        *self.slot = Some(Instant::now());
    }
}
