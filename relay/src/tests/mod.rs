//! Behavior tests for the relay.
//!
//! Test organization:
//!
//! - `harness.rs`   - mock notifier and scriptable queue doubles
//! - `ingestion.rs` - HTTP endpoints: validation, response bodies, health
//! - `routes.rs`    - router wiring, driven with `tower::ServiceExt`
//! - `ordering.rs`  - messages reach the notifier in arrival order
//! - `pacing.rs`    - fixed-interval spacing, one delivery in flight
//! - `isolation.rs` - at-most-once delivery, failures stay contained
//! - `backoff.rs`   - idle polling and queue-error backoff
//! - `shutdown.rs`  - cancellation semantics
//!
//! Timing tests run on a paused tokio clock, so asserted intervals are
//! exact rather than approximate.


mod pacing;
