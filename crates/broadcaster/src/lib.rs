//! # Broadcaster
//!
//! TCP push service for the shaped speed scalar. Binds a listener, accepts at
//! most `max_connections` consumers, and on every tick reads the latest
//! smoothed score, runs the speed shaper and writes one newline-terminated
//! JSON message to every open connection.
//!
//! Failure policy: a bind failure is fatal at startup; everything after that
//! is connection-scoped. A consumer whose write fails is closed and removed
//! without affecting other consumers or the tick cadence. Zero consumers is a
//! normal state in which shaping still runs, so momentum state stays current.

mod error;
mod metrics;
mod service;

pub use crate::metrics::{BroadcastSnapshot, BroadcasterMetrics};
pub use error::BroadcastError;
pub use service::{BoundBroadcaster, BroadcastStats, StreamBroadcaster};
