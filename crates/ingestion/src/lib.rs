//! # Ingestion
//!
//! Event-driven sample intake. A `SampleSource` pushes raw notification
//! payloads into a `SampleHandler`, which decodes, extracts the motion
//! feature, updates the RMS window and publishes the smoothed score — all
//! inside the source's callback, without blocking or doing I/O.
//!
//! A malformed payload is dropped with a logged warning; nothing in this
//! crate propagates a per-notification failure outward.

mod decode;
mod error;
mod handler;
mod metrics;
mod mock;

pub use crate::metrics::{IngestionMetrics, MetricsSnapshot};
pub use decode::decode_sample;
pub use error::{IngestionError, Result};
pub use handler::SampleHandler;
pub use mock::MockSampleSource;
