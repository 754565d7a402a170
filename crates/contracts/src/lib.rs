//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Flow
//! - `MotionSample` (raw counts) → `MotionFeature` (deviation from 1.0 g)
//! - smoothed RMS score → shaped speed → `ControlMessage` on the wire

mod blueprint;
mod error;
mod message;
mod sample;
mod sample_source;
mod tick;

pub use blueprint::*;
pub use error::*;
pub use message::*;
pub use sample::*;
pub use sample_source::{SampleCallback, SampleSource};
pub use tick::*;
