//! TickMeta - Broadcaster output metadata
//!
//! Per-tick diagnostics emitted alongside each shaped speed.

use serde::{Deserialize, Serialize};

/// Metadata for one broadcast tick
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickMeta {
    /// Smoothed RMS score observed this tick
    pub score: f64,

    /// Target speed after dead-zone / scaling, before momentum
    pub target_speed: f64,

    /// Speed actually applied and sent this tick
    pub applied_speed: f64,

    /// Open consumer connections at send time
    pub connections: usize,

    /// Whether the score tripped the sensor-fault threshold
    pub fault: bool,
}
