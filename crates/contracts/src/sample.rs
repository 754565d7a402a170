//! MotionSample - Ingestion input
//!
//! Raw accelerometer notification payload and its derived feature.

use serde::{Deserialize, Serialize};

/// Acceleration magnitude of a body at rest, in g
pub const REST_MAGNITUDE_G: f64 = 1.0;

/// Raw three-axis accelerometer sample
///
/// Values are raw sensor counts as delivered by the board. A notification
/// may omit any axis; missing axes decode as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionSample {
    /// X axis, raw counts
    #[serde(default)]
    pub ax: i32,

    /// Y axis, raw counts
    #[serde(default)]
    pub ay: i32,

    /// Z axis, raw counts
    #[serde(default)]
    pub az: i32,
}

impl MotionSample {
    /// Create a sample from explicit axis counts
    pub fn new(ax: i32, ay: i32, az: i32) -> Self {
        Self { ax, ay, az }
    }
}

/// Feature derived from a single sample
///
/// `deviation` is the acceleration attributable to motion rather than
/// gravity: `|magnitude_g - 1.0|`, always non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionFeature {
    /// Acceleration vector magnitude in g
    pub magnitude_g: f64,

    /// Absolute deviation from the 1.0 g rest magnitude
    pub deviation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_missing_axes_default_to_zero() {
        let sample: MotionSample = serde_json::from_str(r#"{"az": 4096}"#).unwrap();
        assert_eq!(sample, MotionSample::new(0, 0, 4096));
    }

    #[test]
    fn test_sample_empty_object() {
        let sample: MotionSample = serde_json::from_str("{}").unwrap();
        assert_eq!(sample, MotionSample::default());
    }

    #[test]
    fn test_sample_extra_fields_ignored() {
        let sample: MotionSample =
            serde_json::from_str(r#"{"ax": 1, "ay": -2, "az": 3, "gx": 99}"#).unwrap();
        assert_eq!(sample, MotionSample::new(1, -2, 3));
    }
}
