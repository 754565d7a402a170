//! Motion feature extraction.

use contracts::{MotionFeature, MotionSample, SensorConfig, REST_MAGNITUDE_G};

/// Converts raw samples into motion deviation features
///
/// There is no error path: every numeric input yields a feature. Framing
/// problems (payloads that do not decode to a sample at all) are the
/// caller's concern.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    /// Raw counts per g
    scale_factor: f64,
}

impl FeatureExtractor {
    /// Create an extractor with the given counts-per-g scale factor
    pub fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    /// Create an extractor from sensor configuration
    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(config.accel_scale_factor)
    }

    /// Extract the motion feature from one sample
    ///
    /// Converts each axis to g, takes the Euclidean magnitude of the vector,
    /// and returns `deviation = |magnitude - 1.0|`.
    pub fn extract(&self, sample: &MotionSample) -> MotionFeature {
        let ax_g = sample.ax as f64 / self.scale_factor;
        let ay_g = sample.ay as f64 / self.scale_factor;
        let az_g = sample.az as f64 / self.scale_factor;

        let magnitude_g = (ax_g * ax_g + ay_g * ay_g + az_g * az_g).sqrt();

        MotionFeature {
            magnitude_g,
            deviation: (magnitude_g - REST_MAGNITUDE_G).abs(),
        }
    }
}
