//! Mock sample source - synthetic notifications without hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use contracts::{MockProfile, MotionSample, SampleCallback, SampleSource, SensorConfig};
use tracing::{debug, error};

/// Thread-driven source emitting synthetic accelerometer notifications
///
/// Payloads are the same JSON objects a real board notification carries, so
/// the full decode path is exercised. The `Rest` profile holds 1.0 g on the
/// z axis; `Shake` superimposes a sine wave on the z axis magnitude.
pub struct MockSampleSource {
    source_id: String,
    sample_rate_hz: f64,
    scale_factor: f64,
    profile: MockProfile,
    listening: Arc<AtomicBool>,
}

impl MockSampleSource {
    /// Create a mock source
    pub fn new(
        source_id: impl Into<String>,
        sample_rate_hz: f64,
        scale_factor: f64,
        profile: MockProfile,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            sample_rate_hz,
            scale_factor,
            profile,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a mock source from sensor configuration
    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(
            config.source_id.clone(),
            config.sample_rate_hz,
            config.accel_scale_factor,
            config.mock_profile,
        )
    }
}

impl SampleSource for MockSampleSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: SampleCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let source_id = self.source_id.clone();
        let listening = Arc::clone(&self.listening);
        let period = Duration::from_secs_f64(1.0 / self.sample_rate_hz);
        let scale_factor = self.scale_factor;
        let profile = self.profile;

        debug!(source_id = %source_id, rate_hz = self.sample_rate_hz, "mock source starting");

        std::thread::spawn(move || {
            let mut callback = callback;
            let mut tick = 0u64;

            while listening.load(Ordering::Relaxed) {
                let t = tick as f64 * period.as_secs_f64();
                let sample = synth_sample(profile, scale_factor, t);

                match serde_json::to_vec(&sample) {
                    Ok(payload) => callback(Bytes::from(payload)),
                    Err(e) => error!(source_id = %source_id, error = %e, "mock encode failed"),
                }

                tick += 1;
                std::thread::sleep(period);
            }

            debug!(source_id = %source_id, samples = tick, "mock source stopped");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

/// Synthesize the raw sample for time `t` seconds
fn synth_sample(profile: MockProfile, scale_factor: f64, t: f64) -> MotionSample {
    let magnitude_g = match profile {
        MockProfile::Rest => 1.0,
        MockProfile::Shake {
            amplitude_g,
            wave_hz,
        } => 1.0 + amplitude_g * (std::f64::consts::TAU * wave_hz * t).sin(),
    };

    MotionSample::new(0, 0, (magnitude_g * scale_factor).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_rest_profile_emits_one_g() {
        let sample = synth_sample(MockProfile::Rest, 4096.0, 0.37);
        assert_eq!(sample, MotionSample::new(0, 0, 4096));
    }

    #[test]
    fn test_shake_profile_oscillates() {
        let profile = MockProfile::Shake {
            amplitude_g: 0.5,
            wave_hz: 1.0,
        };
        // Quarter period: sin peaks, magnitude 1.5 g
        let peak = synth_sample(profile, 4096.0, 0.25);
        assert_eq!(peak.az, 6144);
        // Half period: back at rest
        let rest = synth_sample(profile, 4096.0, 0.5);
        assert_eq!(rest.az, 4096);
    }

    #[test]
    fn test_listen_delivers_decodable_payloads() {
        let source = MockSampleSource::new("mock", 200.0, 4096.0, MockProfile::Rest);
        let received: Arc<Mutex<Vec<Bytes>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        source.listen(Box::new(move |payload| {
            sink.lock().unwrap().push(payload);
        }));
        assert!(source.is_listening());

        std::thread::sleep(Duration::from_millis(100));
        source.stop();
        assert!(!source.is_listening());

        let payloads = received.lock().unwrap();
        assert!(!payloads.is_empty());
        for payload in payloads.iter() {
            let sample: MotionSample = serde_json::from_slice(payload).unwrap();
            assert_eq!(sample.az, 4096);
        }
    }

    #[test]
    fn test_listen_is_idempotent() {
        let source = MockSampleSource::new("mock", 500.0, 4096.0, MockProfile::Rest);
        source.listen(Box::new(|_| {}));
        // Second listen is a no-op; the replacement callback is dropped
        source.listen(Box::new(|_| panic!("second callback must not run")));

        std::thread::sleep(Duration::from_millis(30));
        source.stop();
    }
}
