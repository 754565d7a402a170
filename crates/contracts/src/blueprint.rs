//! PipelineBlueprint - Config Loader output
//!
//! Describes the full pipeline configuration: server endpoint, sensor
//! conversion constants, smoothing window, speed shaping and consumer-side
//! connection tuning. Every section has defaults matching the reference
//! deployment, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline configuration blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Broadcast server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Sensor source and conversion settings
    #[serde(default)]
    pub sensor: SensorConfig,

    /// RMS smoothing settings
    #[serde(default)]
    pub smoothing: SmoothingConfig,

    /// Speed shaping settings
    #[serde(default)]
    pub shaping: ShapingConfig,

    /// Consumer-side connection settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Broadcast server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Concurrent consumer connections; excess connects are closed on accept
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Broadcast tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    65432
}

fn default_max_connections() -> usize {
    1
}

fn default_tick_interval_ms() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_connections: default_max_connections(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Sensor source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Source backend
    #[serde(default)]
    pub source: SourceKind,

    /// Source identifier (used in logs and decode errors)
    #[serde(default = "default_source_id")]
    pub source_id: String,

    /// Raw counts per g (MPU6050 at ±8g: 4096)
    #[serde(default = "default_accel_scale_factor")]
    pub accel_scale_factor: f64,

    /// Notification rate of the source in Hz (mock source pacing)
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,

    /// Motion profile emitted by the mock source
    #[serde(default)]
    pub mock_profile: MockProfile,
}

fn default_source_id() -> String {
    "board_1".to_string()
}

fn default_accel_scale_factor() -> f64 {
    4096.0
}

fn default_sample_rate_hz() -> f64 {
    50.0
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            source_id: default_source_id(),
            accel_scale_factor: default_accel_scale_factor(),
            sample_rate_hz: default_sample_rate_hz(),
            mock_profile: MockProfile::default(),
        }
    }
}

/// Sample source backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Synthetic notifications, no hardware required
    #[default]
    Mock,
}

/// Synthetic motion profile for the mock source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockProfile {
    /// Board at rest: constant 1.0 g on the z axis
    Rest,
    /// Sinusoidal shake around rest
    Shake {
        /// Peak deviation from rest, in g
        amplitude_g: f64,
        /// Shake frequency in Hz
        wave_hz: f64,
    },
}

impl Default for MockProfile {
    fn default() -> Self {
        Self::Shake {
            amplitude_g: 0.3,
            wave_hz: 1.2,
        }
    }
}

/// RMS smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Sliding window capacity (N samples)
    #[serde(default = "default_rms_window_size")]
    pub rms_window_size: usize,
}

fn default_rms_window_size() -> usize {
    8
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            rms_window_size: default_rms_window_size(),
        }
    }
}

/// Speed shaping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapingConfig {
    /// Scores at or above this are treated as a sensor fault (output 0)
    #[serde(default = "default_error_threshold")]
    pub error_threshold: f64,

    /// Scores at or below this are treated as stationary noise
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,

    /// Score that maps to full speed; higher scores saturate
    #[serde(default = "default_max_score")]
    pub max_score: f64,

    /// Upper bound of the output scalar
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Momentum multiplier applied when the target rises
    #[serde(default = "default_accel_rate")]
    pub accel_rate: f64,
}

fn default_error_threshold() -> f64 {
    50.0
}

fn default_dead_zone() -> f64 {
    0.05
}

fn default_max_score() -> f64 {
    0.8
}

fn default_max_speed() -> f64 {
    7.04
}

fn default_accel_rate() -> f64 {
    1.5
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            error_threshold: default_error_threshold(),
            dead_zone: default_dead_zone(),
            max_score: default_max_score(),
            max_speed: default_max_speed(),
            accel_rate: default_accel_rate(),
        }
    }
}

impl ShapingConfig {
    /// Width of the score range mapped linearly onto `[0, max_speed]`
    pub fn active_range(&self) -> f64 {
        self.max_score - self.dead_zone
    }
}

/// Consumer-side connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Minimum delay between reconnect attempts in milliseconds
    #[serde(default = "default_reconnect_cooldown_ms")]
    pub reconnect_cooldown_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    3000
}

fn default_reconnect_cooldown_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            reconnect_cooldown_ms: default_reconnect_cooldown_ms(),
        }
    }
}
