//! Config validation module
//!
//! Validation rules:
//! - max_connections >= 1, tick_interval_ms > 0
//! - accel_scale_factor > 0, sample_rate_hz > 0
//! - rms_window_size >= 1
//! - 0 <= dead_zone < max_score < error_threshold
//! - max_speed > 0, accel_rate > 0
//! - client timeouts > 0

use contracts::{ContractError, PipelineBlueprint};

/// Validate a PipelineBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    validate_server(blueprint)?;
    validate_sensor(blueprint)?;
    validate_smoothing(blueprint)?;
    validate_shaping(blueprint)?;
    validate_client(blueprint)?;
    Ok(())
}

/// Validate server endpoint settings
fn validate_server(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let server = &blueprint.server;

    if server.host.is_empty() {
        return Err(ContractError::config_validation(
            "server.host",
            "host cannot be empty",
        ));
    }

    if server.max_connections == 0 {
        return Err(ContractError::config_validation(
            "server.max_connections",
            "max_connections must be >= 1",
        ));
    }

    if server.tick_interval_ms == 0 {
        return Err(ContractError::config_validation(
            "server.tick_interval_ms",
            "tick_interval_ms must be > 0",
        ));
    }

    Ok(())
}

/// Validate sensor conversion settings
fn validate_sensor(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let sensor = &blueprint.sensor;

    if sensor.accel_scale_factor <= 0.0 {
        return Err(ContractError::config_validation(
            "sensor.accel_scale_factor",
            format!(
                "accel_scale_factor must be > 0, got {}",
                sensor.accel_scale_factor
            ),
        ));
    }

    if sensor.sample_rate_hz <= 0.0 {
        return Err(ContractError::config_validation(
            "sensor.sample_rate_hz",
            format!("sample_rate_hz must be > 0, got {}", sensor.sample_rate_hz),
        ));
    }

    Ok(())
}

/// Validate smoothing window
fn validate_smoothing(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    if blueprint.smoothing.rms_window_size == 0 {
        return Err(ContractError::config_validation(
            "smoothing.rms_window_size",
            "rms_window_size must be >= 1",
        ));
    }
    Ok(())
}

/// Validate shaping thresholds
fn validate_shaping(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let shaping = &blueprint.shaping;

    if shaping.dead_zone < 0.0 {
        return Err(ContractError::config_validation(
            "shaping.dead_zone",
            format!("dead_zone must be >= 0, got {}", shaping.dead_zone),
        ));
    }

    if shaping.max_score <= shaping.dead_zone {
        return Err(ContractError::config_validation(
            "shaping.max_score",
            format!(
                "max_score ({}) must be > dead_zone ({})",
                shaping.max_score, shaping.dead_zone
            ),
        ));
    }

    if shaping.error_threshold <= shaping.max_score {
        return Err(ContractError::config_validation(
            "shaping.error_threshold",
            format!(
                "error_threshold ({}) must be > max_score ({})",
                shaping.error_threshold, shaping.max_score
            ),
        ));
    }

    if shaping.max_speed <= 0.0 {
        return Err(ContractError::config_validation(
            "shaping.max_speed",
            format!("max_speed must be > 0, got {}", shaping.max_speed),
        ));
    }

    if shaping.accel_rate <= 0.0 {
        return Err(ContractError::config_validation(
            "shaping.accel_rate",
            format!("accel_rate must be > 0, got {}", shaping.accel_rate),
        ));
    }

    Ok(())
}

/// Validate consumer-side settings
fn validate_client(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let client = &blueprint.client;

    if client.connect_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "client.connect_timeout_ms",
            "connect_timeout_ms must be > 0",
        ));
    }

    if client.reconnect_cooldown_ms == 0 {
        return Err(ContractError::config_validation(
            "client.reconnect_cooldown_ms",
            "reconnect_cooldown_ms must be > 0",
        ));
    }

    Ok(())
}
