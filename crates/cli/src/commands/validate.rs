//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    endpoint: String,
    source: String,
    rms_window_size: usize,
    tick_interval_ms: u64,
    max_speed: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    endpoint: format!("{}:{}", blueprint.server.host, blueprint.server.port),
                    source: format!("{:?}", blueprint.sensor.source),
                    rms_window_size: blueprint.smoothing.rms_window_size,
                    tick_interval_ms: blueprint.server.tick_interval_ms,
                    max_speed: blueprint.shaping.max_speed,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::PipelineBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.shaping.accel_rate > 1.0 {
        warnings.push(format!(
            "shaping.accel_rate is {} - rising speeds ramp past the target before settling",
            blueprint.shaping.accel_rate
        ));
    }

    if blueprint.shaping.dead_zone == 0.0 {
        warnings.push("shaping.dead_zone is 0 - stationary sensor noise will map to motion".to_string());
    }

    if blueprint.server.max_connections > 1 {
        warnings.push(format!(
            "server.max_connections is {} - all consumers share one control stream",
            blueprint.server.max_connections
        ));
    }

    if blueprint.server.tick_interval_ms > 100 {
        warnings.push(format!(
            "server.tick_interval_ms is {} - consumers will see a coarse control signal",
            blueprint.server.tick_interval_ms
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Endpoint: {}", summary.endpoint);
            println!("  Source: {}", summary.source);
            println!("  RMS window: {} samples", summary.rms_window_size);
            println!("  Tick interval: {} ms", summary.tick_interval_ms);
            println!("  Max speed: {}", summary.max_speed);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
