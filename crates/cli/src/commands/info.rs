//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&blueprint)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn print_config_info(blueprint: &contracts::PipelineBlueprint) {
    println!("=== Speedcast Configuration ===\n");

    println!("Server");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!(
        "   ├─ Endpoint: {}:{}",
        blueprint.server.host, blueprint.server.port
    );
    println!("   ├─ Max connections: {}", blueprint.server.max_connections);
    println!("   └─ Tick interval: {} ms", blueprint.server.tick_interval_ms);

    println!("\nSensor");
    println!("   ├─ Source: {:?}", blueprint.sensor.source);
    println!("   ├─ Source ID: {}", blueprint.sensor.source_id);
    println!("   ├─ Scale factor: {} counts/g", blueprint.sensor.accel_scale_factor);
    println!("   ├─ Sample rate: {} Hz", blueprint.sensor.sample_rate_hz);
    println!("   └─ Mock profile: {:?}", blueprint.sensor.mock_profile);

    println!("\nSmoothing");
    println!("   └─ RMS window: {} samples", blueprint.smoothing.rms_window_size);

    println!("\nShaping");
    println!("   ├─ Dead zone: {}", blueprint.shaping.dead_zone);
    println!("   ├─ Max score: {}", blueprint.shaping.max_score);
    println!("   ├─ Active range: {}", blueprint.shaping.active_range());
    println!("   ├─ Max speed: {}", blueprint.shaping.max_speed);
    println!("   ├─ Accel rate: {}", blueprint.shaping.accel_rate);
    println!("   └─ Error threshold: {}", blueprint.shaping.error_threshold);

    println!("\nClient");
    println!(
        "   ├─ Connect timeout: {} ms",
        blueprint.client.connect_timeout_ms
    );
    println!(
        "   └─ Reconnect cooldown: {} ms",
        blueprint.client.reconnect_cooldown_ms
    );

    println!();
}
