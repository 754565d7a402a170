//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding bind host from CLI");
        blueprint.server.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding bind port from CLI");
        blueprint.server.port = port;
    }

    info!(
        host = %blueprint.server.host,
        port = blueprint.server.port,
        tick_ms = blueprint.server.tick_interval_ms,
        source = ?blueprint.sensor.source,
        window = blueprint.smoothing.rms_window_size,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        duration: if args.duration == 0 {
            None
        } else {
            Some(Duration::from_secs(args.duration))
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create the pipeline and the shutdown signal it observes
    let pipeline = Pipeline::new(pipeline_config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        warn!("Received shutdown signal, stopping pipeline...");
        let _ = shutdown_tx.send(true);
    });

    info!("Starting pipeline...");

    let stats = pipeline
        .run(shutdown_rx)
        .await
        .context("Pipeline execution failed")?;

    info!(
        ticks = stats.broadcast.snapshot.ticks,
        messages = stats.broadcast.snapshot.messages_sent,
        duration_secs = stats.duration.as_secs_f64(),
        tick_rate = format!("{:.2}", stats.ticks_per_sec()),
        "Pipeline completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("Speedcast finished");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::PipelineBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Server:");
    println!(
        "  Endpoint: {}:{}",
        blueprint.server.host, blueprint.server.port
    );
    println!("  Max connections: {}", blueprint.server.max_connections);
    println!("  Tick interval: {} ms", blueprint.server.tick_interval_ms);

    println!("\nSensor:");
    println!("  Source: {:?} ({})", blueprint.sensor.source, blueprint.sensor.source_id);
    println!("  Scale factor: {}", blueprint.sensor.accel_scale_factor);
    println!("  Sample rate: {} Hz", blueprint.sensor.sample_rate_hz);

    println!("\nSmoothing:");
    println!("  RMS window: {} samples", blueprint.smoothing.rms_window_size);

    println!("\nShaping:");
    println!("  Dead zone: {}", blueprint.shaping.dead_zone);
    println!("  Max score: {}", blueprint.shaping.max_score);
    println!("  Max speed: {}", blueprint.shaping.max_speed);
    println!("  Accel rate: {}", blueprint.shaping.accel_rate);
    println!("  Error threshold: {}", blueprint.shaping.error_threshold);

    println!();
}
