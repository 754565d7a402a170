//! `watch` command implementation.
//!
//! Consumer-side receive loop: connects a `StreamReader` to a running
//! broadcaster and prints the polled speed at a fixed interval. Demonstrates
//! the fail-static read and cooldown-gated reconnect exactly as an embedding
//! application would use them.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use contracts::PipelineBlueprint;
use stream_client::StreamReader;

use crate::cli::WatchArgs;

/// Execute the `watch` command
pub async fn run_watch(args: &WatchArgs) -> Result<()> {
    // The watch side tolerates a missing config file: defaults match the
    // reference deployment
    let blueprint = if args.config.exists() {
        config_loader::ConfigLoader::load_from_path(&args.config)?
    } else {
        info!(config = %args.config.display(), "Config file not found, using defaults");
        PipelineBlueprint::default()
    };

    let host = args
        .host
        .clone()
        .unwrap_or_else(|| blueprint.server.host.clone());
    let port = args.port.unwrap_or(blueprint.server.port);

    info!(host = %host, port, interval_ms = args.interval_ms, "Watching broadcaster");

    let mut reader = StreamReader::new(host, port, blueprint.client.clone());
    if let Err(e) = reader.connect() {
        warn!(error = %e, "Initial connect failed, will retry with cooldown");
    }

    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms));
    let mut polls = 0u64;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Watch interrupted");
                reader.disconnect();
                break;
            }
            _ = interval.tick() => {
                if !reader.is_connected() {
                    reader.try_reconnect();
                }

                let message = reader.poll();
                let marker = if reader.is_connected() {
                    String::new()
                } else {
                    let idle = reader.idle_time().map(|d| d.as_secs_f64()).unwrap_or(0.0);
                    format!(" (stale {:.1}s)", idle)
                };
                println!("speed: {:>8.4}{}", message.speed, marker);

                polls += 1;
                if args.count != 0 && polls >= args.count {
                    info!(polls, "Watch complete");
                    break;
                }
            }
        }
    }

    Ok(())
}
