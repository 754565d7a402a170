//! Pipeline orchestrator - coordinates all components.
//!
//! Wires the sample source into the ingestion handler, shares the score cell
//! with the broadcaster and supervises the run until the shutdown signal (or
//! the optional duration limit) fires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use broadcaster::StreamBroadcaster;
use contracts::{PipelineBlueprint, SampleSource, SourceKind};
use ingestion::{IngestionMetrics, MockSampleSource, SampleHandler};
use speed_engine::ScoreCell;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The pipeline blueprint configuration
    pub blueprint: PipelineBlueprint,

    /// Stop after this long (None = run until shutdown signal)
    pub duration: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline until the shutdown signal fires
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Shared score cell: ingestion writes, broadcast tick reads
        let score = Arc::new(ScoreCell::new());
        let ingestion_metrics = Arc::new(IngestionMetrics::new());

        // Setup ingestion
        info!("Setting up ingestion...");
        let handler = SampleHandler::new(
            &blueprint.sensor,
            &blueprint.smoothing,
            Arc::clone(&score),
            Arc::clone(&ingestion_metrics),
        );

        let source = match blueprint.sensor.source {
            SourceKind::Mock => MockSampleSource::from_config(&blueprint.sensor),
        };

        info!(
            source_id = %source.source_id(),
            rate_hz = blueprint.sensor.sample_rate_hz,
            window = blueprint.smoothing.rms_window_size,
            "Ingestion configured"
        );

        // Setup broadcaster (bind failure is the one fatal startup error)
        info!("Setting up broadcast server...");
        let broadcast = StreamBroadcaster::new(
            blueprint.server.clone(),
            blueprint.shaping.clone(),
            Arc::clone(&score),
        );
        let bound = broadcast.bind().await.with_context(|| {
            format!(
                "Failed to start broadcast server on {}:{}",
                blueprint.server.host, blueprint.server.port
            )
        })?;

        // Merge the caller's shutdown signal with the optional duration limit
        let (stop_tx, stop_rx) = watch::channel(false);
        let duration = self.config.duration;
        let mut caller_shutdown = shutdown;
        tokio::spawn(async move {
            match duration {
                Some(limit) => {
                    tokio::select! {
                        _ = caller_shutdown.changed() => {}
                        _ = tokio::time::sleep(limit) => {
                            info!(secs = limit.as_secs_f64(), "Duration limit reached");
                        }
                    }
                }
                None => {
                    let _ = caller_shutdown.changed().await;
                }
            }
            let _ = stop_tx.send(true);
        });

        // Start the flow
        source.listen(handler.into_callback());
        info!(addr = %bound.local_addr(), "Pipeline running");

        let broadcast_stats = bound.run(stop_rx).await;

        // Shutdown
        info!("Shutting down pipeline...");
        source.stop();

        let stats = PipelineStats {
            samples: ingestion_metrics.snapshot(),
            broadcast: broadcast_stats,
            duration: start_time.elapsed(),
        };

        if stats.samples.decode_errors > 0 {
            warn!(
                decode_errors = stats.samples.decode_errors,
                "Some notifications were dropped as undecodable"
            );
        }

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            ticks = stats.broadcast.snapshot.ticks,
            samples = stats.samples.samples_received,
            "Pipeline shutdown complete"
        );

        Ok(stats)
    }
}
