//! Pipeline statistics and metrics.

use std::time::Duration;

use broadcaster::BroadcastStats;
use ingestion::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Ingestion counters
    pub samples: MetricsSnapshot,

    /// Broadcast counters and per-tick aggregates
    pub broadcast: BroadcastStats,

    /// Total duration of the pipeline run
    pub duration: Duration,
}

impl PipelineStats {
    /// Calculate broadcast ticks per second
    pub fn ticks_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.broadcast.snapshot.ticks as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate sample decode error rate as percentage
    #[allow(dead_code)]
    pub fn decode_error_rate(&self) -> f64 {
        if self.samples.samples_received > 0 {
            (self.samples.decode_errors as f64 / self.samples.samples_received as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");

        println!("Overview");
        println!("   Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   Samples ingested: {}", self.samples.samples_received);
        println!("   Decode errors: {}", self.samples.decode_errors);
        println!("   Broadcast ticks: {}", self.broadcast.snapshot.ticks);
        println!("   Tick rate: {:.2}/s", self.ticks_per_sec());

        println!("\nDelivery");
        println!("   Messages sent: {}", self.broadcast.snapshot.messages_sent);
        println!("   Send failures: {}", self.broadcast.snapshot.send_failures);
        println!(
            "   Consumers accepted: {}",
            self.broadcast.snapshot.connections_accepted
        );
        println!(
            "   Consumers rejected: {}",
            self.broadcast.snapshot.connections_rejected
        );

        println!("\n{}", self.broadcast.summary);
    }
}
