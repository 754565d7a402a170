//! Broadcast tick metric collection
//!
//! Records and aggregates per-tick metrics from `TickMeta`.

use contracts::TickMeta;
use metrics::{counter, gauge, histogram};

/// Record metrics for one broadcast tick
///
/// Call once per tick, whether or not a consumer is connected.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_tick_metrics;
///
/// let outcome = shaper.tick(score);
/// record_tick_metrics(&meta);
/// ```
pub fn record_tick_metrics(meta: &TickMeta) {
    // Tick counter
    counter!("speedcast_ticks_total").increment(1);

    // Signal values
    gauge!("speedcast_score").set(meta.score);
    gauge!("speedcast_target_speed").set(meta.target_speed);
    gauge!("speedcast_applied_speed").set(meta.applied_speed);
    histogram!("speedcast_applied_speed_hist").record(meta.applied_speed);

    // Consumers
    gauge!("speedcast_connections").set(meta.connections as f64);

    // Sensor-range faults
    if meta.fault {
        counter!("speedcast_score_faults_total").increment(1);
    }

    // Idle ticks (nothing to send)
    if meta.connections == 0 {
        counter!("speedcast_idle_ticks_total").increment(1);
    }
}

/// Record a consumer connection event (`"accepted"`, `"rejected"`, `"dropped"`)
pub fn record_client_event(event: &str) {
    counter!(
        "speedcast_client_events_total",
        "event" => event.to_string()
    )
    .increment(1);
}

/// Tick metric aggregator
///
/// Aggregates metrics in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct TickMetricsAggregator {
    /// Total ticks
    pub total_ticks: u64,

    /// Ticks with the score above the error threshold
    pub fault_ticks: u64,

    /// Ticks with no consumer connected
    pub idle_ticks: u64,

    /// Peak simultaneous consumer connections
    pub peak_connections: usize,

    /// Score distribution
    pub score_stats: RunningStats,

    /// Applied speed distribution
    pub speed_stats: RunningStats,
}

impl TickMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aggregate statistics
    pub fn update(&mut self, meta: &TickMeta) {
        self.total_ticks += 1;

        if meta.fault {
            self.fault_ticks += 1;
        }
        if meta.connections == 0 {
            self.idle_ticks += 1;
        }
        self.peak_connections = self.peak_connections.max(meta.connections);

        self.score_stats.push(meta.score);
        self.speed_stats.push(meta.applied_speed);
    }

    /// Produce a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_ticks: self.total_ticks,
            fault_ticks: self.fault_ticks,
            idle_ticks: self.idle_ticks,
            fault_rate: if self.total_ticks > 0 {
                self.fault_ticks as f64 / self.total_ticks as f64 * 100.0
            } else {
                0.0
            },
            idle_rate: if self.total_ticks > 0 {
                self.idle_ticks as f64 / self.total_ticks as f64 * 100.0
            } else {
                0.0
            },
            peak_connections: self.peak_connections,
            score: StatsSummary::from(&self.score_stats),
            applied_speed: StatsSummary::from(&self.speed_stats),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metric summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_ticks: u64,
    pub fault_ticks: u64,
    pub idle_ticks: u64,
    pub fault_rate: f64,
    pub idle_rate: f64,
    pub peak_connections: usize,
    pub score: StatsSummary,
    pub applied_speed: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Broadcast Metrics Summary ===")?;
        writeln!(f, "Total ticks: {}", self.total_ticks)?;
        writeln!(
            f,
            "Fault ticks: {} ({:.2}%)",
            self.fault_ticks, self.fault_rate
        )?;
        writeln!(
            f,
            "Idle ticks: {} ({:.2}%)",
            self.idle_ticks, self.idle_rate
        )?;
        writeln!(f, "Peak connections: {}", self.peak_connections)?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "Applied speed: {}", self.applied_speed)?;
        Ok(())
    }
}

/// Stats summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
