//! Sample handler - the ingestion-context hot path.

use std::sync::Arc;

use bytes::Bytes;
use contracts::{SampleCallback, SensorConfig, SmoothingConfig};
use metrics::{counter, gauge};
use speed_engine::{FeatureExtractor, RmsAggregator, ScoreCell};
use tracing::{trace, warn};

use crate::decode::decode_sample;
use crate::metrics::IngestionMetrics;

/// Processes one notification per invocation: decode → feature → RMS → publish
///
/// The handler is the sole writer of the RMS window and the score cell. It is
/// invoked from the source's delivery thread and never blocks: decode
/// failures are logged and dropped locally.
pub struct SampleHandler {
    source_id: String,
    extractor: FeatureExtractor,
    aggregator: RmsAggregator,
    score: Arc<ScoreCell>,
    metrics: Arc<IngestionMetrics>,
}

impl SampleHandler {
    /// Create a handler publishing into the given score cell
    pub fn new(
        sensor: &SensorConfig,
        smoothing: &SmoothingConfig,
        score: Arc<ScoreCell>,
        metrics: Arc<IngestionMetrics>,
    ) -> Self {
        Self {
            source_id: sensor.source_id.clone(),
            extractor: FeatureExtractor::from_config(sensor),
            aggregator: RmsAggregator::new(smoothing.rms_window_size),
            score,
            metrics,
        }
    }

    /// Handle one inbound notification payload
    pub fn handle_notification(&mut self, payload: &Bytes) {
        self.metrics.record_received();

        let sample = match decode_sample(&self.source_id, payload) {
            Ok(sample) => sample,
            Err(e) => {
                self.metrics.record_decode_error();
                counter!("speedcast_decode_errors_total").increment(1);
                warn!(source_id = %self.source_id, error = %e, "dropping malformed notification");
                return;
            }
        };

        let feature = self.extractor.extract(&sample);
        let score = self.aggregator.push(feature.deviation);
        self.score.publish(score);

        gauge!("speedcast_rms_score").set(score);

        trace!(
            source_id = %self.source_id,
            deviation = feature.deviation,
            score,
            window = self.aggregator.len(),
            "sample ingested"
        );
    }

    /// Convert into a `SampleCallback` for `SampleSource::listen`
    pub fn into_callback(mut self) -> SampleCallback {
        Box::new(move |payload| self.handle_notification(&payload))
    }
}
