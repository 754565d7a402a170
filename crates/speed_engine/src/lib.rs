//! # Speed Engine
//!
//! The signal core of the pipeline: converts raw accelerometer samples into a
//! bounded, momentum-shaped speed scalar.
//!
//! Stages:
//! 1. [`FeatureExtractor`] — raw counts → deviation from the 1.0 g rest magnitude
//! 2. [`RmsAggregator`] — sliding-window RMS of recent deviations
//! 3. [`ScoreCell`] — lock-free single-slot publish of the latest score
//! 4. [`SpeedShaper`] — dead zone, error clamp, linear scaling, asymmetric momentum
//!
//! Stages 1-3 run in the ingestion context (one writer); stage 4 runs in the
//! broadcast tick context (one reader of the score, sole owner of the shaper
//! state).

mod feature;
mod rms;
mod score;
mod shaper;

pub use feature::FeatureExtractor;
pub use rms::RmsAggregator;
pub use score::ScoreCell;
pub use shaper::{SpeedShaper, TickOutcome};
