//! Sliding-window RMS aggregation.
//!
//! Keeps the last N deviation values in a fixed-capacity ring and republishes
//! `sqrt(sum(v^2) / count)` on every push. During warm-up (fewer than N
//! values seen) the RMS is taken over the values present, not zero-padded.

use std::fmt;

use ringbuf::{traits::*, HeapRb};

/// Fixed-window RMS aggregator
///
/// Exactly one writer: the ingestion context. The published score travels to
/// the broadcast context through a `ScoreCell`, never through this struct.
pub struct RmsAggregator {
    window: HeapRb<f64>,
    latest: f64,
}

impl fmt::Debug for RmsAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RmsAggregator")
            .field("len", &self.window.occupied_len())
            .field("capacity", &self.window.capacity().get())
            .field("latest", &self.latest)
            .finish()
    }
}

impl RmsAggregator {
    /// Create an aggregator with the given window capacity (N >= 1)
    pub fn new(window_size: usize) -> Self {
        Self {
            window: HeapRb::new(window_size.max(1)),
            latest: 0.0,
        }
    }

    /// Push a new deviation value and return the updated RMS score
    ///
    /// Evicts the oldest value when the window is at capacity.
    #[inline]
    pub fn push(&mut self, deviation: f64) -> f64 {
        if self.window.is_full() {
            let _ = self.window.try_pop();
        }
        let _ = self.window.try_push(deviation);

        let count = self.window.occupied_len();
        self.latest = if count == 0 {
            0.0
        } else {
            let sum_of_squares: f64 = self.window.iter().map(|v| v * v).sum();
            (sum_of_squares / count as f64).sqrt()
        };
        self.latest
    }

    /// Most recently computed score (0.0 before any push)
    #[inline]
    pub fn score(&self) -> f64 {
        self.latest
    }

    /// Number of values currently in the window
    #[inline]
    pub fn len(&self) -> usize {
        self.window.occupied_len()
    }

    /// Check if the window is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Window capacity (N)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.window.capacity().get()
    }
}
