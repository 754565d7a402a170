//! Single-slot score publication.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free cell holding the latest smoothed score
///
/// Overwrite-on-publish, no queuing: the broadcast context only ever needs
/// the most recent value, not every intermediate one. One writer (ingestion)
/// and one reader (broadcast tick); the f64 is stored as its bit pattern in
/// an `AtomicU64`.
#[derive(Debug, Default)]
pub struct ScoreCell {
    bits: AtomicU64,
}

impl ScoreCell {
    /// Create a cell holding 0.0
    pub const fn new() -> Self {
        // 0u64 is the bit pattern of 0.0f64
        Self {
            bits: AtomicU64::new(0),
        }
    }

    /// Publish a new score, replacing the previous one
    #[inline]
    pub fn publish(&self, score: f64) {
        self.bits.store(score.to_bits(), Ordering::Release);
    }

    /// Read the most recently published score
    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}
