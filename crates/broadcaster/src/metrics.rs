//! Broadcaster metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for the broadcast service
#[derive(Debug, Default)]
pub struct BroadcasterMetrics {
    /// Ticks executed
    ticks: AtomicU64,
    /// Messages successfully written
    messages_sent: AtomicU64,
    /// Failed writes (each costs the consumer its connection)
    send_failures: AtomicU64,
    /// Consumers accepted
    connections_accepted: AtomicU64,
    /// Consumers rejected at the connection cap
    connections_rejected: AtomicU64,
    /// Currently open consumer connections
    connections_current: AtomicUsize,
}

impl BroadcasterMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful message write
    pub fn record_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed message write
    pub fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an accepted consumer
    pub fn record_accepted(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a consumer rejected at the cap
    pub fn record_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Update current connection count
    pub fn set_connections(&self, count: usize) {
        self.connections_current.store(count, Ordering::Relaxed);
    }

    /// Currently open consumer connections
    pub fn connections(&self) -> usize {
        self.connections_current.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> BroadcastSnapshot {
        BroadcastSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            connections_current: self.connections(),
        }
    }
}

/// Snapshot of broadcaster metrics (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastSnapshot {
    pub ticks: u64,
    pub messages_sent: u64,
    pub send_failures: u64,
    pub connections_accepted: u64,
    pub connections_rejected: u64,
    pub connections_current: usize,
}
