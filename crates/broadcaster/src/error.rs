//! Broadcaster error types

use thiserror::Error;

/// Broadcaster errors
///
/// Only startup failures surface here; per-connection faults are handled
/// inside the service and never abort it.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The listening socket could not be bound
    #[error("failed to bind broadcast listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error during startup
    #[error("broadcast io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BroadcastError {
    /// Create a bind error for the given address
    pub fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }
}
