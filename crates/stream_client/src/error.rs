//! Stream client error types

use thiserror::Error;

/// Stream client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection attempt failed or timed out
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The broadcaster address could not be resolved
    #[error("invalid broadcaster address '{addr}': {message}")]
    InvalidAddr { addr: String, message: String },

    /// IO error while configuring the socket
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create a connect error for the given address
    pub fn connect(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connect {
            addr: addr.into(),
            source,
        }
    }
}
