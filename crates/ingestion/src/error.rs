//! Ingestion error types

use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Notification payload could not be decoded as a sample
    #[error("failed to parse sample from '{source_id}': {message}")]
    ParseFailed {
        /// Source ID
        source_id: String,
        /// Error message
        message: String,
    },

    /// Source is already listening
    #[error("source {source_id} is already listening")]
    AlreadyListening {
        /// Source ID
        source_id: String,
    },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
