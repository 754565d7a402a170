//! Layered error definitions
//!
//! Categorized by source: config / sample decode / wire codec

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sample Errors =====
    /// Inbound sensor notification could not be decoded
    #[error("sample decode error from '{source_id}': {message}")]
    SampleDecode { source_id: String, message: String },

    // ===== Wire Codec Errors =====
    /// Control message serialization error
    #[error("message encode error: {message}")]
    MessageEncode { message: String },

    /// Control message deserialization error
    #[error("message decode error: {message}")]
    MessageDecode { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sample decode error
    pub fn sample_decode(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SampleDecode {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create message decode error
    pub fn message_decode(message: impl Into<String>) -> Self {
        Self::MessageDecode {
            message: message.into(),
        }
    }
}
