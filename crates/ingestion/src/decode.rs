//! Notification payload decoding.

use contracts::MotionSample;

use crate::error::{IngestionError, Result};

/// Decode one notification payload into a `MotionSample`
///
/// The payload is a UTF-8 JSON object with optional numeric axis fields;
/// absent axes decode as 0. Anything that is not such an object is a decode
/// fault for the caller to drop.
pub fn decode_sample(source_id: &str, payload: &[u8]) -> Result<MotionSample> {
    serde_json::from_slice(payload).map_err(|e| IngestionError::ParseFailed {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })
}
