//! ControlMessage - the wire schema
//!
//! One JSON object per line, newline-terminated. No length prefix, no framing
//! beyond the `\n` delimiter.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Control value pushed to the consumer on every broadcast tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Shaped speed scalar, `0 <= speed <= max_speed` by construction
    pub speed: f64,
}

impl Default for ControlMessage {
    /// The value a consumer observes before any message has arrived
    fn default() -> Self {
        Self { speed: 0.0 }
    }
}

impl ControlMessage {
    /// Create a message carrying the given speed
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    /// Serialize as a single newline-terminated JSON line
    pub fn encode_line(&self) -> Result<String, ContractError> {
        let mut line = serde_json::to_string(self).map_err(|e| ContractError::MessageEncode {
            message: e.to_string(),
        })?;
        line.push('\n');
        Ok(line)
    }

    /// Decode one line (without or with its trailing newline)
    pub fn decode_line(line: &str) -> Result<Self, ContractError> {
        serde_json::from_str(line.trim_end_matches(['\r', '\n']))
            .map_err(|e| ContractError::message_decode(e.to_string()))
    }

    /// Decode one line from raw bytes
    pub fn decode_slice(bytes: &[u8]) -> Result<Self, ContractError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ContractError::message_decode(format!("invalid utf-8: {e}")))?;
        Self::decode_line(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_line_terminated() {
        let line = ControlMessage::new(3.25).encode_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_round_trip_bit_exact() {
        for speed in [0.0, 0.1, 3.2853333333333335, 7.04, f64::MIN_POSITIVE] {
            let line = ControlMessage::new(speed).encode_line().unwrap();
            let decoded = ControlMessage::decode_line(&line).unwrap();
            assert_eq!(decoded.speed.to_bits(), speed.to_bits());
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ControlMessage::decode_line("{bad").is_err());
        assert!(ControlMessage::decode_slice(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_default_is_zero_speed() {
        assert_eq!(ControlMessage::default().speed, 0.0);
    }
}
