use thiserror::Error;

/// Reasons a header could not be decoded.
///
/// Decode failures never abort a capture load: the packet keeps every layer
/// decoded so far and the remaining bytes become an opaque `Undefined` layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("header too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("malformed {protocol} header: {reason}")]
    Malformed {
        protocol: &'static str,
        reason: &'static str,
    },
}
