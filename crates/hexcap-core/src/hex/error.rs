use thiserror::Error;

/// Format errors raised while converting between bytes and hex/bit strings.
///
/// # Examples
/// ```
/// use hexcap_core::hex::{HexError, hex_to_bytes};
///
/// let err = hex_to_bytes("0g", "", 2).unwrap_err();
/// assert!(matches!(err, HexError::InvalidChar { ch: 'g', .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid hex character '{ch}' at offset {offset}")]
    InvalidChar { ch: char, offset: usize },
    #[error("invalid bit character '{ch}' at offset {offset}")]
    InvalidBit { ch: char, offset: usize },
    #[error("odd-length hex group '{group}'")]
    OddGroup { group: String },
    #[error("hex group '{group}' does not match group width {width}")]
    GroupWidth { group: String, width: usize },
    #[error("mask has {mask} digits but value has {value}")]
    MaskLength { value: usize, mask: usize },
}
