use thiserror::Error;

use crate::hex::HexError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("packet too large: {size} bytes exceeds the maximum of {max}")]
    PacketTooLarge { size: usize, max: usize },
    #[error("generator expansion failed: {0}")]
    Hex(#[from] HexError),
}
