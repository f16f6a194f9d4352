use thiserror::Error;

use crate::hex::HexError;

/// Reasons a column edit was rejected.
///
/// A rejected edit never changes the layer: the previous value stays in
/// place and the caller decides whether to report the error or ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown layer '{layer}'")]
    UnknownLayer { layer: String },
    #[error("packet has no '{layer}' layer")]
    NoSuchLayer { layer: String },
    #[error("layer '{layer}' has no column '{column}'")]
    UnknownColumn { layer: String, column: String },
    #[error("layer '{layer}' is read-only")]
    ReadOnly { layer: String },
    #[error("invalid value for column '{column}': {source}")]
    Format {
        column: String,
        #[source]
        source: HexError,
    },
    #[error("column '{column}' holds {expected} bytes, got {actual}")]
    Length {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("column '{column}' accepts at most {max:#x}, got {value:#x}")]
    OutOfRange { column: String, value: u32, max: u32 },
    #[error("packet is not decoded; only pid and timestamp are available")]
    Unsupported,
}
