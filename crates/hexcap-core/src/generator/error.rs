use thiserror::Error;

use crate::hex::HexError;
use crate::layer::EditError;

/// Generator and mask configuration errors. A failed call leaves the
/// column's previous generator state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("mask too long: {mask_bits} bits for a {column_bits}-bit column")]
    MaskTooLong { mask_bits: usize, column_bits: usize },
    #[error("invalid mask '{mask}': free (0) bits must form one contiguous run")]
    InvalidMask { mask: String },
    #[error("packet is not decoded; generators need an editable layer")]
    Unsupported,
    #[error(transparent)]
    Format(#[from] HexError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
