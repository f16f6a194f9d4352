//! Per-column generators.
//!
//! A generator turns one template packet into `count` physical packets. Copy
//! `i` carries the template value plus `(i mod count) * step`, added only to
//! the bits the mask leaves free. Masks are stored as hex strings covering
//! the whole column, where a set bit freezes that bit of the value.

pub mod error;

use serde::{Deserialize, Serialize};

use crate::hex::{self, HexError};

pub use error::GeneratorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub count: u32,
    pub step: i64,
    /// Hex digits, two per column byte.
    pub mask: String,
}

impl Generator {
    /// A generator whose mask leaves every bit of a `column_len`-byte column
    /// free.
    pub fn new(count: u32, step: i64, column_len: usize) -> Self {
        Self {
            count,
            step,
            mask: "0".repeat(column_len * 2),
        }
    }

    /// `count` 0 and 1 both produce the template unchanged.
    pub fn is_identity(&self) -> bool {
        self.count <= 1
    }

    /// Column value for physical copy `index`, given the template value as
    /// undelimited hex.
    pub fn value_at(&self, template: &str, index: u64) -> Result<String, HexError> {
        if self.is_identity() {
            return Ok(template.to_string());
        }
        let offset = (index % self.count as u64) as i128 * self.step as i128;
        hex::increment_hex_string(template, &self.mask, offset)
    }
}

/// A user-supplied mask, either as bits (`"1100"`) or hex digits (`"f0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSpec {
    Bits(String),
    Hex(String),
}

impl MaskSpec {
    fn to_bits(&self) -> Result<String, HexError> {
        match self {
            // left-padded to whole nibbles, so "1" reads as 0001
            MaskSpec::Bits(bits) => hex::hex_str_to_bin_str(&hex::bin_str_to_hex_str(bits)?),
            MaskSpec::Hex(digits) => hex::hex_str_to_bin_str(digits),
        }
    }
}

/// Validate `spec` against a column of `column_bits` bits and return it as
/// a full-width hex mask.
///
/// A mask shorter than the column is extended on the right with its own
/// last bit. The result must leave at least one bit free and its free bits
/// must be contiguous.
///
/// # Examples
/// ```
/// use hexcap_core::generator::{MaskSpec, normalize_mask};
///
/// assert_eq!(normalize_mask(&MaskSpec::Bits("1100".into()), 8).unwrap(), "c0");
/// assert_eq!(normalize_mask(&MaskSpec::Hex("ffffff00".into()), 32).unwrap(), "ffffff00");
/// assert!(normalize_mask(&MaskSpec::Bits("1010".into()), 8).is_err());
/// ```
pub fn normalize_mask(spec: &MaskSpec, column_bits: usize) -> Result<String, GeneratorError> {
    let bits = spec.to_bits()?;
    if bits.len() > column_bits {
        return Err(GeneratorError::MaskTooLong {
            mask_bits: bits.len(),
            column_bits,
        });
    }
    let Some(last) = bits.chars().last() else {
        return Err(GeneratorError::InvalidMask { mask: bits });
    };

    let mut extended = bits.clone();
    extended.extend(std::iter::repeat_n(last, column_bits - bits.len()));

    let free_run = extended.trim_matches('1');
    if free_run.is_empty() || free_run.contains('1') {
        return Err(GeneratorError::InvalidMask { mask: bits });
    }
    Ok(hex::bin_str_to_hex_str(&extended)?)
}
