//! Column tables and the typed-field access behind them.
//!
//! A column is a big-endian byte view of one header field. Display text is
//! produced on demand from those bytes; edits are parsed back into bytes,
//! length-checked, range-checked by the header and only then stored.

use super::error::EditError;

/// How a column's bytes are grouped when shown as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexFormat {
    pub delim: &'static str,
    /// Hex digits between delimiters.
    pub group: usize,
}

impl HexFormat {
    pub const PLAIN: HexFormat = HexFormat { delim: "", group: 0 };
    pub const MAC: HexFormat = HexFormat { delim: ":", group: 2 };
    pub const DOTTED: HexFormat = HexFormat { delim: ".", group: 2 };
    pub const IPV6: HexFormat = HexFormat { delim: ":", group: 4 };
}

/// Static description of one editable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Display width in characters.
    pub width: usize,
    /// Field size in bytes.
    pub len: usize,
    pub format: HexFormat,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, width: usize, len: usize, format: HexFormat) -> Self {
        Self {
            name,
            width,
            len,
            format,
        }
    }

    pub fn bits(&self) -> usize {
        self.len * 8
    }
}

/// Column access implemented by every editable protocol header.
///
/// `write` receives exactly `len` bytes for a column listed by `columns`;
/// it applies the field's range rule and leaves the header untouched when
/// the rule rejects the value.
pub trait Columns {
    fn columns(&self) -> &'static [ColumnSpec];
    fn read(&self, column: &str) -> Option<Vec<u8>>;
    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError>;

    fn spec(&self, column: &str) -> Option<&'static ColumnSpec> {
        self.columns().iter().find(|spec| spec.name == column)
    }
}

pub(crate) fn to_array<const N: usize>(column: &str, bytes: &[u8]) -> Result<[u8; N], EditError> {
    bytes.try_into().map_err(|_| EditError::Length {
        column: column.to_string(),
        expected: N,
        actual: bytes.len(),
    })
}

pub(crate) fn to_u8(column: &str, bytes: &[u8]) -> Result<u8, EditError> {
    let [value] = to_array::<1>(column, bytes)?;
    Ok(value)
}

pub(crate) fn to_u16(column: &str, bytes: &[u8]) -> Result<u16, EditError> {
    Ok(u16::from_be_bytes(to_array(column, bytes)?))
}

pub(crate) fn to_u32(column: &str, bytes: &[u8]) -> Result<u32, EditError> {
    Ok(u32::from_be_bytes(to_array(column, bytes)?))
}

pub(crate) fn check_max(column: &str, value: u32, max: u32) -> Result<(), EditError> {
    if value > max {
        return Err(EditError::OutOfRange {
            column: column.to_string(),
            value,
            max,
        });
    }
    Ok(())
}

pub(crate) fn unknown_column(layer: &str, column: &str) -> EditError {
    EditError::UnknownColumn {
        layer: layer.to_string(),
        column: column.to_string(),
    }
}
