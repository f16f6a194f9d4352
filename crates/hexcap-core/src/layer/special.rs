//! Read-only bookkeeping layers: packet id, timestamp and the opaque
//! fallback for bytes that could not be decoded.

use crate::hex::bytes_to_hex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PktId {
    /// 1-based position in the capture; `None` once detached.
    pub pid: Option<usize>,
    pub width: usize,
}

impl PktId {
    pub fn display(&self) -> String {
        match self.pid {
            Some(pid) => format!("{pid:0>width$}", width = self.width),
            None => "?".repeat(self.width),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TStamp {
    /// Seconds since the epoch.
    pub ts: f64,
    /// Blank while the packet is a generator template.
    pub blank: bool,
}

impl TStamp {
    pub fn display(&self) -> String {
        if self.blank {
            String::new()
        } else {
            format!("{:.2}", self.ts)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undefined {
    pub data: Vec<u8>,
    /// Preview width in hex digits.
    pub width: usize,
    /// Dots replacing the tail of a truncated preview.
    pub dots: usize,
}

impl Undefined {
    pub fn preview(&self) -> String {
        let digits = bytes_to_hex(&self.data, "", 0);
        if digits.len() <= self.width {
            return digits;
        }
        let keep = self.width.saturating_sub(self.dots);
        let mut out = digits[..keep].to_string();
        out.push_str(&".".repeat(self.width - keep));
        out
    }
}
