//! IEEE 802.1Q VLAN tag.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::dot1q as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot1q {
    /// Priority code point (802.1p), 0..=7.
    pub priority: u8,
    /// Drop eligible indicator, kept verbatim.
    pub dei: bool,
    /// VLAN identifier, 0..=0x0fff.
    pub vid: u16,
    pub ethertype: u16,
}

impl Dot1q {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let tci = reader.read_u16_be(layout::TCI_RANGE)?;
        let header = Self {
            priority: (tci >> layout::PCP_SHIFT) as u8,
            dei: tci & layout::DEI_MASK != 0,
            vid: tci & layout::VID_MASK,
            ethertype: reader.read_u16_be(layout::TYPE_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn tci(&self) -> u16 {
        let dei = if self.dei { layout::DEI_MASK } else { 0 };
        ((self.priority as u16) << layout::PCP_SHIFT) | dei | (self.vid & layout::VID_MASK)
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&self.tci().to_be_bytes());
        out.extend_from_slice(&self.ethertype.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }
}
