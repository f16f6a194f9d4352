//! UDP header. The length and checksum are carried as-is; the length is an
//! editable column and is never recomputed.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::udp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Udp {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl Udp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let header = Self {
            src_port: reader.read_u16_be(layout::SRC_PORT_RANGE)?,
            dst_port: reader.read_u16_be(layout::DST_PORT_RANGE)?,
            length: reader.read_u16_be(layout::LENGTH_RANGE)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        for word in [self.src_port, self.dst_port, self.length, self.checksum] {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out.extend_from_slice(payload);
        out
    }
}
