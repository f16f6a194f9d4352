//! Extreme Discovery Protocol header.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::edp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edp {
    pub version: u8,
    pub reserved: u8,
    pub length: u16,
    pub checksum: u16,
    pub sequence: u16,
    pub machine_id: u16,
    pub mac: [u8; 6],
}

impl Edp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let header = Self {
            version: reader.read_u8(layout::VERSION_OFFSET)?,
            reserved: reader.read_u8(layout::RESERVED_OFFSET)?,
            length: reader.read_u16_be(layout::LENGTH_RANGE)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            sequence: reader.read_u16_be(layout::SEQUENCE_RANGE)?,
            machine_id: reader.read_u16_be(layout::MACHINE_ID_RANGE)?,
            mac: reader.read_array::<6>(layout::MAC_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&[self.version, self.reserved]);
        for word in [self.length, self.checksum, self.sequence, self.machine_id] {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out.extend_from_slice(&self.mac);
        out.extend_from_slice(payload);
        out
    }
}
