//! ICMP header. The four bytes after the checksum are exposed as
//! identifier and sequence, which is what echo messages carry there.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::icmp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icmp {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
    pub id: u16,
    pub sequence: u16,
}

impl Icmp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let header = Self {
            icmp_type: reader.read_u8(layout::TYPE_OFFSET)?,
            code: reader.read_u8(layout::CODE_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            id: reader.read_u16_be(layout::ID_RANGE)?,
            sequence: reader.read_u16_be(layout::SEQUENCE_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&[self.icmp_type, self.code]);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.sequence.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }
}
