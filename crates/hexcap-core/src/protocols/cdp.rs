//! Cisco Discovery Protocol header. TLVs after the fixed header are carried
//! as opaque payload.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::cdp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdp {
    pub version: u8,
    pub ttl: u8,
    pub checksum: u16,
}

impl Cdp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let header = Self {
            version: reader.read_u8(layout::VERSION_OFFSET)?,
            ttl: reader.read_u8(layout::TTL_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&[self.version, self.ttl]);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }
}
