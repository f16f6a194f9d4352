//! IPv4 header.
//!
//! Options and any bytes past the declared total length (link-layer
//! padding) are kept verbatim. The checksum and total length are never
//! recomputed.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::ipv4 as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4 {
    pub version_ihl: u8,
    pub tos: u8,
    pub total_len: u16,
    pub id: u16,
    pub flags_fragment: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: [u8; 4],
    pub dst: [u8; 4],
    pub options: Vec<u8>,
    pub trailer: Vec<u8>,
}

impl Ipv4 {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::MIN_HEADER_LEN)?;
        let version_ihl = reader.read_u8(layout::VERSION_IHL_OFFSET)?;
        if version_ihl >> 4 != layout::VERSION {
            return Err(DecodeError::Malformed {
                protocol: "ipv4",
                reason: "version is not 4",
            });
        }
        let header_len = (version_ihl & 0x0f) as usize * 4;
        if header_len < layout::MIN_HEADER_LEN {
            return Err(DecodeError::Malformed {
                protocol: "ipv4",
                reason: "header length below 20 bytes",
            });
        }
        reader.require_len(header_len)?;

        let total_len = reader.read_u16_be(layout::TOTAL_LEN_RANGE)?;
        let end = (total_len as usize).clamp(header_len, reader.len());
        let header = Self {
            version_ihl,
            tos: reader.read_u8(layout::TOS_OFFSET)?,
            total_len,
            id: reader.read_u16_be(layout::ID_RANGE)?,
            flags_fragment: reader.read_u16_be(layout::FLAGS_FRAGMENT_RANGE)?,
            ttl: reader.read_u8(layout::TTL_OFFSET)?,
            protocol: reader.read_u8(layout::PROTOCOL_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            src: reader.read_array::<4>(layout::SRC_RANGE)?,
            dst: reader.read_array::<4>(layout::DST_RANGE)?,
            options: reader
                .read_slice(layout::MIN_HEADER_LEN..header_len)?
                .to_vec(),
            trailer: reader.rest(end)?.to_vec(),
        };
        Ok((header, reader.read_slice(header_len..end)?))
    }

    pub fn dont_fragment(&self) -> bool {
        self.flags_fragment & layout::DONT_FRAGMENT != 0
    }

    pub fn set_dont_fragment(&mut self, df: bool) {
        if df {
            self.flags_fragment |= layout::DONT_FRAGMENT;
        } else {
            self.flags_fragment &= !layout::DONT_FRAGMENT;
        }
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            layout::MIN_HEADER_LEN + self.options.len() + payload.len() + self.trailer.len(),
        );
        out.extend_from_slice(&[self.version_ihl, self.tos]);
        out.extend_from_slice(&self.total_len.to_be_bytes());
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags_fragment.to_be_bytes());
        out.extend_from_slice(&[self.ttl, self.protocol]);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(&self.src);
        out.extend_from_slice(&self.dst);
        out.extend_from_slice(&self.options);
        out.extend_from_slice(payload);
        out.extend_from_slice(&self.trailer);
        out
    }
}
