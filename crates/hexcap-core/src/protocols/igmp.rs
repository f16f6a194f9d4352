//! IGMPv1/v2 messages. IGMPv3 membership reports use a different layout
//! and are rejected.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::igmp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Igmp {
    pub igmp_type: u8,
    pub max_resp: u8,
    pub checksum: u16,
    pub group: [u8; 4],
}

impl Igmp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let igmp_type = reader.read_u8(layout::TYPE_OFFSET)?;
        if igmp_type == layout::TYPE_V3_REPORT {
            return Err(DecodeError::Malformed {
                protocol: "igmp",
                reason: "igmpv3 membership reports are not supported",
            });
        }
        let header = Self {
            igmp_type,
            max_resp: reader.read_u8(layout::MAX_RESP_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            group: reader.read_array::<4>(layout::GROUP_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&[self.igmp_type, self.max_resp]);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(&self.group);
        out.extend_from_slice(payload);
        out
    }
}
