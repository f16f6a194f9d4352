//! ARP for IPv4 over Ethernet. Other hardware/protocol combinations are
//! rejected so the packet degrades to an opaque layer.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::arp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arp {
    pub operation: u16,
    pub sha: [u8; 6],
    pub spa: [u8; 4],
    pub tha: [u8; 6],
    pub tpa: [u8; 4],
}

impl Arp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let supported = reader.read_u16_be(layout::HTYPE_RANGE)? == layout::HTYPE_ETHERNET
            && reader.read_u16_be(layout::PTYPE_RANGE)? == layout::PTYPE_IPV4
            && reader.read_u8(layout::HLEN_OFFSET)? == layout::HLEN_ETHERNET
            && reader.read_u8(layout::PLEN_OFFSET)? == layout::PLEN_IPV4;
        if !supported {
            return Err(DecodeError::Malformed {
                protocol: "arp",
                reason: "only ethernet/ipv4 address resolution is supported",
            });
        }
        let header = Self {
            operation: reader.read_u16_be(layout::OPER_RANGE)?,
            sha: reader.read_array::<6>(layout::SHA_RANGE)?,
            spa: reader.read_array::<4>(layout::SPA_RANGE)?,
            tha: reader.read_array::<6>(layout::THA_RANGE)?,
            tpa: reader.read_array::<4>(layout::TPA_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&layout::HTYPE_ETHERNET.to_be_bytes());
        out.extend_from_slice(&layout::PTYPE_IPV4.to_be_bytes());
        out.extend_from_slice(&[layout::HLEN_ETHERNET, layout::PLEN_IPV4]);
        out.extend_from_slice(&self.operation.to_be_bytes());
        out.extend_from_slice(&self.sha);
        out.extend_from_slice(&self.spa);
        out.extend_from_slice(&self.tha);
        out.extend_from_slice(&self.tpa);
        out.extend_from_slice(payload);
        out
    }
}
