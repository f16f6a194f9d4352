//! Ethernet framing: Ethernet II, raw 802.3 with an LLC header, and 802.3
//! with LLC/SNAP.
//!
//! The type/length field decides the variant. Anything past the LLC or SNAP
//! header is the inner payload, including any trailing padding, so a frame
//! always re-encodes to the bytes it was parsed from.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::ethernet as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetII {
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub ethertype: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ethernet8023 {
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub length: u16,
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetSnap {
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub length: u16,
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
    pub org: [u8; 3],
    pub protocol: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthernetHeader {
    II(EthernetII),
    Dot3(Ethernet8023),
    Snap(EthernetSnap),
}

pub fn parse(data: &[u8]) -> Result<(EthernetHeader, &[u8]), DecodeError> {
    let reader = ByteReader::new(data);
    reader.require_len(layout::HEADER_LEN)?;
    let dst = reader.read_array::<6>(layout::DST_RANGE)?;
    let src = reader.read_array::<6>(layout::SRC_RANGE)?;
    let type_or_len = reader.read_u16_be(layout::TYPE_RANGE)?;

    if type_or_len > layout::MAX_PAYLOAD_LEN {
        let header = EthernetII {
            dst,
            src,
            ethertype: type_or_len,
        };
        return Ok((EthernetHeader::II(header), reader.rest(layout::HEADER_LEN)?));
    }

    let llc = ByteReader::new(reader.rest(layout::HEADER_LEN)?);
    llc.require_len(layout::LLC_LEN)?;
    let dsap = llc.read_u8(layout::LLC_DSAP_OFFSET)?;
    let ssap = llc.read_u8(layout::LLC_SSAP_OFFSET)?;
    let control = llc.read_u8(layout::LLC_CTL_OFFSET)?;

    if layout::SAP_SNAP.contains(&dsap) && layout::SAP_SNAP.contains(&ssap) {
        llc.require_len(layout::SNAP_LEN)?;
        let header = EthernetSnap {
            dst,
            src,
            length: type_or_len,
            dsap,
            ssap,
            control,
            org: llc.read_array::<3>(layout::SNAP_ORG_RANGE)?,
            protocol: llc.read_u16_be(layout::SNAP_TYPE_RANGE)?,
        };
        return Ok((EthernetHeader::Snap(header), llc.rest(layout::SNAP_LEN)?));
    }

    let header = Ethernet8023 {
        dst,
        src,
        length: type_or_len,
        dsap,
        ssap,
        control,
    };
    Ok((EthernetHeader::Dot3(header), llc.rest(layout::LLC_LEN)?))
}

impl EthernetII {
    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&self.dst);
        out.extend_from_slice(&self.src);
        out.extend_from_slice(&self.ethertype.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }
}

impl Ethernet8023 {
    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + layout::LLC_LEN + payload.len());
        out.extend_from_slice(&self.dst);
        out.extend_from_slice(&self.src);
        out.extend_from_slice(&self.length.to_be_bytes());
        out.extend_from_slice(&[self.dsap, self.ssap, self.control]);
        out.extend_from_slice(payload);
        out
    }
}

impl EthernetSnap {
    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + layout::SNAP_LEN + payload.len());
        out.extend_from_slice(&self.dst);
        out.extend_from_slice(&self.src);
        out.extend_from_slice(&self.length.to_be_bytes());
        out.extend_from_slice(&[self.dsap, self.ssap, self.control]);
        out.extend_from_slice(&self.org);
        out.extend_from_slice(&self.protocol.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }
}
