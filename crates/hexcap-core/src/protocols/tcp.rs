//! TCP header. Data offset, flags, checksum, urgent pointer and options are
//! passthrough.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::tcp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tcp {
    pub src_port: u16,
    pub dst_port: u16,
    pub sequence: u32,
    pub ack: u32,
    pub offset_flags: u16,
    pub window: u16,
    pub checksum: u16,
    pub urgent: u16,
    pub options: Vec<u8>,
}

impl Tcp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::MIN_HEADER_LEN)?;
        let offset_flags = reader.read_u16_be(layout::OFFSET_FLAGS_RANGE)?;
        let header_len = (offset_flags >> 12) as usize * 4;
        if header_len < layout::MIN_HEADER_LEN {
            return Err(DecodeError::Malformed {
                protocol: "tcp",
                reason: "data offset below 5 words",
            });
        }
        reader.require_len(header_len)?;
        let header = Self {
            src_port: reader.read_u16_be(layout::SRC_PORT_RANGE)?,
            dst_port: reader.read_u16_be(layout::DST_PORT_RANGE)?,
            sequence: reader.read_u32_be(layout::SEQUENCE_RANGE)?,
            ack: reader.read_u32_be(layout::ACK_RANGE)?,
            offset_flags,
            window: reader.read_u16_be(layout::WINDOW_RANGE)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            urgent: reader.read_u16_be(layout::URGENT_RANGE)?,
            options: reader
                .read_slice(layout::MIN_HEADER_LEN..header_len)?
                .to_vec(),
        };
        Ok((header, reader.rest(header_len)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(layout::MIN_HEADER_LEN + self.options.len() + payload.len());
        out.extend_from_slice(&self.src_port.to_be_bytes());
        out.extend_from_slice(&self.dst_port.to_be_bytes());
        out.extend_from_slice(&self.sequence.to_be_bytes());
        out.extend_from_slice(&self.ack.to_be_bytes());
        for word in [self.offset_flags, self.window, self.checksum, self.urgent] {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out.extend_from_slice(&self.options);
        out.extend_from_slice(payload);
        out
    }
}
