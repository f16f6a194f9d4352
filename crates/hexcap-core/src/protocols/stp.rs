//! Spanning tree configuration BPDU (802.1D).
//!
//! Timer fields are transmitted in units of 1/256 second; the editable
//! column is the whole-second high byte and the low byte is kept verbatim.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::stp as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stp {
    pub proto_id: u16,
    pub version: u8,
    pub bpdu_type: u8,
    pub flags: u8,
    pub root_id: [u8; 8],
    pub root_path_cost: u32,
    pub bridge_id: [u8; 8],
    pub port_id: u16,
    pub age: u16,
    pub max_age: u16,
    pub hello: u16,
    pub fwd_delay: u16,
}

impl Stp {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let header = Self {
            proto_id: reader.read_u16_be(layout::PROTO_ID_RANGE)?,
            version: reader.read_u8(layout::VERSION_OFFSET)?,
            bpdu_type: reader.read_u8(layout::BPDU_TYPE_OFFSET)?,
            flags: reader.read_u8(layout::FLAGS_OFFSET)?,
            root_id: reader.read_array::<8>(layout::ROOT_ID_RANGE)?,
            root_path_cost: reader.read_u32_be(layout::ROOT_PATH_RANGE)?,
            bridge_id: reader.read_array::<8>(layout::BRIDGE_ID_RANGE)?,
            port_id: reader.read_u16_be(layout::PORT_ID_RANGE)?,
            age: reader.read_u16_be(layout::AGE_RANGE)?,
            max_age: reader.read_u16_be(layout::MAX_AGE_RANGE)?,
            hello: reader.read_u16_be(layout::HELLO_RANGE)?,
            fwd_delay: reader.read_u16_be(layout::FWD_DELAY_RANGE)?,
        };
        Ok((header, reader.rest(layout::HEADER_LEN)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len());
        out.extend_from_slice(&self.proto_id.to_be_bytes());
        out.extend_from_slice(&[self.version, self.bpdu_type, self.flags]);
        out.extend_from_slice(&self.root_id);
        out.extend_from_slice(&self.root_path_cost.to_be_bytes());
        out.extend_from_slice(&self.bridge_id);
        out.extend_from_slice(&self.port_id.to_be_bytes());
        for timer in [self.age, self.max_age, self.hello, self.fwd_delay] {
            out.extend_from_slice(&timer.to_be_bytes());
        }
        out.extend_from_slice(payload);
        out
    }
}

/// Whole seconds of a 1/256 s timer.
pub fn timer_seconds(timer: u16) -> u8 {
    timer.to_be_bytes()[0]
}

/// Replace the whole-second part of a timer, keeping its fraction.
pub fn with_timer_seconds(timer: u16, seconds: u8) -> u16 {
    u16::from_be_bytes([seconds, timer.to_be_bytes()[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bpdu() -> Vec<u8> {
        let mut bpdu = vec![0x00, 0x00, 0x00, 0x00, 0x00];
        bpdu.extend_from_slice(&[0x80, 0x00, 0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e]);
        bpdu.extend_from_slice(&4u32.to_be_bytes());
        bpdu.extend_from_slice(&[0x80, 0x00, 0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5f]);
        bpdu.extend_from_slice(&0x8001u16.to_be_bytes());
        bpdu.extend_from_slice(&[0x01, 0x00, 0x14, 0x00, 0x02, 0x00, 0x0f, 0x80]);
        bpdu
    }

    #[test]
    fn parses_configuration_bpdu() {
        let data = sample_bpdu();
        let (stp, inner) = Stp::parse(&data).unwrap();
        assert_eq!(stp.root_path_cost, 4);
        assert_eq!(stp.port_id, 0x8001);
        assert_eq!(timer_seconds(stp.age), 1);
        assert_eq!(timer_seconds(stp.max_age), 20);
        assert_eq!(stp.fwd_delay, 0x0f80);
        assert!(inner.is_empty());
        assert_eq!(stp.encapsulate(inner), data);
    }

    #[test]
    fn timer_seconds_keep_fraction() {
        assert_eq!(with_timer_seconds(0x0f80, 0x10), 0x1080);
    }

    #[test]
    fn rejects_short_bpdu() {
        let data = sample_bpdu();
        assert!(Stp::parse(&data[..30]).is_err());
    }
}
