//! IPv6 fixed header. Extension headers are not decoded; a packet that
//! carries one degrades at the next-header dispatch.

use super::common::reader::ByteReader;
use super::error::DecodeError;
use super::layout::ipv6 as layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6 {
    /// Version, traffic class and flow label, kept verbatim.
    pub version_flow: u32,
    pub payload_len: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src: [u8; 16],
    pub dst: [u8; 16],
    pub trailer: Vec<u8>,
}

impl Ipv6 {
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let reader = ByteReader::new(data);
        reader.require_len(layout::HEADER_LEN)?;
        let version_flow = reader.read_u32_be(layout::VERSION_FLOW_RANGE)?;
        if (version_flow >> 28) as u8 != layout::VERSION {
            return Err(DecodeError::Malformed {
                protocol: "ipv6",
                reason: "version is not 6",
            });
        }
        let payload_len = reader.read_u16_be(layout::PAYLOAD_LEN_RANGE)?;
        let end = (layout::HEADER_LEN + payload_len as usize).min(reader.len());
        let header = Self {
            version_flow,
            payload_len,
            next_header: reader.read_u8(layout::NEXT_HEADER_OFFSET)?,
            hop_limit: reader.read_u8(layout::HOP_LIMIT_OFFSET)?,
            src: reader.read_array::<16>(layout::SRC_RANGE)?,
            dst: reader.read_array::<16>(layout::DST_RANGE)?,
            trailer: reader.rest(end)?.to_vec(),
        };
        Ok((header, reader.read_slice(layout::HEADER_LEN..end)?))
    }

    pub fn encapsulate(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout::HEADER_LEN + payload.len() + self.trailer.len());
        out.extend_from_slice(&self.version_flow.to_be_bytes());
        out.extend_from_slice(&self.payload_len.to_be_bytes());
        out.extend_from_slice(&[self.next_header, self.hop_limit]);
        out.extend_from_slice(&self.src);
        out.extend_from_slice(&self.dst);
        out.extend_from_slice(payload);
        out.extend_from_slice(&self.trailer);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Ipv6;
    use etherparse::PacketBuilder;

    #[test]
    fn parses_and_round_trips() {
        let mut src = [0u8; 16];
        src[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
        src[15] = 1;
        let mut dst = src;
        dst[15] = 2;
        let builder = PacketBuilder::ipv6(src, dst, 32).udp(546, 547);
        let mut data = Vec::with_capacity(builder.size(4));
        builder.write(&mut data, &[1, 2, 3, 4]).unwrap();

        let (ip, inner) = Ipv6::parse(&data).unwrap();
        assert_eq!(ip.src, src);
        assert_eq!(ip.dst, dst);
        assert_eq!(ip.hop_limit, 32);
        assert_eq!(ip.next_header, 17);
        assert_eq!(inner.len(), 12);
        assert!(ip.trailer.is_empty());
        assert_eq!(ip.encapsulate(inner), data);
    }

    #[test]
    fn rejects_ipv4_bytes() {
        let mut data = vec![0u8; 40];
        data[0] = 0x45;
        assert!(Ipv6::parse(&data).is_err());
    }
}
