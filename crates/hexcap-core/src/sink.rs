//! Legacy pcap writer.
//!
//! Output is always little-endian, version 2.4 with microsecond timestamps,
//! one record per frame. The link type is Ethernet unless given.

use std::io::{self, Write};

use pcap_parser::Linktype;

const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
const VERSION_MAJOR: u16 = 2;
const VERSION_MINOR: u16 = 4;
const SNAPLEN: u32 = 65_535;

pub struct PcapWriter<W: Write> {
    inner: W,
}

impl<W: Write> PcapWriter<W> {
    /// Write an Ethernet global header and return a writer positioned for
    /// records.
    pub fn new(inner: W) -> io::Result<Self> {
        Self::with_linktype(inner, Linktype::ETHERNET)
    }

    pub fn with_linktype(mut inner: W, linktype: Linktype) -> io::Result<Self> {
        inner.write_all(&PCAP_MAGIC.to_le_bytes())?;
        inner.write_all(&VERSION_MAJOR.to_le_bytes())?;
        inner.write_all(&VERSION_MINOR.to_le_bytes())?;
        // thiszone, sigfigs
        inner.write_all(&0i32.to_le_bytes())?;
        inner.write_all(&0u32.to_le_bytes())?;
        inner.write_all(&SNAPLEN.to_le_bytes())?;
        inner.write_all(&(linktype.0 as u32).to_le_bytes())?;
        Ok(Self { inner })
    }

    pub fn write_packet(&mut self, ts: f64, data: &[u8]) -> io::Result<()> {
        let (sec, usec) = split_timestamp(ts);
        let len = u32::try_from(data.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "record too large"))?;
        self.inner.write_all(&sec.to_le_bytes())?;
        self.inner.write_all(&usec.to_le_bytes())?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(data)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Seconds and microseconds of a capture time; negative or out-of-range
/// times clamp to the representable range.
fn split_timestamp(ts: f64) -> (u32, u32) {
    let micros = (ts.max(0.0) * 1e6).round() as u64;
    let sec = u32::try_from(micros / 1_000_000).unwrap_or(u32::MAX);
    (sec, (micros % 1_000_000) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError, traits::PcapReaderIterator};

    #[test]
    fn header_is_little_endian_ethernet() {
        let bytes = PcapWriter::new(Vec::new()).unwrap().into_inner();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..4], &[0xd4, 0xc3, 0xb2, 0xa1]);
        assert_eq!(&bytes[4..8], &[2, 0, 4, 0]);
        assert_eq!(&bytes[16..20], &[0xff, 0xff, 0, 0]);
        assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
    }

    #[test]
    fn header_carries_requested_linktype() {
        let bytes = PcapWriter::with_linktype(Vec::new(), Linktype::RAW)
            .unwrap()
            .into_inner();
        assert_eq!(&bytes[20..24], &[101, 0, 0, 0]);

        let mut reader = LegacyPcapReader::new(65536, bytes.as_slice()).unwrap();
        match reader.next() {
            Ok((_, PcapBlockOwned::LegacyHeader(header))) => {
                assert_eq!(header.network, Linktype::RAW)
            }
            _ => panic!("expected a pcap header block"),
        }
    }

    #[test]
    fn records_read_back_with_pcap_parser() {
        let mut writer = PcapWriter::new(Vec::new()).unwrap();
        writer.write_packet(12.25, &[1, 2, 3]).unwrap();
        writer.write_packet(13.0, &[4; 60]).unwrap();
        let bytes = writer.into_inner();

        let mut reader = LegacyPcapReader::new(65536, bytes.as_slice()).unwrap();
        let mut records = Vec::new();
        loop {
            match reader.next() {
                Ok((offset, block)) => {
                    if let PcapBlockOwned::Legacy(packet) = block {
                        records.push((packet.ts_sec, packet.ts_usec, packet.data.to_vec()));
                    }
                    reader.consume(offset);
                }
                Err(PcapError::Eof) => break,
                Err(PcapError::Incomplete(_)) => reader.refill().unwrap(),
                Err(err) => panic!("unexpected error: {err:?}"),
            }
        }
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (12, 250_000, vec![1, 2, 3]));
        assert_eq!(records[1].2.len(), 60);
    }

    #[test]
    fn timestamps_split_into_microseconds() {
        assert_eq!(split_timestamp(1.5), (1, 500_000));
        assert_eq!(split_timestamp(-3.0), (0, 0));
        assert_eq!(split_timestamp(1_000.000_001), (1_000, 1));
    }
}
