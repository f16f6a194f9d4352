//! Container-level helpers: format sniffing and timestamp scaling.

use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::error::PcapSourceError;
use super::layout;

/// Container flavour, picked from the first four bytes of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    /// Legacy pcap; `nanos` when record fractions count nanoseconds.
    Pcap { nanos: bool },
    PcapNg,
}

/// One pcapng interface, as declared by its description block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    pub linktype: Linktype,
    /// Timestamp units per second.
    pub ticks_per_second: u64,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            linktype: Linktype::ETHERNET,
            ticks_per_second: 1_000_000,
        }
    }
}

/// Read the magic bytes, rewind, and classify the container.
///
/// # Errors
/// `Io` when fewer than four bytes can be read, `UnknownFormat` when the
/// magic matches neither pcap byte order nor pcapng.
pub fn sniff_format<R: Read + Seek>(reader: &mut R) -> Result<CaptureFormat, PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    detect_format(magic)
}

pub fn detect_format(magic: [u8; 4]) -> Result<CaptureFormat, PcapSourceError> {
    if magic == layout::PCAPNG_MAGIC {
        return Ok(CaptureFormat::PcapNg);
    }
    let be = u32::from_be_bytes(magic);
    let le = u32::from_le_bytes(magic);
    if be == layout::PCAP_MAGIC_MICROS || le == layout::PCAP_MAGIC_MICROS {
        Ok(CaptureFormat::Pcap { nanos: false })
    } else if be == layout::PCAP_MAGIC_NANOS || le == layout::PCAP_MAGIC_NANOS {
        Ok(CaptureFormat::Pcap { nanos: true })
    } else {
        Err(PcapSourceError::UnknownFormat { magic })
    }
}

/// Interface for a packet's `if_id`; undeclared ids fall back to Ethernet
/// with microsecond timestamps.
pub fn interface_for(interfaces: &[Interface], if_id: u32) -> Interface {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or_default()
}

/// Units per second for a pcapng `if_tsresol` value; `None` when the
/// exponent overflows.
pub fn ticks_per_second(tsresol: u8) -> Option<u64> {
    let exponent = u32::from(tsresol & !layout::TSRESOL_BINARY_FLAG);
    if tsresol & layout::TSRESOL_BINARY_FLAG != 0 {
        1u64.checked_shl(exponent)
    } else {
        10u64.checked_pow(exponent)
    }
}

pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32, ticks_per_second: u64) -> f64 {
    let ticks = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ticks as f64 / ticks_per_second.max(1) as f64
}

pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanos: bool) -> f64 {
    let scale = if nanos { 1e-9 } else { 1e-6 };
    f64::from(ts_sec) + f64::from(ts_frac) * scale
}
