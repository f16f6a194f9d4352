//! Byte-level constants of the capture container formats.

/// Section header block type, which doubles as the pcapng file magic.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Legacy pcap magic with microsecond timestamps, as big-endian bytes.
pub const PCAP_MAGIC_MICROS: u32 = 0xa1b2_c3d4;
/// Legacy pcap magic with nanosecond timestamps, as big-endian bytes.
pub const PCAP_MAGIC_NANOS: u32 = 0xa1b2_3c4d;

/// pcapng `if_tsresol` when the interface carries no such option.
pub const DEFAULT_TSRESOL: u8 = 6;
/// High bit of `if_tsresol`: the rest is a power of two, not of ten.
pub const TSRESOL_BINARY_FLAG: u8 = 0x80;

/// Read buffer handed to the `pcap-parser` readers; must hold the largest
/// single block in the file.
pub const PCAP_READER_BUFFER_SIZE: usize = 65_536;
