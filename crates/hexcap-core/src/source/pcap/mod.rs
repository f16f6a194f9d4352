//! Capture-file source.
//!
//! Reads legacy pcap and pcapng files and emits one raw `PacketEvent` per
//! record, tagged with the link type of its interface. Frames are not
//! interpreted here; decoding belongs to `Packet`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
