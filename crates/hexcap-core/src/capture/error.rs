use std::path::PathBuf;

use thiserror::Error;

use crate::packet::PacketError;
use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("cannot encode capture: {0}")]
    Packet(#[from] PacketError),
    #[error("directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },
    #[error("capture has no file name; use save_as")]
    NoPath,
    #[error("index {index} out of range for {len} packets")]
    OutOfRange { index: usize, len: usize },
    #[error("packets mix link types {first} and {other}; a pcap file holds one")]
    MixedLinktypes { first: i32, other: i32 },
    #[error("invalid packet size range: min {min} exceeds max {max}")]
    InvalidSizeRange { min: usize, max: usize },
}
