use thiserror::Error;

/// Failures while opening or walking a capture file.
#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a pcap or pcapng file (magic {magic:02x?})")]
    UnknownFormat { magic: [u8; 4] },
    #[error("{context}: {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}
