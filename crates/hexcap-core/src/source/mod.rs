//! Packet sources feeding `Capture::read`.

mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured record: capture time in seconds, link type and raw frame.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            other => SourceError::Pcap(other.to_string()),
        }
    }
}

/// Frames already held in memory, replayed in order as Ethernet records.
#[derive(Debug, Default)]
pub struct FrameSource {
    frames: std::collections::VecDeque<(f64, Vec<u8>)>,
}

impl FrameSource {
    pub fn new(frames: impl IntoIterator<Item = (f64, Vec<u8>)>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl PacketSource for FrameSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.frames.pop_front().map(|(ts, data)| PacketEvent {
            ts: Some(ts),
            linktype: Linktype::ETHERNET,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_source_replays_in_order() {
        let mut source = FrameSource::new([(1.0, vec![1]), (2.0, vec![2, 2])]);
        let first = source.next_packet().unwrap().unwrap();
        assert_eq!((first.ts, first.data), (Some(1.0), vec![1]));
        let second = source.next_packet().unwrap().unwrap();
        assert_eq!(second.linktype, Linktype::ETHERNET);
        assert_eq!(second.data.len(), 2);
        assert!(source.next_packet().unwrap().is_none());
    }
}
