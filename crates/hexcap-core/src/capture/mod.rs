//! Captures: the ordered packets of one file plus the yank/paste clipboard.
//!
//! Packet ids stay dense and 1-based: after any structural change the
//! packet at index `i` carries pid `i + 1`. Packets sitting in the
//! clipboard are detached and show an invalidated pid.

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use pcap_parser::Linktype;
use tracing::{debug, info};

use crate::layer::LayerId;
use crate::packet::Packet;
use crate::sink::PcapWriter;
use crate::source::{FrameSource, PacketEvent, PacketSource, PcapFileSource};
use crate::{CaptureSummary, ColumnLayout, Config, SectionLayout, ts_to_rfc3339};

pub use error::CaptureError;

#[derive(Debug, Clone)]
pub struct Capture {
    packets: Vec<Packet>,
    clipboard: Vec<Packet>,
    path: Option<PathBuf>,
    config: Config,
}

impl Capture {
    /// Load a pcap or pcapng file; later `save` calls write back to `path`.
    pub fn open(path: &Path, config: Config) -> Result<Self, CaptureError> {
        let source = PcapFileSource::open(path)?;
        let mut capture = Self::read(source, config)?;
        capture.path = Some(path.to_path_buf());
        Ok(capture)
    }

    /// Decode every record of `source`, numbering packets from 1.
    ///
    /// A record that cannot be decoded still becomes a packet; only source
    /// errors abort the load.
    pub fn read<S: PacketSource>(mut source: S, config: Config) -> Result<Self, CaptureError> {
        let mut packets = Vec::new();
        while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
            let pid = packets.len() + 1;
            let ts = ts.unwrap_or_default();
            let packet = Packet::with_linktype(ts, &data, pid, linktype, &config);
            if packet.is_unsupported() {
                debug!(pid, "packet kept opaque");
            }
            packets.push(packet);
        }

        let unsupported = packets.iter().filter(|p| p.is_unsupported()).count();
        info!(packets = packets.len(), unsupported, "capture loaded");
        Ok(Self {
            packets,
            clipboard: Vec::new(),
            path: None,
            config,
        })
    }

    /// Build a capture from `(timestamp, Ethernet frame)` pairs.
    pub fn from_frames(
        frames: impl IntoIterator<Item = (f64, Vec<u8>)>,
        config: Config,
    ) -> Result<Self, CaptureError> {
        Self::read(FrameSource::new(frames), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn packet_mut(&mut self, index: usize) -> Option<&mut Packet> {
        self.packets.get_mut(index)
    }

    pub fn clipboard(&self) -> &[Packet] {
        &self.clipboard
    }

    /// Move packets `first..=last` (zero-based, either order) into the
    /// clipboard, replacing its contents. A `last` past the end is clamped.
    /// Returns the number of packets yanked.
    pub fn yank(&mut self, first: usize, last: usize) -> Result<usize, CaptureError> {
        let (first, last) = (first.min(last), first.max(last));
        if first >= self.packets.len() {
            return Err(CaptureError::OutOfRange {
                index: first,
                len: self.packets.len(),
            });
        }
        let last = last.min(self.packets.len() - 1);

        self.clipboard = self.packets.drain(first..=last).collect();
        for packet in &mut self.clipboard {
            packet.invalidate_pid();
        }
        self.reset_pids(first);
        debug!(first, last, yanked = self.clipboard.len(), "yanked packets");
        Ok(self.clipboard.len())
    }

    /// Insert a copy of the clipboard before packet `before` (zero-based;
    /// `len()` appends). The clipboard is kept for further pastes.
    pub fn paste(&mut self, before: usize) -> Result<usize, CaptureError> {
        if before > self.packets.len() {
            return Err(CaptureError::OutOfRange {
                index: before,
                len: self.packets.len(),
            });
        }
        let count = self.clipboard.len();
        self.packets
            .splice(before..before, self.clipboard.iter().cloned());
        self.reset_pids(before);
        debug!(before, pasted = count, "pasted packets");
        Ok(count)
    }

    fn reset_pids(&mut self, first: usize) {
        for (index, packet) in self.packets.iter_mut().enumerate().skip(first) {
            packet.set_pid(index + 1);
        }
    }

    /// Smallest `min_size` of any packet.
    pub fn min_pkt_size(&self) -> Option<usize> {
        self.packets.iter().map(Packet::min_size).min()
    }

    /// Largest `max_size` of any packet.
    pub fn max_pkt_size(&self) -> Option<usize> {
        self.packets.iter().map(Packet::max_size).max()
    }

    pub fn set_min_pkt_size(&mut self, size: usize) {
        for packet in &mut self.packets {
            packet.set_min_size(size);
        }
    }

    pub fn set_max_pkt_size(&mut self, size: usize) {
        for packet in &mut self.packets {
            packet.set_max_size(size);
        }
    }

    pub fn set_pkt_size_range(&mut self, min: usize, max: usize) -> Result<(), CaptureError> {
        if min > max {
            return Err(CaptureError::InvalidSizeRange { min, max });
        }
        self.set_min_pkt_size(min);
        self.set_max_pkt_size(max);
        Ok(())
    }

    /// Every packet, including all generated copies, encodes within its
    /// size bounds.
    pub fn is_writable(&self) -> bool {
        self.packets
            .iter()
            .all(|packet| packet.frames().is_ok())
    }

    /// Layers visible anywhere in the capture, ordered by rank and then by
    /// first appearance.
    pub fn sections(&self) -> Vec<SectionLayout> {
        let mut sections: Vec<SectionLayout> = Vec::new();
        for packet in &self.packets {
            for layer in packet.layers() {
                if packet.is_unsupported() && !matches!(layer.id(), LayerId::Pid | LayerId::TStamp)
                {
                    continue;
                }
                if sections.iter().any(|section| section.id == layer.id()) {
                    continue;
                }
                let at = sections.partition_point(|section| section.id.rank() <= layer.rank());
                sections.insert(
                    at,
                    SectionLayout {
                        id: layer.id(),
                        read_only: layer.is_read_only(),
                        exposable: layer.is_exposable(),
                        exposed: layer.is_exposed(),
                        columns: layer
                            .columns()
                            .into_iter()
                            .map(|(name, width)| ColumnLayout {
                                name: name.to_string(),
                                width,
                            })
                            .collect(),
                    },
                );
            }
        }
        sections
    }

    pub fn summary(&self) -> CaptureSummary {
        let stamps = self.packets.iter().map(Packet::timestamp);
        let first = stamps.clone().reduce(f64::min);
        let last = stamps.reduce(f64::max);
        CaptureSummary {
            packets_total: self.packets.len() as u64,
            time_start: ts_to_rfc3339(first),
            time_end: ts_to_rfc3339(last),
        }
    }

    /// Write to the file this capture was opened from or last saved as.
    pub fn save(&self) -> Result<(), CaptureError> {
        let path = self.path.as_deref().ok_or(CaptureError::NoPath)?;
        self.write_to(path)
    }

    /// Write to `path` and remember it for later `save` calls. The parent
    /// directory must already exist; it is never created.
    pub fn save_as(&mut self, path: &Path) -> Result<(), CaptureError> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !dir.is_dir() {
            return Err(CaptureError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Encode every physical packet, then write the file in one go so an
    /// encode failure leaves the destination untouched.
    fn write_to(&self, path: &Path) -> Result<(), CaptureError> {
        let bytes = self.encode()?;
        fs::write(path, bytes)?;
        info!(path = %path.display(), packets = self.packets.len(), "capture saved");
        Ok(())
    }

    /// The single link type shared by every packet; Ethernet when empty.
    ///
    /// # Errors
    /// `MixedLinktypes` when packets disagree, since a pcap file carries one
    /// link type in its header.
    pub fn linktype(&self) -> Result<Linktype, CaptureError> {
        let mut linktypes = self.packets.iter().map(Packet::linktype);
        let Some(first) = linktypes.next() else {
            return Ok(Linktype::ETHERNET);
        };
        match linktypes.find(|other| *other != first) {
            Some(other) => Err(CaptureError::MixedLinktypes {
                first: first.0,
                other: other.0,
            }),
            None => Ok(first),
        }
    }

    fn encode(&self) -> Result<Vec<u8>, CaptureError> {
        let mut writer = PcapWriter::with_linktype(Vec::new(), self.linktype()?)?;
        let mut records = 0usize;
        for packet in &self.packets {
            for copy in packet.expand_generators()? {
                writer.write_packet(copy.timestamp(), &copy.data()?)?;
                records += 1;
            }
        }
        debug!(records, "capture encoded");
        Ok(writer.into_inner())
    }
}
