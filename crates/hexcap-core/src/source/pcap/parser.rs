use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};
use tracing::debug;

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    CaptureFormat, Interface, interface_for, legacy_ts_to_seconds, pcapng_ts_to_seconds,
    sniff_format, ticks_per_second,
};

/// `PacketSource` over a pcap or pcapng file, picked by the file magic.
pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanos: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            PcapReader::Legacy {
                reader,
                linktype,
                nanos,
            } => next_legacy(reader, linktype, *nanos)?,
            PcapReader::Ng { reader, interfaces } => next_ng(reader, interfaces)?,
        };
        Ok(event)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    match sniff_format(&mut file)? {
        CaptureFormat::PcapNg => {
            debug!("opening pcapng capture");
            let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                .map_err(|e| pcap_error("pcapng reader init", e))?;
            Ok(PcapReader::Ng {
                reader,
                interfaces: Vec::new(),
            })
        }
        CaptureFormat::Pcap { nanos } => {
            debug!(nanos, "opening legacy pcap capture");
            let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                .map_err(|e| pcap_error("pcap reader init", e))?;
            Ok(PcapReader::Legacy {
                reader,
                linktype: None,
                nanos,
            })
        }
    }
}

fn next_legacy(
    reader: &mut LegacyPcapReader<File>,
    linktype: &mut Option<Linktype>,
    nanos: bool,
) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec, nanos)),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| pcap_error("pcap reader refill", e))?;
            }
            Err(e) => return Err(pcap_error("pcap reader next", e)),
        }
    }
}

fn next_ng(
    reader: &mut PcapNGReader<File>,
    interfaces: &mut Vec<Interface>,
) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                        // interface ids restart with every section
                        interfaces.clear();
                        None
                    }
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        let ticks = ticks_per_second(intf.if_tsresol).ok_or_else(|| {
                            pcap_error("pcapng interface", "timestamp resolution overflows")
                        })?;
                        debug!(linktype = ?intf.linktype, ticks, "pcapng interface");
                        interfaces.push(Interface {
                            linktype: intf.linktype,
                            ticks_per_second: ticks,
                        });
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                        let interface = interface_for(interfaces, packet.if_id);
                        Some(PacketEvent {
                            ts: Some(pcapng_ts_to_seconds(
                                packet.ts_high,
                                packet.ts_low,
                                interface.ticks_per_second,
                            )),
                            linktype: interface.linktype,
                            data: packet.data.to_vec(),
                        })
                    }
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| pcap_error("pcapng reader refill", e))?;
            }
            Err(e) => return Err(pcap_error("pcapng reader next", e)),
        }
    }
}

fn pcap_error(context: &'static str, err: impl std::fmt::Display) -> PcapSourceError {
    PcapSourceError::Pcap {
        context,
        message: err.to_string(),
    }
}
