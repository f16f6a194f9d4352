//! Packets: the layer stack of one frame.
//!
//! Position 0 of the stack is always the packet id and the timestamp follows
//! the optional generator marker; protocol layers come after in strictly
//! increasing rank. Encoding folds the stack from the innermost layer
//! outward, each header wrapping the bytes produced so far.

mod decode;
pub mod error;

use pcap_parser::Linktype;
use tracing::debug;

use crate::generator::{GeneratorError, MaskSpec};
use crate::layer::{EditError, Layer, LayerId, LayerKind, PktId, TStamp};
use crate::{Config, PacketView};

pub use error::PacketError;

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    layers: Vec<Layer>,
    /// Application bytes after the terminal header; size padding goes here.
    payload: Vec<u8>,
    unsupported: bool,
    /// Link type of the captured record; non-Ethernet frames stay opaque.
    linktype: Linktype,
    min_size: usize,
    max_size: usize,
}

impl Packet {
    /// Decode an Ethernet frame captured at `ts` seconds.
    pub fn new(ts: f64, frame: &[u8], pid: usize, config: &Config) -> Self {
        Self::with_linktype(ts, frame, pid, Linktype::ETHERNET, config)
    }

    /// Decode a frame of any link type; only Ethernet frames are decoded,
    /// others are kept whole as an opaque layer.
    pub fn with_linktype(
        ts: f64,
        frame: &[u8],
        pid: usize,
        linktype: Linktype,
        config: &Config,
    ) -> Self {
        let decoded = if linktype == Linktype::ETHERNET {
            decode::decode_ethernet(frame, config)
        } else {
            debug!(pid, linktype = linktype.0, "link type not decoded");
            decode::decode_opaque(frame, config)
        };

        let mut layers = Vec::with_capacity(decoded.layers.len() + 2);
        layers.push(Layer::from(LayerKind::PktId(PktId {
            pid: Some(pid),
            width: config.pid_width,
        })));
        layers.push(Layer::from(LayerKind::TStamp(TStamp { ts, blank: false })));
        layers.extend(decoded.layers);

        Self {
            layers,
            payload: decoded.payload,
            unsupported: decoded.unsupported,
            linktype,
            min_size: frame.len(),
            max_size: frame.len().max(config.mtu),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    pub fn linktype(&self) -> Linktype {
        self.linktype
    }

    /// `None` while the packet is detached (yanked).
    pub fn pid(&self) -> Option<usize> {
        self.layers.iter().find_map(|layer| match layer.kind() {
            LayerKind::PktId(id) => id.pid,
            _ => None,
        })
    }

    pub fn set_pid(&mut self, pid: usize) {
        self.update_pid(Some(pid));
    }

    /// Show the packet id as `?` characters.
    pub fn invalidate_pid(&mut self) {
        self.update_pid(None);
    }

    fn update_pid(&mut self, pid: Option<usize>) {
        for layer in &mut self.layers {
            if let LayerKind::PktId(id) = layer.kind_mut() {
                id.pid = pid;
            }
        }
    }

    pub fn timestamp(&self) -> f64 {
        self.tstamp().map(|ts| ts.ts).unwrap_or_default()
    }

    fn tstamp(&self) -> Option<&TStamp> {
        self.layers.iter().find_map(|layer| match layer.kind() {
            LayerKind::TStamp(ts) => Some(ts),
            _ => None,
        })
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn set_min_size(&mut self, size: usize) {
        self.min_size = size;
    }

    pub fn set_max_size(&mut self, size: usize) {
        self.max_size = size;
    }

    /// Edit one column of the layer `id`.
    ///
    /// # Errors
    /// `Unsupported` for packets that were not decoded, `NoSuchLayer` when
    /// this packet has no such layer, otherwise whatever the layer rejects.
    /// The packet is unchanged on error.
    pub fn set_column(&mut self, id: LayerId, column: &str, value: &str) -> Result<(), EditError> {
        if self.unsupported {
            return Err(EditError::Unsupported);
        }
        self.layer_mut(id)
            .ok_or_else(|| EditError::NoSuchLayer {
                layer: id.to_string(),
            })?
            .set_column(column, value)
    }

    pub fn add_generator(
        &mut self,
        id: LayerId,
        column: &str,
        count: u32,
        step: i64,
    ) -> Result<(), GeneratorError> {
        self.editable_layer(id)?.add_generator(column, count, step)?;
        self.sync_generator_marker();
        Ok(())
    }

    pub fn add_mask(
        &mut self,
        id: LayerId,
        column: &str,
        mask: &MaskSpec,
    ) -> Result<(), GeneratorError> {
        self.editable_layer(id)?.add_mask(column, mask)?;
        self.sync_generator_marker();
        Ok(())
    }

    /// Remove the generator of one column; returns whether one was present.
    pub fn clear_generator(&mut self, id: LayerId, column: &str) -> bool {
        let removed = self
            .layer_mut(id)
            .is_some_and(|layer| layer.clear_generator(column));
        self.sync_generator_marker();
        removed
    }

    pub fn has_generators(&self) -> bool {
        self.layers.iter().any(Layer::has_generators)
    }

    fn editable_layer(&mut self, id: LayerId) -> Result<&mut Layer, GeneratorError> {
        if self.unsupported {
            return Err(GeneratorError::Unsupported);
        }
        self.layer_mut(id).ok_or_else(|| {
            GeneratorError::Edit(EditError::NoSuchLayer {
                layer: id.to_string(),
            })
        })
    }

    /// Keep the marker layer present exactly while some column carries a
    /// generator, and blank the timestamp of template packets.
    fn sync_generator_marker(&mut self) {
        let wanted = self.has_generators();
        let present = self.has_layer(LayerId::Generator);
        if wanted && !present {
            let at = self
                .layers
                .partition_point(|layer| layer.rank() < LayerId::Generator.rank());
            self.layers.insert(at, Layer::from(LayerKind::Generator));
        } else if !wanted && present {
            self.layers.retain(|layer| layer.id() != LayerId::Generator);
        }
        for layer in &mut self.layers {
            if let LayerKind::TStamp(ts) = layer.kind_mut() {
                ts.blank = wanted;
            }
        }
    }

    /// Wire bytes of the frame, padded to `min_size`.
    ///
    /// Packets that were not decoded reproduce their original bytes and are
    /// never padded.
    ///
    /// # Errors
    /// `PacketTooLarge` when the frame exceeds `max_size`.
    pub fn data(&self) -> Result<Vec<u8>, PacketError> {
        self.size_pkt(self.encode(&self.payload))
    }

    fn encode(&self, payload: &[u8]) -> Vec<u8> {
        self.layers
            .iter()
            .rev()
            .fold(payload.to_vec(), |inner, layer| {
                layer.kind().encapsulate(&inner).unwrap_or(inner)
            })
    }

    fn size_pkt(&self, frame: Vec<u8>) -> Result<Vec<u8>, PacketError> {
        let frame = if !self.unsupported && frame.len() < self.min_size {
            let mut padded = self.payload.clone();
            padded.resize(padded.len() + self.min_size - frame.len(), 0);
            self.encode(&padded)
        } else {
            frame
        };
        if frame.len() > self.max_size {
            return Err(PacketError::PacketTooLarge {
                size: frame.len(),
                max: self.max_size,
            });
        }
        Ok(frame)
    }

    /// Every layer encodes and the frame fits within `max_size`.
    pub fn is_writable(&self) -> bool {
        self.data().is_ok()
    }

    /// Physical packets described by this template.
    ///
    /// The number of copies is the largest generator count (at least one).
    /// Copy `i` sets each generator column to its template value plus
    /// `(i mod count) * step` under the column's mask. Copies carry no
    /// generators and no marker layer and show their timestamp again. A
    /// packet without generators expands to itself.
    pub fn expand_generators(&self) -> Result<Vec<Packet>, PacketError> {
        if !self.has_generators() {
            return Ok(vec![self.clone()]);
        }
        let copies = self
            .layers
            .iter()
            .flat_map(|layer| layer.generators().values())
            .map(|generator| generator.count.max(1))
            .max()
            .unwrap_or(1);

        let mut template = self.clone();
        template
            .layers
            .retain(|layer| layer.id() != LayerId::Generator);
        for layer in &mut template.layers {
            if let LayerKind::TStamp(ts) = layer.kind_mut() {
                ts.blank = false;
            }
        }

        (0..copies as u64)
            .map(|index| {
                let mut copy = template.clone();
                for layer in &mut copy.layers {
                    layer.apply_generators(index)?;
                }
                Ok(copy)
            })
            .collect()
    }

    /// Encoded frames of every expanded copy, in order.
    pub fn frames(&self) -> Result<Vec<Vec<u8>>, PacketError> {
        self.expand_generators()?.iter().map(Packet::data).collect()
    }

    /// Display view. Packets that were not decoded only show their packet
    /// id and timestamp.
    pub fn out(&self) -> PacketView {
        let layers = self
            .layers
            .iter()
            .filter(|layer| {
                !self.unsupported || matches!(layer.id(), LayerId::Pid | LayerId::TStamp)
            })
            .map(Layer::out)
            .collect();
        PacketView {
            pid: self.pid(),
            unsupported: self.unsupported,
            layers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etherparse::{PacketBuilder, SlicedPacket, TransportSlice};

    fn udp_frame(payload: &[u8]) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2([0x00, 0x1b, 0x21, 0, 0, 1], [0xff; 6])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 10], 64)
            .udp(5000, 6454);
        let mut frame = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, payload).unwrap();
        frame
    }

    fn packet(frame: &[u8]) -> Packet {
        Packet::new(1_700_000_000.5, frame, 1, &Config::default())
    }

    #[test]
    fn decoded_stack_has_bookkeeping_layers_first() {
        let pkt = packet(&udp_frame(b"hello"));
        let ids: Vec<_> = pkt.layers().iter().map(Layer::id).collect();
        assert_eq!(
            ids,
            [
                LayerId::Pid,
                LayerId::TStamp,
                LayerId::EthernetII,
                LayerId::Ipv4,
                LayerId::Udp
            ]
        );
        assert_eq!(pkt.pid(), Some(1));
        assert_eq!(pkt.payload(), b"hello");
        assert!(!pkt.is_unsupported());
    }

    #[test]
    fn data_reproduces_untouched_frame() {
        let frame = udp_frame(&[1, 2, 3, 4]);
        assert_eq!(packet(&frame).data().unwrap(), frame);
    }

    #[test]
    fn edited_column_reaches_the_wire() {
        let frame = udp_frame(&[]);
        let mut pkt = packet(&frame);
        pkt.set_column(LayerId::Udp, "dport", "0035").unwrap();
        pkt.set_column(LayerId::Ipv4, "dst", "0a.00.00.01").unwrap();

        let data = pkt.data().unwrap();
        let sliced = SlicedPacket::from_ethernet(&data).unwrap();
        let Some(TransportSlice::Udp(udp)) = sliced.transport else {
            panic!("expected udp");
        };
        assert_eq!(udp.destination_port(), 53);
        assert_eq!(&data[30..34], &[10, 0, 0, 1]);
    }

    #[test]
    fn edits_to_missing_layers_are_rejected() {
        let mut pkt = packet(&udp_frame(&[]));
        let before = pkt.clone();
        assert!(matches!(
            pkt.set_column(LayerId::Tcp, "dport", "0050"),
            Err(EditError::NoSuchLayer { .. })
        ));
        assert!(matches!(
            pkt.set_column(LayerId::TStamp, "tstamp", "1.00"),
            Err(EditError::ReadOnly { .. })
        ));
        assert_eq!(pkt, before);
    }

    #[test]
    fn short_frames_are_padded_in_the_payload() {
        let frame = udp_frame(&[9]);
        let mut pkt = packet(&frame);
        pkt.set_min_size(60);
        let data = pkt.data().unwrap();
        assert_eq!(data.len(), 60);
        assert_eq!(&data[..frame.len()], frame.as_slice());
        assert!(data[frame.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn oversized_frames_fail() {
        let frame = udp_frame(&[0u8; 100]);
        let mut pkt = packet(&frame);
        pkt.set_max_size(64);
        assert_eq!(
            pkt.data(),
            Err(PacketError::PacketTooLarge {
                size: frame.len(),
                max: 64
            })
        );
        assert!(!pkt.is_writable());
    }

    #[test]
    fn default_bounds_follow_frame_and_mtu() {
        let frame = udp_frame(&[]);
        let pkt = packet(&frame);
        assert_eq!(pkt.min_size(), frame.len());
        assert_eq!(pkt.max_size(), 1500);
    }

    #[test]
    fn unsupported_packets_show_only_pid_and_timestamp() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x88, 0xcc, 0xde, 0xad]);
        let mut pkt = packet(&frame);
        assert!(pkt.is_unsupported());
        pkt.set_min_size(100);
        assert_eq!(pkt.data().unwrap(), frame);

        let view = pkt.out();
        assert!(view.unsupported);
        let ids: Vec<_> = view.layers.iter().map(|layer| layer.id).collect();
        assert_eq!(ids, [LayerId::Pid, LayerId::TStamp]);

        assert_eq!(
            pkt.set_column(LayerId::EthernetII, "etype", "0800"),
            Err(EditError::Unsupported)
        );
        assert_eq!(
            pkt.add_generator(LayerId::EthernetII, "etype", 2, 1),
            Err(GeneratorError::Unsupported)
        );
    }

    #[test]
    fn non_ethernet_link_types_stay_opaque() {
        let frame = udp_frame(&[]);
        let pkt = Packet::with_linktype(0.0, &frame[14..], 3, Linktype::RAW, &Config::default());
        assert!(pkt.is_unsupported());
        assert!(pkt.has_layer(LayerId::Undefined));
        assert!(!pkt.has_layer(LayerId::Ipv4));
        assert_eq!(pkt.data().unwrap(), &frame[14..]);
    }

    #[test]
    fn generator_marker_follows_generators() {
        let mut pkt = packet(&udp_frame(&[]));
        pkt.add_generator(LayerId::Udp, "sport", 3, 1).unwrap();
        let ids: Vec<_> = pkt.layers().iter().take(3).map(Layer::id).collect();
        assert_eq!(ids, [LayerId::Pid, LayerId::Generator, LayerId::TStamp]);
        assert_eq!(
            pkt.layer(LayerId::TStamp).and_then(|l| l.column("tstamp")),
            Some(String::new())
        );

        assert!(pkt.clear_generator(LayerId::Udp, "sport"));
        assert!(!pkt.has_layer(LayerId::Generator));
        assert_eq!(
            pkt.layer(LayerId::TStamp).and_then(|l| l.column("tstamp")),
            Some("1700000000.50".to_string())
        );
    }

    #[test]
    fn expansion_count_is_the_largest_generator() {
        let mut pkt = packet(&udp_frame(&[]));
        pkt.add_generator(LayerId::Udp, "sport", 3, 1).unwrap();
        pkt.add_generator(LayerId::Ipv4, "dst", 7, 1).unwrap();

        let copies = pkt.expand_generators().unwrap();
        assert_eq!(copies.len(), 7);
        for (i, copy) in copies.iter().enumerate() {
            assert!(!copy.has_layer(LayerId::Generator));
            assert!(!copy.has_generators());
            let sport = 5000 + (i % 3) as u16;
            assert_eq!(
                copy.layer(LayerId::Udp).and_then(|l| l.column("sport")),
                Some(format!("{sport:04x}"))
            );
            assert_eq!(
                copy.layer(LayerId::Ipv4).and_then(|l| l.column("dst")),
                Some(format!("c0.a8.00.{:02x}", 10 + i))
            );
        }
        assert_eq!(pkt.frames().unwrap().len(), 7);
    }

    #[test]
    fn masked_generator_only_moves_free_bits() {
        let mut pkt = packet(&udp_frame(&[]));
        pkt.add_generator(LayerId::Ipv4, "dst", 5, 100).unwrap();
        pkt.add_mask(LayerId::Ipv4, "dst", &MaskSpec::Hex("ffffff00".into()))
            .unwrap();
        let frames = pkt.frames().unwrap();
        let last_octets: Vec<u8> = frames.iter().map(|f| f[33]).collect();
        // 10 + k*100 wraps inside the last octet
        assert_eq!(last_octets, [10, 110, 210, 54, 154]);
        assert!(frames.iter().all(|f| f[30..33] == [192, 168, 0]));
    }

    #[test]
    fn identity_generators_expand_to_one_copy() {
        let frame = udp_frame(&[]);
        let mut pkt = packet(&frame);
        pkt.add_generator(LayerId::Udp, "sport", 1, 9).unwrap();
        assert_eq!(pkt.frames().unwrap(), vec![frame.clone()]);
        assert_eq!(packet(&frame).expand_generators().unwrap().len(), 1);
    }

    #[test]
    fn pid_can_be_invalidated_and_restored() {
        let mut pkt = packet(&udp_frame(&[]));
        pkt.invalidate_pid();
        assert_eq!(pkt.pid(), None);
        assert_eq!(pkt.out().layers[0].columns[0].value, "?????");
        pkt.set_pid(12);
        assert_eq!(pkt.out().layers[0].columns[0].value, "00012");
    }
}
