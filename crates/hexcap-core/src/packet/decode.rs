//! Frame decoding: classify each header by its outer header's next-protocol
//! field and descend until a terminal protocol is reached.
//!
//! Decoding never fails. An unknown tag, a truncated or malformed header, or
//! a header that would break the strictly increasing rank order ends the
//! descent; the remaining bytes become an opaque `Undefined` layer and the
//! packet is marked unsupported.

use etherparse::{EtherType, IpNumber};
use tracing::debug;

use crate::Config;
use crate::layer::{Layer, LayerKind, Undefined};
use crate::protocols::arp::Arp;
use crate::protocols::cdp::Cdp;
use crate::protocols::dot1q::Dot1q;
use crate::protocols::edp::Edp;
use crate::protocols::error::DecodeError;
use crate::protocols::ethernet::{self, EthernetHeader};
use crate::protocols::icmp::Icmp;
use crate::protocols::igmp::Igmp;
use crate::protocols::ipv4::Ipv4;
use crate::protocols::ipv6::Ipv6;
use crate::protocols::layout;
use crate::protocols::stp::Stp;
use crate::protocols::tcp::Tcp;
use crate::protocols::udp::Udp;

/// What the current header says about the bytes it encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Ethernet,
    EtherType { value: u16, snap: bool },
    Llc { dsap: u8 },
    Ip { protocol: u8, v4: bool },
    Done,
}

type Step<'a> = Result<Option<(LayerKind, Next, &'a [u8])>, DecodeError>;

pub(crate) struct Decoded {
    pub layers: Vec<Layer>,
    /// Bytes after the terminal header.
    pub payload: Vec<u8>,
    pub unsupported: bool,
}

pub(crate) fn decode_ethernet(frame: &[u8], config: &Config) -> Decoded {
    let mut layers = Vec::new();
    let mut rest = frame;
    let mut next = Next::Ethernet;
    let mut last_rank = 0u8;

    while next != Next::Done {
        match decode_one(next, rest) {
            Ok(Some((kind, following, inner))) if kind.id().rank() > last_rank => {
                last_rank = kind.id().rank();
                layers.push(Layer::from(kind));
                rest = inner;
                next = following;
            }
            Ok(Some((kind, ..))) => {
                debug!(layer = %kind.id(), "nested layer out of order; keeping remainder opaque");
                return unsupported(layers, rest, config);
            }
            Ok(None) => {
                debug!(?next, "unrecognized next protocol; keeping remainder opaque");
                return unsupported(layers, rest, config);
            }
            Err(err) => {
                debug!(?next, error = %err, "header decode failed; keeping remainder opaque");
                return unsupported(layers, rest, config);
            }
        }
    }

    Decoded {
        layers,
        payload: rest.to_vec(),
        unsupported: false,
    }
}

/// A frame of a link type that is not decoded at all.
pub(crate) fn decode_opaque(frame: &[u8], config: &Config) -> Decoded {
    unsupported(Vec::new(), frame, config)
}

fn unsupported(mut layers: Vec<Layer>, rest: &[u8], config: &Config) -> Decoded {
    layers.push(Layer::from(LayerKind::Undefined(Undefined {
        data: rest.to_vec(),
        width: config.undefined_width,
        dots: config.undefined_dots,
    })));
    Decoded {
        layers,
        payload: Vec::new(),
        unsupported: true,
    }
}

fn decode_one(next: Next, data: &[u8]) -> Step<'_> {
    match next {
        Next::Ethernet => {
            let (header, inner) = ethernet::parse(data)?;
            let step = match header {
                EthernetHeader::II(h) => {
                    let next = Next::EtherType {
                        value: h.ethertype,
                        snap: false,
                    };
                    (LayerKind::EthernetII(h), next, inner)
                }
                EthernetHeader::Dot3(h) => {
                    let next = Next::Llc { dsap: h.dsap };
                    (LayerKind::Ethernet8023(h), next, inner)
                }
                EthernetHeader::Snap(h) => {
                    let next = Next::EtherType {
                        value: h.protocol,
                        snap: true,
                    };
                    (LayerKind::EthernetSnap(h), next, inner)
                }
            };
            Ok(Some(step))
        }
        Next::EtherType { value, snap } => by_ethertype(value, snap, data),
        Next::Llc { dsap } => match dsap {
            layout::ethernet::SAP_STP => terminal(Stp::parse(data), LayerKind::Stp),
            layout::ethernet::SAP_IP => ipv4(data),
            _ => Ok(None),
        },
        Next::Ip { protocol, v4 } => match IpNumber(protocol) {
            IpNumber::ICMP if v4 => terminal(Icmp::parse(data), LayerKind::Icmp),
            IpNumber(layout::igmp::IP_PROTOCOL) if v4 => {
                terminal(Igmp::parse(data), LayerKind::Igmp)
            }
            IpNumber::TCP => terminal(Tcp::parse(data), LayerKind::Tcp),
            IpNumber::UDP => terminal(Udp::parse(data), LayerKind::Udp),
            _ => Ok(None),
        },
        Next::Done => Ok(None),
    }
}

fn by_ethertype(value: u16, snap: bool, data: &[u8]) -> Step<'_> {
    match EtherType(value) {
        EtherType::IPV4 => ipv4(data),
        EtherType::IPV6 => {
            let (h, inner) = Ipv6::parse(data)?;
            let next = Next::Ip {
                protocol: h.next_header,
                v4: false,
            };
            Ok(Some((LayerKind::Ipv6(h), next, inner)))
        }
        EtherType::ARP => terminal(Arp::parse(data), LayerKind::Arp),
        EtherType::VLAN_TAGGED_FRAME => {
            let (h, inner) = Dot1q::parse(data)?;
            let next = Next::EtherType {
                value: h.ethertype,
                snap: false,
            };
            Ok(Some((LayerKind::Dot1q(h), next, inner)))
        }
        _ if snap && value == layout::ethernet::SNAP_TYPE_CDP => {
            terminal(Cdp::parse(data), LayerKind::Cdp)
        }
        _ if snap && value == layout::ethernet::SNAP_TYPE_EDP => {
            terminal(Edp::parse(data), LayerKind::Edp)
        }
        _ => Ok(None),
    }
}

fn ipv4(data: &[u8]) -> Step<'_> {
    let (h, inner) = Ipv4::parse(data)?;
    let next = Next::Ip {
        protocol: h.protocol,
        v4: true,
    };
    Ok(Some((LayerKind::Ipv4(h), next, inner)))
}

fn terminal<H>(
    parsed: Result<(H, &[u8]), DecodeError>,
    wrap: fn(H) -> LayerKind,
) -> Step<'_> {
    let (header, inner) = parsed?;
    Ok(Some((wrap(header), Next::Done, inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerId;
    use etherparse::{PacketBuilder, VlanId};

    fn ids(decoded: &Decoded) -> Vec<LayerId> {
        decoded.layers.iter().map(Layer::id).collect()
    }

    #[test]
    fn decodes_udp_over_vlan() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .single_vlan(VlanId::try_new(100).unwrap())
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .udp(1000, 2000);
        let mut frame = Vec::with_capacity(builder.size(3));
        builder.write(&mut frame, &[7, 8, 9]).unwrap();

        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(!decoded.unsupported);
        assert_eq!(
            ids(&decoded),
            [LayerId::EthernetII, LayerId::Dot1q, LayerId::Ipv4, LayerId::Udp]
        );
        assert_eq!(decoded.payload, vec![7, 8, 9]);
    }

    #[test]
    fn unknown_ethertype_degrades_to_undefined() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x88, 0xcc, 1, 2, 3]);
        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(decoded.unsupported);
        assert_eq!(ids(&decoded), [LayerId::EthernetII, LayerId::Undefined]);
        let LayerKind::Undefined(u) = decoded.layers[1].kind() else {
            panic!("expected undefined layer");
        };
        assert_eq!(u.data, vec![1, 2, 3]);
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn stacked_vlan_tags_degrade() {
        let mut frame = vec![0xff; 12];
        frame.extend_from_slice(&[0x81, 0x00, 0x00, 0x0a, 0x81, 0x00, 0x00, 0x14, 0x08, 0x00]);
        frame.extend_from_slice(&[0x45; 20]);

        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(decoded.unsupported);
        assert_eq!(
            ids(&decoded),
            [LayerId::EthernetII, LayerId::Dot1q, LayerId::Undefined]
        );
    }

    #[test]
    fn icmp_over_ipv6_is_not_decoded() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv6([0; 16], [1; 16], 8)
            .icmpv6_echo_request(1, 1);
        let mut frame = Vec::with_capacity(builder.size(0));
        builder.write(&mut frame, &[]).unwrap();

        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(decoded.unsupported);
        assert_eq!(
            ids(&decoded),
            [LayerId::EthernetII, LayerId::Ipv6, LayerId::Undefined]
        );
    }

    #[test]
    fn llc_dispatches_on_dsap() {
        let mut frame = vec![0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];
        frame.extend_from_slice(&[0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e]);
        frame.extend_from_slice(&38u16.to_be_bytes());
        frame.extend_from_slice(&[0x42, 0x42, 0x03]);
        frame.extend_from_slice(&[0u8; 35]);
        frame.extend_from_slice(&[0u8; 8]);

        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(!decoded.unsupported);
        assert_eq!(ids(&decoded), [LayerId::Ethernet8023, LayerId::Stp]);
        assert_eq!(decoded.payload.len(), 8);
    }

    #[test]
    fn truncated_header_keeps_outer_layers() {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .tcp(1, 2, 3, 4);
        let mut frame = Vec::with_capacity(builder.size(0));
        builder.write(&mut frame, &[]).unwrap();
        frame.truncate(14 + 20 + 10);

        let decoded = decode_ethernet(&frame, &Config::default());
        assert!(decoded.unsupported);
        assert_eq!(
            ids(&decoded),
            [LayerId::EthernetII, LayerId::Ipv4, LayerId::Undefined]
        );
    }

    #[test]
    fn opaque_frames_keep_every_byte() {
        let decoded = decode_opaque(&[0x45, 0, 0, 20], &Config::default());
        assert!(decoded.unsupported);
        assert_eq!(ids(&decoded), [LayerId::Undefined]);
    }
}
