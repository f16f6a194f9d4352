mod common;

use std::fs;

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use hexcap_core::sink::PcapWriter;
use hexcap_core::{
    Capture, CaptureError, Config, LayerId, MaskSpec, PacketError, PacketEvent, PacketSource,
    PcapFileSource, SourceError, build_report,
};
use pcap_parser::Linktype;

use common::{arp_frame, pcapng_bytes, tcp_frame, temp_path, udp_frame};

fn frames() -> Vec<(f64, Vec<u8>)> {
    vec![
        (1.0, udp_frame(5000, 6454, b"payload")),
        (2.0, tcp_frame(b"")),
        (3.0, arp_frame()),
    ]
}

#[test]
fn untouched_capture_saves_identical_frames() {
    let path = temp_path("roundtrip", "pcap");
    let mut capture = Capture::from_frames(frames(), Config::default()).unwrap();
    assert!(capture.packets().iter().all(|p| !p.is_unsupported()));
    capture.save_as(&path).unwrap();

    let reloaded = Capture::open(&path, Config::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(reloaded.len(), 3);
    for (packet, (ts, frame)) in reloaded.packets().iter().zip(frames()) {
        assert_eq!(packet.data().unwrap(), frame);
        assert!((packet.timestamp() - ts).abs() < 1e-6);
    }
}

#[test]
fn edits_survive_save_and_reload() {
    let path = temp_path("edited", "pcap");
    let mut capture = Capture::from_frames(frames(), Config::default()).unwrap();
    let udp = capture.packet_mut(0).unwrap();
    udp.set_column(LayerId::Ipv4, "ttl", "01").unwrap();
    udp.set_column(LayerId::EthernetII, "eth-dst", "01:00:5e:00:00:01").unwrap();
    let tcp = capture.packet_mut(1).unwrap();
    tcp.set_column(LayerId::Tcp, "dport", "1f90").unwrap();
    capture.save_as(&path).unwrap();

    let reloaded = Capture::open(&path, Config::default()).unwrap();
    let _ = fs::remove_file(&path);

    let data = reloaded.packets()[0].data().unwrap();
    let sliced = SlicedPacket::from_ethernet(&data).unwrap();
    let Some(NetSlice::Ipv4(ipv4)) = sliced.net else {
        panic!("expected ipv4");
    };
    assert_eq!(ipv4.header().ttl(), 1);
    assert_eq!(&data[..6], &[0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]);

    let data = reloaded.packets()[1].data().unwrap();
    let sliced = SlicedPacket::from_ethernet(&data).unwrap();
    let Some(TransportSlice::Tcp(tcp)) = sliced.transport else {
        panic!("expected tcp");
    };
    assert_eq!(tcp.destination_port(), 8080);
    assert!(tcp.syn());
}

#[test]
fn generators_expand_on_save() {
    let path = temp_path("generated", "pcap");
    let mut capture =
        Capture::from_frames(vec![(7.0, udp_frame(5000, 6454, b""))], Config::default()).unwrap();
    let packet = capture.packet_mut(0).unwrap();
    packet.add_generator(LayerId::Ipv4, "dst", 255, 1).unwrap();
    packet
        .add_mask(LayerId::Ipv4, "dst", &MaskSpec::Hex("ffffff00".into()))
        .unwrap();
    packet.add_generator(LayerId::Udp, "sport", 3, -1).unwrap();
    capture.save_as(&path).unwrap();

    let reloaded = Capture::open(&path, Config::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(reloaded.len(), 255);
    let pids: Vec<_> = reloaded.packets().iter().map(|p| p.pid()).collect();
    assert_eq!(pids.first(), Some(&Some(1)));
    assert_eq!(pids.last(), Some(&Some(255)));
    for (i, packet) in reloaded.packets().iter().enumerate() {
        assert!(!packet.has_layer(LayerId::Generator));
        assert_eq!(
            packet.layer(LayerId::Ipv4).and_then(|l| l.column("dst")),
            Some(format!("c0.a8.01.{:02x}", (20 + i) % 256))
        );
        let sport = 5000 - (i % 3) as u16;
        assert_eq!(
            packet.layer(LayerId::Udp).and_then(|l| l.column("sport")),
            Some(format!("{sport:04x}"))
        );
        assert!((packet.timestamp() - 7.0).abs() < 1e-6);
    }
}

#[test]
fn oversized_packet_aborts_save_without_writing() {
    let path = temp_path("too_large", "pcap");
    let mut capture = Capture::from_frames(frames(), Config::default()).unwrap();
    capture.packet_mut(2).unwrap().set_max_size(20);
    assert!(!capture.is_writable());

    let err = capture.save_as(&path).unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Packet(PacketError::PacketTooLarge { max: 20, .. })
    ));
    assert!(!path.exists());
    assert!(capture.path().is_none());
}

#[test]
fn save_as_never_creates_directories() {
    let dir = temp_path("no_such_dir", "d");
    let mut capture = Capture::from_frames(frames(), Config::default()).unwrap();
    let err = capture.save_as(&dir.join("out.pcap")).unwrap_err();
    assert!(matches!(err, CaptureError::MissingDirectory { .. }));
    assert!(!dir.exists());
}

#[test]
fn min_size_pads_saved_frames() {
    let path = temp_path("padded", "pcap");
    let mut capture = Capture::from_frames(frames(), Config::default()).unwrap();
    capture.set_pkt_size_range(64, 1500).unwrap();
    capture.save_as(&path).unwrap();
    capture.save().unwrap();

    let reloaded = Capture::open(&path, Config::default()).unwrap();
    let _ = fs::remove_file(&path);

    let original = frames();
    for (packet, (_, frame)) in reloaded.packets().iter().zip(&original) {
        let data = packet.data().unwrap();
        assert_eq!(data.len(), frame.len().max(64));
        assert_eq!(&data[..frame.len()], frame.as_slice());
    }
}

#[test]
fn unknown_protocols_load_as_opaque_packets() {
    let mut lldp = vec![0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e, 2, 2, 2, 2, 2, 2, 0x88, 0xcc];
    lldp.extend_from_slice(&[0x02, 0x07, 0x04, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    let mut capture = Capture::from_frames(
        vec![(1.0, lldp.clone()), (2.0, udp_frame(1, 2, b"ok"))],
        Config::default(),
    )
    .unwrap();

    let packet = &capture.packets()[0];
    assert!(packet.is_unsupported());
    assert_eq!(packet.pid(), Some(1));
    assert_eq!(packet.data().unwrap(), lldp);
    let view = packet.out();
    assert_eq!(view.layers.len(), 2);
    assert_eq!(view.layers[1].columns[0].value, "1.00");

    assert!(!capture.packets()[1].is_unsupported());
    let before = capture.packets()[0].clone();
    let opaque = capture.packet_mut(0).unwrap();
    assert!(opaque.set_column(LayerId::EthernetII, "etype", "0800").is_err());
    assert_eq!(capture.packets()[0], before);
}

#[test]
fn non_ethernet_records_are_kept_whole() {
    let path = temp_path("raw", "pcapng");
    let ip_only = udp_frame(1, 2, b"raw")[14..].to_vec();
    fs::write(&path, pcapng_bytes(101, &[(0, ip_only.clone())])).unwrap();

    let capture = Capture::open(&path, Config::default()).unwrap();
    let _ = fs::remove_file(&path);

    let packet = &capture.packets()[0];
    assert!(packet.is_unsupported());
    assert_eq!(packet.data().unwrap(), ip_only);
}

#[test]
fn raw_linktype_survives_save_and_reload() {
    let input = temp_path("raw_in", "pcap");
    let output = temp_path("raw_out", "pcap");
    let ip_only = udp_frame(7, 8, b"raw")[14..].to_vec();
    let mut writer = PcapWriter::with_linktype(Vec::new(), Linktype::RAW).unwrap();
    writer.write_packet(5.0, &ip_only).unwrap();
    fs::write(&input, writer.into_inner()).unwrap();

    let mut capture = Capture::open(&input, Config::default()).unwrap();
    assert_eq!(capture.linktype().unwrap(), Linktype::RAW);
    capture.save_as(&output).unwrap();

    let mut source = PcapFileSource::open(&output).unwrap();
    let event = source.next_packet().unwrap().expect("one record");
    let end = source.next_packet().unwrap();
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);

    assert_eq!(event.linktype, Linktype::RAW);
    assert_eq!(event.data, ip_only);
    assert!(end.is_none());
}

/// Replays frames tagged with their own link types.
struct TaggedFrames(Vec<(Linktype, Vec<u8>)>);

impl PacketSource for TaggedFrames {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        if self.0.is_empty() {
            return Ok(None);
        }
        let (linktype, data) = self.0.remove(0);
        Ok(Some(PacketEvent {
            ts: Some(1.0),
            linktype,
            data,
        }))
    }
}

#[test]
fn mixed_linktypes_refuse_to_save() {
    let path = temp_path("mixed", "pcap");
    let frame = udp_frame(1, 2, b"x");
    let source = TaggedFrames(vec![
        (Linktype::ETHERNET, frame.clone()),
        (Linktype::RAW, frame[14..].to_vec()),
    ]);
    let mut capture = Capture::read(source, Config::default()).unwrap();

    let err = capture.save_as(&path).unwrap_err();
    assert!(matches!(
        err,
        CaptureError::MixedLinktypes {
            first: 1,
            other: 101
        }
    ));
    assert!(!path.exists());

    capture.yank(1, 1).unwrap();
    assert_eq!(capture.linktype().unwrap(), Linktype::ETHERNET);
}

#[test]
fn report_lists_every_packet() {
    let capture = Capture::from_frames(frames(), Config::default()).unwrap();
    let report = build_report(&capture, std::path::Path::new("in.pcap"), 100, true);
    assert_eq!(report.packets.len(), 3);
    assert_eq!(report.capture_summary.packets_total, 3);
    assert_eq!(
        report.capture_summary.time_end.as_deref(),
        Some("1970-01-01T00:00:03Z")
    );
    let sections = report.sections.expect("sections");
    let ids: Vec<_> = sections.iter().map(|s| s.id).collect();
    assert_eq!(
        ids,
        [
            LayerId::Pid,
            LayerId::TStamp,
            LayerId::EthernetII,
            LayerId::Arp,
            LayerId::Ipv4,
            LayerId::Ipv6,
            LayerId::Udp,
            LayerId::Tcp
        ]
    );
}
