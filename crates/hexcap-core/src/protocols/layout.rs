//! Byte offsets and protocol numbers for every supported header.

use std::ops::Range;

pub mod ethernet {
    use super::Range;

    pub const DST_RANGE: Range<usize> = 0..6;
    pub const SRC_RANGE: Range<usize> = 6..12;
    pub const TYPE_RANGE: Range<usize> = 12..14;
    pub const HEADER_LEN: usize = 14;
    /// Values up to this are an 802.3 length, above it an EtherType.
    pub const MAX_PAYLOAD_LEN: u16 = 1500;

    pub const LLC_DSAP_OFFSET: usize = 0;
    pub const LLC_SSAP_OFFSET: usize = 1;
    pub const LLC_CTL_OFFSET: usize = 2;
    pub const LLC_LEN: usize = 3;
    pub const SNAP_ORG_RANGE: Range<usize> = 3..6;
    pub const SNAP_TYPE_RANGE: Range<usize> = 6..8;
    pub const SNAP_LEN: usize = 8;

    pub const SAP_SNAP: [u8; 2] = [0xaa, 0xab];
    pub const SAP_IP: u8 = 0x06;
    pub const SAP_STP: u8 = 0x42;

    pub const SNAP_TYPE_CDP: u16 = 0x2000;
    pub const SNAP_TYPE_EDP: u16 = 0x00bb;
}

pub mod dot1q {
    use super::Range;

    pub const TCI_RANGE: Range<usize> = 0..2;
    pub const TYPE_RANGE: Range<usize> = 2..4;
    pub const HEADER_LEN: usize = 4;
    pub const PCP_SHIFT: u16 = 13;
    pub const DEI_MASK: u16 = 0x1000;
    pub const VID_MASK: u16 = 0x0fff;
    pub const PCP_MAX: u8 = 7;
}

pub mod stp {
    use super::Range;

    pub const PROTO_ID_RANGE: Range<usize> = 0..2;
    pub const VERSION_OFFSET: usize = 2;
    pub const BPDU_TYPE_OFFSET: usize = 3;
    pub const FLAGS_OFFSET: usize = 4;
    pub const ROOT_ID_RANGE: Range<usize> = 5..13;
    pub const ROOT_PATH_RANGE: Range<usize> = 13..17;
    pub const BRIDGE_ID_RANGE: Range<usize> = 17..25;
    pub const PORT_ID_RANGE: Range<usize> = 25..27;
    pub const AGE_RANGE: Range<usize> = 27..29;
    pub const MAX_AGE_RANGE: Range<usize> = 29..31;
    pub const HELLO_RANGE: Range<usize> = 31..33;
    pub const FWD_DELAY_RANGE: Range<usize> = 33..35;
    pub const HEADER_LEN: usize = 35;
}

pub mod cdp {
    use super::Range;

    pub const VERSION_OFFSET: usize = 0;
    pub const TTL_OFFSET: usize = 1;
    pub const CHECKSUM_RANGE: Range<usize> = 2..4;
    pub const HEADER_LEN: usize = 4;
}

pub mod edp {
    use super::Range;

    pub const VERSION_OFFSET: usize = 0;
    pub const RESERVED_OFFSET: usize = 1;
    pub const LENGTH_RANGE: Range<usize> = 2..4;
    pub const CHECKSUM_RANGE: Range<usize> = 4..6;
    pub const SEQUENCE_RANGE: Range<usize> = 6..8;
    pub const MACHINE_ID_RANGE: Range<usize> = 8..10;
    pub const MAC_RANGE: Range<usize> = 10..16;
    pub const HEADER_LEN: usize = 16;
}

pub mod arp {
    use super::Range;

    pub const HTYPE_RANGE: Range<usize> = 0..2;
    pub const PTYPE_RANGE: Range<usize> = 2..4;
    pub const HLEN_OFFSET: usize = 4;
    pub const PLEN_OFFSET: usize = 5;
    pub const OPER_RANGE: Range<usize> = 6..8;
    pub const SHA_RANGE: Range<usize> = 8..14;
    pub const SPA_RANGE: Range<usize> = 14..18;
    pub const THA_RANGE: Range<usize> = 18..24;
    pub const TPA_RANGE: Range<usize> = 24..28;
    pub const HEADER_LEN: usize = 28;

    pub const HTYPE_ETHERNET: u16 = 1;
    pub const PTYPE_IPV4: u16 = 0x0800;
    pub const HLEN_ETHERNET: u8 = 6;
    pub const PLEN_IPV4: u8 = 4;
}

pub mod ipv4 {
    use super::Range;

    pub const VERSION_IHL_OFFSET: usize = 0;
    pub const TOS_OFFSET: usize = 1;
    pub const TOTAL_LEN_RANGE: Range<usize> = 2..4;
    pub const ID_RANGE: Range<usize> = 4..6;
    pub const FLAGS_FRAGMENT_RANGE: Range<usize> = 6..8;
    pub const TTL_OFFSET: usize = 8;
    pub const PROTOCOL_OFFSET: usize = 9;
    pub const CHECKSUM_RANGE: Range<usize> = 10..12;
    pub const SRC_RANGE: Range<usize> = 12..16;
    pub const DST_RANGE: Range<usize> = 16..20;
    pub const MIN_HEADER_LEN: usize = 20;
    pub const VERSION: u8 = 4;
    pub const DONT_FRAGMENT: u16 = 0x4000;
}

pub mod ipv6 {
    use super::Range;

    pub const VERSION_FLOW_RANGE: Range<usize> = 0..4;
    pub const PAYLOAD_LEN_RANGE: Range<usize> = 4..6;
    pub const NEXT_HEADER_OFFSET: usize = 6;
    pub const HOP_LIMIT_OFFSET: usize = 7;
    pub const SRC_RANGE: Range<usize> = 8..24;
    pub const DST_RANGE: Range<usize> = 24..40;
    pub const HEADER_LEN: usize = 40;
    pub const VERSION: u8 = 6;
}

pub mod icmp {
    use super::Range;

    pub const TYPE_OFFSET: usize = 0;
    pub const CODE_OFFSET: usize = 1;
    pub const CHECKSUM_RANGE: Range<usize> = 2..4;
    pub const ID_RANGE: Range<usize> = 4..6;
    pub const SEQUENCE_RANGE: Range<usize> = 6..8;
    pub const HEADER_LEN: usize = 8;
}

pub mod igmp {
    use super::Range;

    pub const TYPE_OFFSET: usize = 0;
    pub const MAX_RESP_OFFSET: usize = 1;
    pub const CHECKSUM_RANGE: Range<usize> = 2..4;
    pub const GROUP_RANGE: Range<usize> = 4..8;
    pub const HEADER_LEN: usize = 8;
    pub const TYPE_V3_REPORT: u8 = 0x22;
    /// IP protocol number of IGMP.
    pub const IP_PROTOCOL: u8 = 2;
}

pub mod udp {
    use super::Range;

    pub const SRC_PORT_RANGE: Range<usize> = 0..2;
    pub const DST_PORT_RANGE: Range<usize> = 2..4;
    pub const LENGTH_RANGE: Range<usize> = 4..6;
    pub const CHECKSUM_RANGE: Range<usize> = 6..8;
    pub const HEADER_LEN: usize = 8;
}

pub mod tcp {
    use super::Range;

    pub const SRC_PORT_RANGE: Range<usize> = 0..2;
    pub const DST_PORT_RANGE: Range<usize> = 2..4;
    pub const SEQUENCE_RANGE: Range<usize> = 4..8;
    pub const ACK_RANGE: Range<usize> = 8..12;
    pub const OFFSET_FLAGS_RANGE: Range<usize> = 12..14;
    pub const WINDOW_RANGE: Range<usize> = 14..16;
    pub const CHECKSUM_RANGE: Range<usize> = 16..18;
    pub const URGENT_RANGE: Range<usize> = 18..20;
    pub const MIN_HEADER_LEN: usize = 20;
}
