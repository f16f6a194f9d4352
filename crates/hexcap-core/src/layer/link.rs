//! Columns of the link-layer headers.

use super::column::{
    ColumnSpec, Columns, HexFormat, check_max, to_array, to_u8, to_u16, to_u32, unknown_column,
};
use super::error::EditError;
use crate::protocols::arp::Arp;
use crate::protocols::cdp::Cdp;
use crate::protocols::dot1q::Dot1q;
use crate::protocols::edp::Edp;
use crate::protocols::ethernet::{Ethernet8023, EthernetII, EthernetSnap};
use crate::protocols::layout::dot1q::{PCP_MAX, VID_MASK};
use crate::protocols::stp::{Stp, timer_seconds, with_timer_seconds};

const ETH_DST: ColumnSpec = ColumnSpec::new("eth-dst", 17, 6, HexFormat::MAC);
const ETH_SRC: ColumnSpec = ColumnSpec::new("eth-src", 17, 6, HexFormat::MAC);

const ETHERNET_II_COLUMNS: &[ColumnSpec] = &[
    ETH_DST,
    ETH_SRC,
    ColumnSpec::new("etype", 5, 2, HexFormat::PLAIN),
];

const ETHERNET_8023_COLUMNS: &[ColumnSpec] = &[
    ETH_DST,
    ETH_SRC,
    ColumnSpec::new("len", 4, 2, HexFormat::PLAIN),
    ColumnSpec::new("dsap", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("ssap", 4, 1, HexFormat::PLAIN),
];

const ETHERNET_SNAP_COLUMNS: &[ColumnSpec] = &[
    ETH_DST,
    ETH_SRC,
    ColumnSpec::new("dsap", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("ssap", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("pid", 4, 2, HexFormat::PLAIN),
];

const DOT1Q_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("tag", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("1p", 5, 1, HexFormat::PLAIN),
    ColumnSpec::new("etype", 5, 2, HexFormat::PLAIN),
];

const STP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("root", 23, 8, HexFormat::MAC),
    ColumnSpec::new("bridge", 23, 8, HexFormat::MAC),
    ColumnSpec::new("port", 4, 2, HexFormat::PLAIN),
    ColumnSpec::new("cost", 8, 4, HexFormat::PLAIN),
    ColumnSpec::new("age", 3, 1, HexFormat::PLAIN),
    ColumnSpec::new("max", 3, 1, HexFormat::PLAIN),
    ColumnSpec::new("hello", 5, 1, HexFormat::PLAIN),
    ColumnSpec::new("delay", 5, 1, HexFormat::PLAIN),
];

const CDP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("ver", 3, 1, HexFormat::PLAIN),
    ColumnSpec::new("ttl", 3, 1, HexFormat::PLAIN),
];

const EDP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("ver", 3, 1, HexFormat::PLAIN),
    ColumnSpec::new("len", 4, 2, HexFormat::PLAIN),
    ColumnSpec::new("seq", 4, 2, HexFormat::PLAIN),
    ColumnSpec::new("mac", 17, 6, HexFormat::MAC),
];

const ARP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("oper", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("sha", 17, 6, HexFormat::MAC),
    ColumnSpec::new("tha", 17, 6, HexFormat::MAC),
    ColumnSpec::new("spa", 11, 4, HexFormat::DOTTED),
    ColumnSpec::new("tpa", 11, 4, HexFormat::DOTTED),
];

impl Columns for EthernetII {
    fn columns(&self) -> &'static [ColumnSpec] {
        ETHERNET_II_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "eth-dst" => Some(self.dst.to_vec()),
            "eth-src" => Some(self.src.to_vec()),
            "etype" => Some(self.ethertype.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "eth-dst" => self.dst = to_array(column, bytes)?,
            "eth-src" => self.src = to_array(column, bytes)?,
            "etype" => self.ethertype = to_u16(column, bytes)?,
            _ => return Err(unknown_column("ethernet II", column)),
        }
        Ok(())
    }
}

impl Columns for Ethernet8023 {
    fn columns(&self) -> &'static [ColumnSpec] {
        ETHERNET_8023_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "eth-dst" => Some(self.dst.to_vec()),
            "eth-src" => Some(self.src.to_vec()),
            "len" => Some(self.length.to_be_bytes().to_vec()),
            "dsap" => Some(vec![self.dsap]),
            "ssap" => Some(vec![self.ssap]),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "eth-dst" => self.dst = to_array(column, bytes)?,
            "eth-src" => self.src = to_array(column, bytes)?,
            "len" => self.length = to_u16(column, bytes)?,
            "dsap" => self.dsap = to_u8(column, bytes)?,
            "ssap" => self.ssap = to_u8(column, bytes)?,
            _ => return Err(unknown_column("ethernet 802.3", column)),
        }
        Ok(())
    }
}

impl Columns for EthernetSnap {
    fn columns(&self) -> &'static [ColumnSpec] {
        ETHERNET_SNAP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "eth-dst" => Some(self.dst.to_vec()),
            "eth-src" => Some(self.src.to_vec()),
            "dsap" => Some(vec![self.dsap]),
            "ssap" => Some(vec![self.ssap]),
            "pid" => Some(self.protocol.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "eth-dst" => self.dst = to_array(column, bytes)?,
            "eth-src" => self.src = to_array(column, bytes)?,
            "dsap" => self.dsap = to_u8(column, bytes)?,
            "ssap" => self.ssap = to_u8(column, bytes)?,
            "pid" => self.protocol = to_u16(column, bytes)?,
            _ => return Err(unknown_column("ethernet SNAP", column)),
        }
        Ok(())
    }
}

impl Columns for Dot1q {
    fn columns(&self) -> &'static [ColumnSpec] {
        DOT1Q_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "tag" => Some(self.vid.to_be_bytes().to_vec()),
            "1p" => Some(vec![self.priority]),
            "etype" => Some(self.ethertype.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "tag" => {
                let vid = to_u16(column, bytes)?;
                check_max(column, vid as u32, VID_MASK as u32)?;
                self.vid = vid;
            }
            "1p" => {
                let priority = to_u8(column, bytes)?;
                check_max(column, priority as u32, PCP_MAX as u32)?;
                self.priority = priority;
            }
            "etype" => self.ethertype = to_u16(column, bytes)?,
            _ => return Err(unknown_column("802.1q", column)),
        }
        Ok(())
    }
}

impl Columns for Stp {
    fn columns(&self) -> &'static [ColumnSpec] {
        STP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "root" => Some(self.root_id.to_vec()),
            "bridge" => Some(self.bridge_id.to_vec()),
            "port" => Some(self.port_id.to_be_bytes().to_vec()),
            "cost" => Some(self.root_path_cost.to_be_bytes().to_vec()),
            "age" => Some(vec![timer_seconds(self.age)]),
            "max" => Some(vec![timer_seconds(self.max_age)]),
            "hello" => Some(vec![timer_seconds(self.hello)]),
            "delay" => Some(vec![timer_seconds(self.fwd_delay)]),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "root" => self.root_id = to_array(column, bytes)?,
            "bridge" => self.bridge_id = to_array(column, bytes)?,
            "port" => self.port_id = to_u16(column, bytes)?,
            "cost" => self.root_path_cost = to_u32(column, bytes)?,
            "age" => self.age = with_timer_seconds(self.age, to_u8(column, bytes)?),
            "max" => self.max_age = with_timer_seconds(self.max_age, to_u8(column, bytes)?),
            "hello" => self.hello = with_timer_seconds(self.hello, to_u8(column, bytes)?),
            "delay" => {
                self.fwd_delay = with_timer_seconds(self.fwd_delay, to_u8(column, bytes)?)
            }
            _ => return Err(unknown_column("stp", column)),
        }
        Ok(())
    }
}

impl Columns for Cdp {
    fn columns(&self) -> &'static [ColumnSpec] {
        CDP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "ver" => Some(vec![self.version]),
            "ttl" => Some(vec![self.ttl]),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "ver" => self.version = to_u8(column, bytes)?,
            "ttl" => self.ttl = to_u8(column, bytes)?,
            _ => return Err(unknown_column("cdp", column)),
        }
        Ok(())
    }
}

impl Columns for Edp {
    fn columns(&self) -> &'static [ColumnSpec] {
        EDP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "ver" => Some(vec![self.version]),
            "len" => Some(self.length.to_be_bytes().to_vec()),
            "seq" => Some(self.sequence.to_be_bytes().to_vec()),
            "mac" => Some(self.mac.to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "ver" => self.version = to_u8(column, bytes)?,
            "len" => self.length = to_u16(column, bytes)?,
            "seq" => self.sequence = to_u16(column, bytes)?,
            "mac" => self.mac = to_array(column, bytes)?,
            _ => return Err(unknown_column("edp", column)),
        }
        Ok(())
    }
}

impl Columns for Arp {
    fn columns(&self) -> &'static [ColumnSpec] {
        ARP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "oper" => Some(self.operation.to_be_bytes().to_vec()),
            "sha" => Some(self.sha.to_vec()),
            "tha" => Some(self.tha.to_vec()),
            "spa" => Some(self.spa.to_vec()),
            "tpa" => Some(self.tpa.to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "oper" => self.operation = to_u16(column, bytes)?,
            "sha" => self.sha = to_array(column, bytes)?,
            "tha" => self.tha = to_array(column, bytes)?,
            "spa" => self.spa = to_array(column, bytes)?,
            "tpa" => self.tpa = to_array(column, bytes)?,
            _ => return Err(unknown_column("iparp", column)),
        }
        Ok(())
    }
}
