//! Columns of the IP and transport headers.

use super::column::{
    ColumnSpec, Columns, HexFormat, check_max, to_array, to_u8, to_u16, to_u32, unknown_column,
};
use super::error::EditError;
use crate::protocols::icmp::Icmp;
use crate::protocols::igmp::Igmp;
use crate::protocols::ipv4::Ipv4;
use crate::protocols::ipv6::Ipv6;
use crate::protocols::tcp::Tcp;
use crate::protocols::udp::Udp;

const IPV4_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("dst", 11, 4, HexFormat::DOTTED),
    ColumnSpec::new("src", 11, 4, HexFormat::DOTTED),
    ColumnSpec::new("tos", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("df", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("ttl", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("proto", 5, 1, HexFormat::PLAIN),
];

const IPV6_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("dst", 39, 16, HexFormat::IPV6),
    ColumnSpec::new("src", 39, 16, HexFormat::IPV6),
    ColumnSpec::new("ttl", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("proto", 5, 1, HexFormat::PLAIN),
];

const ICMP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("type", 4, 1, HexFormat::PLAIN),
    ColumnSpec::new("id", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("seq", 5, 2, HexFormat::PLAIN),
];

const IGMP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("type", 5, 1, HexFormat::PLAIN),
    ColumnSpec::new("maxresp", 7, 1, HexFormat::PLAIN),
    ColumnSpec::new("group", 11, 4, HexFormat::DOTTED),
];

const UDP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("dport", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("sport", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("ulen", 5, 2, HexFormat::PLAIN),
];

const TCP_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("dport", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("sport", 5, 2, HexFormat::PLAIN),
    ColumnSpec::new("seq", 8, 4, HexFormat::PLAIN),
    ColumnSpec::new("ack", 8, 4, HexFormat::PLAIN),
    ColumnSpec::new("win", 5, 2, HexFormat::PLAIN),
];

impl Columns for Ipv4 {
    fn columns(&self) -> &'static [ColumnSpec] {
        IPV4_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "dst" => Some(self.dst.to_vec()),
            "src" => Some(self.src.to_vec()),
            "tos" => Some(vec![self.tos]),
            "df" => Some(vec![u8::from(self.dont_fragment())]),
            "ttl" => Some(vec![self.ttl]),
            "proto" => Some(vec![self.protocol]),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "dst" => self.dst = to_array(column, bytes)?,
            "src" => self.src = to_array(column, bytes)?,
            "tos" => self.tos = to_u8(column, bytes)?,
            "df" => {
                let df = to_u8(column, bytes)?;
                check_max(column, df as u32, 1)?;
                self.set_dont_fragment(df == 1);
            }
            "ttl" => self.ttl = to_u8(column, bytes)?,
            "proto" => self.protocol = to_u8(column, bytes)?,
            _ => return Err(unknown_column("ipv4", column)),
        }
        Ok(())
    }
}

impl Columns for Ipv6 {
    fn columns(&self) -> &'static [ColumnSpec] {
        IPV6_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "dst" => Some(self.dst.to_vec()),
            "src" => Some(self.src.to_vec()),
            "ttl" => Some(vec![self.hop_limit]),
            "proto" => Some(vec![self.next_header]),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "dst" => self.dst = to_array(column, bytes)?,
            "src" => self.src = to_array(column, bytes)?,
            "ttl" => self.hop_limit = to_u8(column, bytes)?,
            "proto" => self.next_header = to_u8(column, bytes)?,
            _ => return Err(unknown_column("ipv6", column)),
        }
        Ok(())
    }
}

impl Columns for Icmp {
    fn columns(&self) -> &'static [ColumnSpec] {
        ICMP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "type" => Some(vec![self.icmp_type]),
            "id" => Some(self.id.to_be_bytes().to_vec()),
            "seq" => Some(self.sequence.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "type" => self.icmp_type = to_u8(column, bytes)?,
            "id" => self.id = to_u16(column, bytes)?,
            "seq" => self.sequence = to_u16(column, bytes)?,
            _ => return Err(unknown_column("icmp", column)),
        }
        Ok(())
    }
}

impl Columns for Igmp {
    fn columns(&self) -> &'static [ColumnSpec] {
        IGMP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "type" => Some(vec![self.igmp_type]),
            "maxresp" => Some(vec![self.max_resp]),
            "group" => Some(self.group.to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "type" => self.igmp_type = to_u8(column, bytes)?,
            "maxresp" => self.max_resp = to_u8(column, bytes)?,
            "group" => self.group = to_array(column, bytes)?,
            _ => return Err(unknown_column("igmp", column)),
        }
        Ok(())
    }
}

impl Columns for Udp {
    fn columns(&self) -> &'static [ColumnSpec] {
        UDP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "dport" => Some(self.dst_port.to_be_bytes().to_vec()),
            "sport" => Some(self.src_port.to_be_bytes().to_vec()),
            "ulen" => Some(self.length.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "dport" => self.dst_port = to_u16(column, bytes)?,
            "sport" => self.src_port = to_u16(column, bytes)?,
            "ulen" => self.length = to_u16(column, bytes)?,
            _ => return Err(unknown_column("udp", column)),
        }
        Ok(())
    }
}

impl Columns for Tcp {
    fn columns(&self) -> &'static [ColumnSpec] {
        TCP_COLUMNS
    }

    fn read(&self, column: &str) -> Option<Vec<u8>> {
        match column {
            "dport" => Some(self.dst_port.to_be_bytes().to_vec()),
            "sport" => Some(self.src_port.to_be_bytes().to_vec()),
            "seq" => Some(self.sequence.to_be_bytes().to_vec()),
            "ack" => Some(self.ack.to_be_bytes().to_vec()),
            "win" => Some(self.window.to_be_bytes().to_vec()),
            _ => None,
        }
    }

    fn write(&mut self, column: &str, bytes: &[u8]) -> Result<(), EditError> {
        match column {
            "dport" => self.dst_port = to_u16(column, bytes)?,
            "sport" => self.src_port = to_u16(column, bytes)?,
            "seq" => self.sequence = to_u32(column, bytes)?,
            "ack" => self.ack = to_u32(column, bytes)?,
            "win" => self.window = to_u16(column, bytes)?,
            _ => return Err(unknown_column("tcp", column)),
        }
        Ok(())
    }
}
