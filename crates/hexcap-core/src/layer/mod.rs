//! Layers: one decoded header of a packet, seen as named columns.
//!
//! A [`Layer`] wraps a [`LayerKind`] (the closed set of supported headers
//! plus the bookkeeping layers) with its view state and the generators
//! attached to its columns. Layers are ordered inside a packet by the fixed
//! rank of their [`LayerId`].

pub mod column;
pub mod error;
mod inet;
mod link;
pub mod special;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generator::{self, Generator, GeneratorError, MaskSpec};
use crate::hex::{self, HexError};
use crate::protocols::arp::Arp;
use crate::protocols::cdp::Cdp;
use crate::protocols::dot1q::Dot1q;
use crate::protocols::edp::Edp;
use crate::protocols::ethernet::{Ethernet8023, EthernetII, EthernetSnap};
use crate::protocols::icmp::Icmp;
use crate::protocols::igmp::Igmp;
use crate::protocols::ipv4::Ipv4;
use crate::protocols::ipv6::Ipv6;
use crate::protocols::stp::Stp;
use crate::protocols::tcp::Tcp;
use crate::protocols::udp::Udp;
use crate::{ColumnView, LayerView};

pub use column::{ColumnSpec, Columns, HexFormat};
pub use error::EditError;
pub use special::{PktId, TStamp, Undefined};

/// Protocol tag of a layer, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerId {
    #[serde(rename = "pid")]
    Pid,
    #[serde(rename = "g")]
    Generator,
    #[serde(rename = "tstamp")]
    TStamp,
    #[serde(rename = "ethernet II")]
    EthernetII,
    #[serde(rename = "ethernet 802.3")]
    Ethernet8023,
    #[serde(rename = "ethernet SNAP")]
    EthernetSnap,
    #[serde(rename = "802.1q")]
    Dot1q,
    #[serde(rename = "stp")]
    Stp,
    #[serde(rename = "cdp")]
    Cdp,
    #[serde(rename = "edp")]
    Edp,
    #[serde(rename = "iparp")]
    Arp,
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "icmp")]
    Icmp,
    #[serde(rename = "igmp")]
    Igmp,
    #[serde(rename = "udp")]
    Udp,
    #[serde(rename = "tcp")]
    Tcp,
    #[serde(rename = "Undefined")]
    Undefined,
}

impl LayerId {
    pub const ALL: [LayerId; 18] = [
        LayerId::Pid,
        LayerId::Generator,
        LayerId::TStamp,
        LayerId::EthernetII,
        LayerId::Ethernet8023,
        LayerId::EthernetSnap,
        LayerId::Dot1q,
        LayerId::Stp,
        LayerId::Cdp,
        LayerId::Edp,
        LayerId::Arp,
        LayerId::Ipv4,
        LayerId::Ipv6,
        LayerId::Icmp,
        LayerId::Igmp,
        LayerId::Udp,
        LayerId::Tcp,
        LayerId::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::Pid => "pid",
            LayerId::Generator => "g",
            LayerId::TStamp => "tstamp",
            LayerId::EthernetII => "ethernet II",
            LayerId::Ethernet8023 => "ethernet 802.3",
            LayerId::EthernetSnap => "ethernet SNAP",
            LayerId::Dot1q => "802.1q",
            LayerId::Stp => "stp",
            LayerId::Cdp => "cdp",
            LayerId::Edp => "edp",
            LayerId::Arp => "iparp",
            LayerId::Ipv4 => "ipv4",
            LayerId::Ipv6 => "ipv6",
            LayerId::Icmp => "icmp",
            LayerId::Igmp => "igmp",
            LayerId::Udp => "udp",
            LayerId::Tcp => "tcp",
            LayerId::Undefined => "Undefined",
        }
    }

    /// Position in the layer stack; protocol layers of one packet always
    /// appear in strictly increasing rank.
    pub fn rank(self) -> u8 {
        match self {
            LayerId::Pid => 0,
            LayerId::Generator => 2,
            LayerId::TStamp => 5,
            LayerId::EthernetII | LayerId::Ethernet8023 | LayerId::EthernetSnap => 10,
            LayerId::Dot1q => 20,
            LayerId::Stp | LayerId::Cdp | LayerId::Edp => 30,
            LayerId::Arp => 35,
            LayerId::Ipv4 | LayerId::Ipv6 => 40,
            LayerId::Icmp | LayerId::Igmp | LayerId::Udp | LayerId::Tcp => 50,
            LayerId::Undefined => 99,
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerId {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| EditError::UnknownLayer {
                layer: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    PktId(PktId),
    Generator,
    TStamp(TStamp),
    EthernetII(EthernetII),
    Ethernet8023(Ethernet8023),
    EthernetSnap(EthernetSnap),
    Dot1q(Dot1q),
    Stp(Stp),
    Cdp(Cdp),
    Edp(Edp),
    Arp(Arp),
    Ipv4(Ipv4),
    Ipv6(Ipv6),
    Icmp(Icmp),
    Igmp(Igmp),
    Udp(Udp),
    Tcp(Tcp),
    Undefined(Undefined),
}

impl LayerKind {
    pub fn id(&self) -> LayerId {
        match self {
            LayerKind::PktId(_) => LayerId::Pid,
            LayerKind::Generator => LayerId::Generator,
            LayerKind::TStamp(_) => LayerId::TStamp,
            LayerKind::EthernetII(_) => LayerId::EthernetII,
            LayerKind::Ethernet8023(_) => LayerId::Ethernet8023,
            LayerKind::EthernetSnap(_) => LayerId::EthernetSnap,
            LayerKind::Dot1q(_) => LayerId::Dot1q,
            LayerKind::Stp(_) => LayerId::Stp,
            LayerKind::Cdp(_) => LayerId::Cdp,
            LayerKind::Edp(_) => LayerId::Edp,
            LayerKind::Arp(_) => LayerId::Arp,
            LayerKind::Ipv4(_) => LayerId::Ipv4,
            LayerKind::Ipv6(_) => LayerId::Ipv6,
            LayerKind::Icmp(_) => LayerId::Icmp,
            LayerKind::Igmp(_) => LayerId::Igmp,
            LayerKind::Udp(_) => LayerId::Udp,
            LayerKind::Tcp(_) => LayerId::Tcp,
            LayerKind::Undefined(_) => LayerId::Undefined,
        }
    }

    fn header(&self) -> Option<&dyn Columns> {
        match self {
            LayerKind::EthernetII(h) => Some(h),
            LayerKind::Ethernet8023(h) => Some(h),
            LayerKind::EthernetSnap(h) => Some(h),
            LayerKind::Dot1q(h) => Some(h),
            LayerKind::Stp(h) => Some(h),
            LayerKind::Cdp(h) => Some(h),
            LayerKind::Edp(h) => Some(h),
            LayerKind::Arp(h) => Some(h),
            LayerKind::Ipv4(h) => Some(h),
            LayerKind::Ipv6(h) => Some(h),
            LayerKind::Icmp(h) => Some(h),
            LayerKind::Igmp(h) => Some(h),
            LayerKind::Udp(h) => Some(h),
            LayerKind::Tcp(h) => Some(h),
            LayerKind::PktId(_)
            | LayerKind::Generator
            | LayerKind::TStamp(_)
            | LayerKind::Undefined(_) => None,
        }
    }

    fn header_mut(&mut self) -> Option<&mut dyn Columns> {
        match self {
            LayerKind::EthernetII(h) => Some(h),
            LayerKind::Ethernet8023(h) => Some(h),
            LayerKind::EthernetSnap(h) => Some(h),
            LayerKind::Dot1q(h) => Some(h),
            LayerKind::Stp(h) => Some(h),
            LayerKind::Cdp(h) => Some(h),
            LayerKind::Edp(h) => Some(h),
            LayerKind::Arp(h) => Some(h),
            LayerKind::Ipv4(h) => Some(h),
            LayerKind::Ipv6(h) => Some(h),
            LayerKind::Icmp(h) => Some(h),
            LayerKind::Igmp(h) => Some(h),
            LayerKind::Udp(h) => Some(h),
            LayerKind::Tcp(h) => Some(h),
            LayerKind::PktId(_)
            | LayerKind::Generator
            | LayerKind::TStamp(_)
            | LayerKind::Undefined(_) => None,
        }
    }

    /// Wire bytes of this layer wrapped around `payload`, or `None` for the
    /// bookkeeping layers that have no wire form.
    pub fn encapsulate(&self, payload: &[u8]) -> Option<Vec<u8>> {
        let bytes = match self {
            LayerKind::PktId(_) | LayerKind::Generator | LayerKind::TStamp(_) => return None,
            LayerKind::EthernetII(h) => h.encapsulate(payload),
            LayerKind::Ethernet8023(h) => h.encapsulate(payload),
            LayerKind::EthernetSnap(h) => h.encapsulate(payload),
            LayerKind::Dot1q(h) => h.encapsulate(payload),
            LayerKind::Stp(h) => h.encapsulate(payload),
            LayerKind::Cdp(h) => h.encapsulate(payload),
            LayerKind::Edp(h) => h.encapsulate(payload),
            LayerKind::Arp(h) => h.encapsulate(payload),
            LayerKind::Ipv4(h) => h.encapsulate(payload),
            LayerKind::Ipv6(h) => h.encapsulate(payload),
            LayerKind::Icmp(h) => h.encapsulate(payload),
            LayerKind::Igmp(h) => h.encapsulate(payload),
            LayerKind::Udp(h) => h.encapsulate(payload),
            LayerKind::Tcp(h) => h.encapsulate(payload),
            LayerKind::Undefined(u) => [u.data.as_slice(), payload].concat(),
        };
        Some(bytes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    kind: LayerKind,
    exposed: bool,
    generators: BTreeMap<&'static str, Generator>,
}

impl From<LayerKind> for Layer {
    fn from(kind: LayerKind) -> Self {
        Self {
            kind,
            exposed: true,
            generators: BTreeMap::new(),
        }
    }
}

impl Layer {
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut LayerKind {
        &mut self.kind
    }

    pub fn id(&self) -> LayerId {
        self.kind.id()
    }

    pub fn rank(&self) -> u8 {
        self.id().rank()
    }

    /// Bookkeeping layers and the opaque fallback cannot be edited.
    pub fn is_read_only(&self) -> bool {
        self.kind.header().is_none()
    }

    pub fn is_exposable(&self) -> bool {
        !matches!(self.kind, LayerKind::PktId(_))
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    /// Flip between the expanded and collapsed view. Returns the new state;
    /// layers that are not exposable stay exposed.
    pub fn toggle_expose(&mut self) -> bool {
        if self.is_exposable() {
            self.exposed = !self.exposed;
        }
        self.exposed
    }

    /// Ordered `(column, display width)` pairs.
    pub fn columns(&self) -> Vec<(&'static str, usize)> {
        match &self.kind {
            LayerKind::PktId(id) => vec![("pid", id.width)],
            LayerKind::Generator => vec![("g", 3)],
            LayerKind::TStamp(_) => vec![("tstamp", 13)],
            LayerKind::Undefined(u) => vec![("undefined", u.width)],
            kind => kind
                .header()
                .map(|h| h.columns().iter().map(|c| (c.name, c.width)).collect())
                .unwrap_or_default(),
        }
    }

    /// Display text of one column.
    pub fn column(&self, name: &str) -> Option<String> {
        match &self.kind {
            LayerKind::PktId(id) if name == "pid" => Some(id.display()),
            LayerKind::Generator if name == "g" => Some(" * ".to_string()),
            LayerKind::TStamp(ts) if name == "tstamp" => Some(ts.display()),
            LayerKind::Undefined(u) if name == "undefined" => Some(u.preview()),
            kind => {
                let header = kind.header()?;
                let spec = header.spec(name)?;
                let bytes = header.read(name)?;
                Some(hex::bytes_to_hex(&bytes, spec.format.delim, spec.format.group))
            }
        }
    }

    /// Undelimited hex of a column, the form generators operate on.
    pub fn column_hex(&self, name: &str) -> Option<String> {
        self.kind
            .header()
            .and_then(|h| h.read(name))
            .map(|bytes| hex::bytes_to_hex(&bytes, "", 0))
    }

    /// Parse `text` in the column's display format and store it.
    ///
    /// # Errors
    /// Rejects read-only layers, unknown columns, malformed hex, a wrong
    /// byte count and values outside the field's range. The layer is left
    /// unchanged on error.
    pub fn set_column(&mut self, name: &str, text: &str) -> Result<(), EditError> {
        let spec = self.editable_spec(name)?;
        let bytes =
            hex::hex_to_bytes(text, spec.format.delim, spec.format.group).map_err(|source| {
                EditError::Format {
                    column: name.to_string(),
                    source,
                }
            })?;
        self.write_column(spec, &bytes)
    }

    fn editable_spec(&self, name: &str) -> Result<&'static ColumnSpec, EditError> {
        let Some(header) = self.kind.header() else {
            return Err(EditError::ReadOnly {
                layer: self.id().to_string(),
            });
        };
        header.spec(name).ok_or_else(|| EditError::UnknownColumn {
            layer: self.id().to_string(),
            column: name.to_string(),
        })
    }

    fn write_column(&mut self, spec: &ColumnSpec, bytes: &[u8]) -> Result<(), EditError> {
        if bytes.len() != spec.len {
            return Err(EditError::Length {
                column: spec.name.to_string(),
                expected: spec.len,
                actual: bytes.len(),
            });
        }
        let id = self.id();
        let header = self
            .kind
            .header_mut()
            .ok_or_else(|| EditError::ReadOnly {
                layer: id.to_string(),
            })?;
        header.write(spec.name, bytes)
    }

    /// Attach or update the generator of `column`. A new generator leaves
    /// every bit of the column free.
    pub fn add_generator(
        &mut self,
        column: &str,
        count: u32,
        step: i64,
    ) -> Result<(), GeneratorError> {
        let spec = self.editable_spec(column)?;
        self.generators
            .entry(spec.name)
            .and_modify(|generator| {
                generator.count = count;
                generator.step = step;
            })
            .or_insert_with(|| Generator::new(count, step, spec.len));
        Ok(())
    }

    /// Validate and store a mask for `column`, keeping any count and step
    /// already set.
    pub fn add_mask(&mut self, column: &str, mask: &MaskSpec) -> Result<(), GeneratorError> {
        let spec = self.editable_spec(column)?;
        let mask = generator::normalize_mask(mask, spec.bits())?;
        self.generators
            .entry(spec.name)
            .or_insert_with(|| Generator::new(1, 0, spec.len))
            .mask = mask;
        Ok(())
    }

    /// Remove the generator of `column`; returns whether one was present.
    pub fn clear_generator(&mut self, column: &str) -> bool {
        self.generators.remove(column).is_some()
    }

    pub fn generators(&self) -> &BTreeMap<&'static str, Generator> {
        &self.generators
    }

    pub fn has_generators(&self) -> bool {
        !self.generators.is_empty()
    }

    /// Replace every generator column with its value for physical copy
    /// `index` and drop the generators. A generated value the column's range
    /// rule rejects leaves the template value in place.
    pub(crate) fn apply_generators(&mut self, index: u64) -> Result<(), HexError> {
        let generators = std::mem::take(&mut self.generators);
        for (column, generator) in &generators {
            let Some(template) = self.column_hex(column) else {
                continue;
            };
            let value = generator.value_at(&template, index)?;
            let bytes = hex::hex_to_bytes(&value, "", 0)?;
            let Ok(spec) = self.editable_spec(column) else {
                continue;
            };
            if let Err(err) = self.write_column(spec, &bytes) {
                warn!(
                    layer = %self.id(),
                    column = *column,
                    index,
                    error = %err,
                    "generated value rejected; keeping template value"
                );
            }
        }
        Ok(())
    }

    pub fn out(&self) -> LayerView {
        let columns = self
            .columns()
            .into_iter()
            .map(|(name, _)| ColumnView {
                name: name.to_string(),
                value: self.column(name).unwrap_or_default(),
            })
            .collect();
        LayerView {
            id: self.id(),
            exposed: self.exposed,
            columns,
            generators: self
                .generators
                .iter()
                .map(|(column, generator)| (column.to_string(), generator.clone()))
                .collect(),
        }
    }
}
