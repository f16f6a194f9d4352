//! hexcap core library: an editable model of captured network packets.
//!
//! A [`Capture`] holds decoded [`Packet`]s. Each packet is a stack of
//! [`Layer`]s, one per recognized header, whose fields are exposed as named
//! hex columns that can be viewed and edited. Edited packets re-encode to
//! wire bytes, optionally multiplied by per-column [`Generator`]s that sweep
//! a field across many copies.
//!
//! Module map:
//! - `hex`: byte and bit string conversions, masked increment.
//! - `protocols`: wire header structs (layout / reader / parse + write).
//! - `layer`: layers, column tables and edits.
//! - `generator`: generators and mask validation.
//! - `packet`: decode dispatch, encode, size bounds, expansion.
//! - `capture`: packet list, clipboard, save.
//! - `source` / `sink`: pcap and pcapng input, pcap output.
//!
//! Invariants:
//! - Untouched fields re-encode byte for byte; lengths and checksums are
//!   never recomputed.
//! - Decoding never fails; unknown content degrades to an opaque layer.
//! - Packet ids are dense and 1-based after every yank and paste.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use hexcap_core::{Capture, Config, LayerId};
//!
//! let mut capture = Capture::open(Path::new("capture.pcap"), Config::default())?;
//! if let Some(packet) = capture.packet_mut(0) {
//!     packet.set_column(LayerId::Ipv4, "ttl", "01")?;
//! }
//! capture.save_as(Path::new("edited.pcap"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod capture;
pub mod generator;
pub mod hex;
pub mod layer;
pub mod packet;
pub mod protocols;
pub mod sink;
pub mod source;

pub use capture::{Capture, CaptureError};
pub use generator::{Generator, GeneratorError, MaskSpec};
pub use hex::HexError;
pub use layer::{EditError, Layer, LayerId, LayerKind};
pub use packet::{Packet, PacketError};
pub use protocols::DecodeError;
pub use source::{FrameSource, PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Presentation and sizing settings shared by every packet of a capture.
///
/// # Examples
/// ```
/// use hexcap_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "pid_width": 3 }"#).unwrap();
/// assert_eq!(config.pid_width, 3);
/// assert_eq!(config.mtu, 1500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digits of the zero-padded packet id.
    pub pid_width: usize,
    /// Default upper frame size; a larger captured frame raises its own
    /// bound to its length.
    pub mtu: usize,
    /// Hex digits shown by the opaque fallback layer.
    pub undefined_width: usize,
    /// Trailing dots replacing the end of a truncated preview.
    pub undefined_dots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pid_width: 5,
            mtu: 1500,
            undefined_width: 20,
            undefined_dots: 2,
        }
    }
}

/// Display form of one packet, as returned by `Packet::out`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketView {
    /// `None` while the packet sits in the clipboard.
    pub pid: Option<usize>,
    pub unsupported: bool,
    pub layers: Vec<LayerView>,
}

/// Display form of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerView {
    pub id: LayerId,
    pub exposed: bool,
    /// Columns in display order.
    pub columns: Vec<ColumnView>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub generators: BTreeMap<String, Generator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub name: String,
    pub value: String,
}

/// One layer kind present somewhere in a capture, with its column layout.
///
/// # Examples
/// ```
/// use hexcap_core::{ColumnLayout, LayerId, SectionLayout};
///
/// let section = SectionLayout {
///     id: LayerId::Udp,
///     read_only: false,
///     exposable: true,
///     exposed: true,
///     columns: vec![ColumnLayout { name: "dport".to_string(), width: 5 }],
/// };
/// assert_eq!(section.id.rank(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: LayerId,
    pub read_only: bool,
    pub exposable: bool,
    pub exposed: bool,
    pub columns: Vec<ColumnLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub name: String,
    pub width: usize,
}

/// JSON document describing a loaded capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub capture_summary: CaptureSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionLayout>>,
    /// Every packet in capture order.
    pub packets: Vec<PacketView>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use hexcap_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "hexcap".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "hexcap");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided by the caller.
    pub path: String,
    pub bytes: u64,
}

/// Packet count and time span of a capture (timestamps may be absent).
///
/// # Examples
/// ```
/// use hexcap_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     packets_total: 10,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.packets_total, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub packets_total: u64,
    /// RFC3339 time of the earliest packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 time of the latest packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Assemble the report for `capture`, read from `input_path`.
pub fn build_report(
    capture: &Capture,
    input_path: &Path,
    input_bytes: u64,
    with_sections: bool,
) -> CaptureReport {
    CaptureReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hexcap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.display().to_string(),
            bytes: input_bytes,
        },
        capture_summary: capture.summary(),
        sections: with_sections.then(|| capture.sections()),
        packets: capture.packets().iter().map(Packet::out).collect(),
    }
}

/// Format capture seconds as RFC3339; `None` when absent or out of range.
///
/// # Examples
/// ```
/// use hexcap_core::ts_to_rfc3339;
///
/// assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
/// assert_eq!(ts_to_rfc3339(None), None);
/// ```
pub fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
