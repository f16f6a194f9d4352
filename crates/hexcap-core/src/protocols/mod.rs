//! Wire-level protocol headers.
//!
//! Each protocol follows the same structure:
//! - `layout`: byte offsets, ranges and protocol numbers (source of truth)
//! - `common::reader`: bounds-checked byte access
//! - one module per header with a typed struct, `parse` and `encapsulate`
//! - `error`: explicit, actionable decode errors
//!
//! `parse` returns the header and the bytes it encloses; `encapsulate` writes
//! the header back around an inner payload. Every field that is not an
//! editable column (checksums, lengths, options, trailers) is kept verbatim,
//! so `encapsulate(parse(bytes))` reproduces the input exactly.
//!
//! Parsers are pure and contain no I/O.

pub mod arp;
pub mod cdp;
pub(crate) mod common;
pub mod dot1q;
pub mod edp;
pub mod error;
pub mod ethernet;
pub mod icmp;
pub mod igmp;
pub mod ipv4;
pub mod ipv6;
pub mod layout;
pub mod stp;
pub mod tcp;
pub mod udp;

pub use error::DecodeError;
