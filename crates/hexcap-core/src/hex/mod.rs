//! Hex presentation of binary fields.
//!
//! Every editable column is shown as lowercase hex digits, optionally split
//! into delimited groups (`aa:bb:cc:dd:ee:ff`, `c0.a8.00.01`,
//! `2001:0db8:...`). The functions here convert between raw bytes and that
//! presentation, between bit strings and hex strings (used for generator
//! masks), and implement the mask-constrained increment used by generators.

pub mod error;

pub use error::HexError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Convert bytes to lowercase hex, inserting `delim` after every `group`
/// hex digits. An empty delimiter or a group width below 2 yields an
/// undelimited string.
///
/// # Examples
/// ```
/// use hexcap_core::hex::bytes_to_hex;
///
/// assert_eq!(bytes_to_hex(&[0x00, 0x1b, 0x21, 0x3c], ":", 2), "00:1b:21:3c");
/// assert_eq!(bytes_to_hex(&[0x20, 0x01, 0x0d, 0xb8], ":", 4), "2001:0db8");
/// assert_eq!(bytes_to_hex(&[0x08, 0x00], "", 0), "0800");
/// ```
pub fn bytes_to_hex(bytes: &[u8], delim: &str, group: usize) -> String {
    let delimited = !delim.is_empty() && group >= 2;
    let mut out = String::with_capacity(bytes.len() * (2 + delim.len()));
    let mut nibbles = 0usize;
    for byte in bytes {
        if delimited && nibbles > 0 && nibbles % group == 0 {
            out.push_str(delim);
        }
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        nibbles += 2;
    }
    out
}

/// Parse a delimited hex string back into bytes.
///
/// Every group but the last must hold exactly `group` hex digits; the last
/// may be shorter. Each group must have an even number of digits.
///
/// # Errors
/// Returns `HexError` on non-hex characters (uppercase included), odd-length
/// groups or groups that break the declared width.
pub fn hex_to_bytes(text: &str, delim: &str, group: usize) -> Result<Vec<u8>, HexError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let groups: Vec<&str> = if delim.is_empty() {
        vec![text]
    } else {
        text.split(delim).collect()
    };

    let mut out = Vec::with_capacity(text.len() / 2);
    let mut offset = 0usize;
    let last = groups.len().saturating_sub(1);
    for (idx, chunk) in groups.iter().enumerate() {
        if chunk.len() % 2 != 0 {
            return Err(HexError::OddGroup {
                group: chunk.to_string(),
            });
        }
        if !delim.is_empty() && group >= 2 {
            let fits = if idx == last {
                chunk.len() <= group && !chunk.is_empty()
            } else {
                chunk.len() == group
            };
            if !fits {
                return Err(HexError::GroupWidth {
                    group: chunk.to_string(),
                    width: group,
                });
            }
        }
        for pair in chunk.as_bytes().chunks(2) {
            let hi = nibble(pair[0] as char, offset)?;
            let lo = nibble(pair[1] as char, offset + 1)?;
            out.push((hi << 4) | lo);
            offset += 2;
        }
        offset += delim.len();
    }
    Ok(out)
}

/// Convert a string of `0`/`1` characters to hex digits.
///
/// The bit string is left-padded with zeros to a whole number of nibbles,
/// so `"1100"` becomes `"c"` and `"000011110000"` keeps its leading zero
/// digit as `"0f0"`.
pub fn bin_str_to_hex_str(bits: &str) -> Result<String, HexError> {
    let pad = (4 - bits.len() % 4) % 4;
    let mut out = String::with_capacity(bits.len() / 4 + 1);
    let mut acc = 0u8;
    let mut filled = pad;
    for (offset, ch) in bits.chars().enumerate() {
        let bit = match ch {
            '0' => 0,
            '1' => 1,
            _ => return Err(HexError::InvalidBit { ch, offset }),
        };
        acc = (acc << 1) | bit;
        filled += 1;
        if filled == 4 {
            out.push(HEX_DIGITS[acc as usize] as char);
            acc = 0;
            filled = 0;
        }
    }
    Ok(out)
}

/// Expand hex digits to a bit string, four bits per digit.
pub fn hex_str_to_bin_str(hex: &str) -> Result<String, HexError> {
    let mut out = String::with_capacity(hex.len() * 4);
    for (offset, ch) in hex.chars().enumerate() {
        let value = nibble(ch, offset)?;
        for shift in (0..4).rev() {
            out.push(if (value >> shift) & 1 == 1 { '1' } else { '0' });
        }
    }
    Ok(out)
}

/// Add `step` to the big-endian hex number `hex`, touching only the bits
/// left free (zero) in `mask`.
///
/// Frozen bits are forced to 1 before adding (0 before subtracting) so the
/// carry or borrow runs through them; they are restored afterwards. Carries
/// out of the most significant digit are discarded, so a free field wraps
/// inside its own width.
///
/// # Examples
/// ```
/// use hexcap_core::hex::increment_hex_string;
///
/// assert_eq!(increment_hex_string("ff", "00", 1).unwrap(), "00");
/// assert_eq!(increment_hex_string("1f", "f0", 1).unwrap(), "10");
/// assert_eq!(increment_hex_string("c0a80001", "ffffff00", 4).unwrap(), "c0a80005");
/// ```
///
/// # Errors
/// Returns `HexError` when either string holds non-hex characters or their
/// lengths differ.
pub fn increment_hex_string(hex: &str, mask: &str, step: i128) -> Result<String, HexError> {
    let value = parse_nibbles(hex)?;
    let mask = parse_nibbles(mask)?;
    if value.len() != mask.len() {
        return Err(HexError::MaskLength {
            value: value.len(),
            mask: mask.len(),
        });
    }

    let adding = step >= 0;
    let mut acc: Vec<u8> = value
        .iter()
        .zip(&mask)
        .map(|(v, m)| if adding { v | m } else { v & !m & 0x0f })
        .collect();

    let mut magnitude = step.unsigned_abs();
    let mut carry = 0u8;
    for digit in acc.iter_mut().rev() {
        if magnitude == 0 && carry == 0 {
            break;
        }
        let delta = (magnitude & 0x0f) as u8;
        magnitude >>= 4;
        if adding {
            let sum = *digit + delta + carry;
            *digit = sum & 0x0f;
            carry = sum >> 4;
        } else {
            let sub = delta + carry;
            if *digit >= sub {
                *digit -= sub;
                carry = 0;
            } else {
                *digit = *digit + 16 - sub;
                carry = 1;
            }
        }
    }

    Ok(acc
        .iter()
        .zip(value.iter().zip(&mask))
        .map(|(a, (v, m))| {
            let merged = (a & !m & 0x0f) | (v & m);
            HEX_DIGITS[merged as usize] as char
        })
        .collect())
}

fn parse_nibbles(hex: &str) -> Result<Vec<u8>, HexError> {
    hex.chars()
        .enumerate()
        .map(|(offset, ch)| nibble(ch, offset))
        .collect()
}

fn nibble(ch: char, offset: usize) -> Result<u8, HexError> {
    match ch {
        '0'..='9' => Ok(ch as u8 - b'0'),
        'a'..='f' => Ok(ch as u8 - b'a' + 10),
        _ => Err(HexError::InvalidChar { ch, offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_hex_groups_and_never_trails() {
        let mac = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01];
        assert_eq!(bytes_to_hex(&mac, ":", 2), "de:ad:be:ef:00:01");
        assert_eq!(bytes_to_hex(&[10, 0, 0, 1], ".", 2), "0a.00.00.01");
        assert_eq!(bytes_to_hex(&[0xab, 0xcd, 0xef], ":", 4), "abcd:ef");
        assert_eq!(bytes_to_hex(&[], ":", 2), "");
        assert_eq!(hex_to_bytes("", ":", 2).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn bytes_to_hex_is_lowercase() {
        let out = bytes_to_hex(&[0xAB, 0xCD], "", 0);
        assert_eq!(out, "abcd");
        assert!(!out.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn hex_to_bytes_inverts_for_each_format() {
        let bytes: Vec<u8> = (0u8..=255).step_by(7).collect();
        for (delim, group) in [("", 0), (":", 2), (".", 2), (":", 4), ("-", 6)] {
            let text = bytes_to_hex(&bytes, delim, group);
            assert_eq!(hex_to_bytes(&text, delim, group).unwrap(), bytes, "{delim:?}/{group}");
        }
    }

    #[test]
    fn hex_to_bytes_rejects_bad_input() {
        assert!(matches!(
            hex_to_bytes("0a.0.00.01", ".", 2),
            Err(HexError::OddGroup { .. })
        ));
        assert!(matches!(
            hex_to_bytes("zz", "", 0),
            Err(HexError::InvalidChar { ch: 'z', offset: 0 })
        ));
        assert!(matches!(
            hex_to_bytes("AB", "", 0),
            Err(HexError::InvalidChar { ch: 'A', .. })
        ));
        assert!(matches!(
            hex_to_bytes("2001:0d:b800", ":", 4),
            Err(HexError::GroupWidth { .. })
        ));
    }

    #[test]
    fn bin_and_hex_strings_keep_leading_zeros() {
        assert_eq!(bin_str_to_hex_str("1100").unwrap(), "c");
        assert_eq!(bin_str_to_hex_str("000011110000").unwrap(), "0f0");
        assert_eq!(bin_str_to_hex_str("10").unwrap(), "2");
        assert_eq!(hex_str_to_bin_str("0f").unwrap(), "00001111");
        assert!(matches!(
            bin_str_to_hex_str("102"),
            Err(HexError::InvalidBit { ch: '2', offset: 2 })
        ));
    }

    #[test]
    fn increment_wraps_whole_field() {
        assert_eq!(increment_hex_string("ff", "00", 1).unwrap(), "00");
        assert_eq!(increment_hex_string("00ff", "0000", 1).unwrap(), "0100");
    }

    #[test]
    fn increment_stops_at_frozen_nibble() {
        assert_eq!(increment_hex_string("1f", "f0", 1).unwrap(), "10");
        assert_eq!(increment_hex_string("10", "f0", -1).unwrap(), "1f");
        assert_eq!(increment_hex_string("a1f", "f0f", 1).unwrap(), "a2f");
    }

    #[test]
    fn increment_handles_large_and_negative_steps() {
        assert_eq!(increment_hex_string("0000", "0000", 0x1234).unwrap(), "1234");
        assert_eq!(increment_hex_string("0000", "0000", -1).unwrap(), "ffff");
        assert_eq!(increment_hex_string("c0a80001", "ffffff00", 256).unwrap(), "c0a80001");
        let v6 = "20010db8000000000000000000000001";
        let mask = "ffffffffffffffffffffffffffff0000";
        assert_eq!(
            increment_hex_string(v6, mask, 0xfffe).unwrap(),
            "20010db800000000000000000000ffff"
        );
    }

    #[test]
    fn increment_works_at_bit_granularity() {
        // 0xc = 1100: only the two low bits of the digit are free.
        assert_eq!(increment_hex_string("7", "c", 1).unwrap(), "4");
        assert_eq!(increment_hex_string("5", "c", 2).unwrap(), "7");
    }

    #[test]
    fn increment_rejects_mismatched_mask() {
        assert!(matches!(
            increment_hex_string("ff", "f", 1),
            Err(HexError::MaskLength { value: 2, mask: 1 })
        ));
    }
}
