use std::ops::Range;

use crate::protocols::error::DecodeError;

/// Bounds-checked big-endian access to one header.
pub(crate) struct ByteReader<'a> {
    payload: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DecodeError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, DecodeError> {
        let bytes: [u8; 2] = self.read_array(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&self, range: Range<usize>) -> Result<u32, DecodeError> {
        let bytes: [u8; 4] = self.read_array(range)?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| DecodeError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or(DecodeError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    /// Everything from `offset` to the end of the buffer.
    pub fn rest(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        self.payload.get(offset..).ok_or(DecodeError::TooShort {
            needed: offset,
            actual: self.payload.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;
    use crate::protocols::error::DecodeError;

    #[test]
    fn reads_big_endian_fields() {
        let data = [0x08, 0x00, 0xde, 0xad, 0xbe, 0xef];
        let reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16_be(0..2).unwrap(), 0x0800);
        assert_eq!(reader.read_u32_be(2..6).unwrap(), 0xdead_beef);
        assert_eq!(reader.read_array::<2>(4..6).unwrap(), [0xbe, 0xef]);
        assert_eq!(reader.rest(6).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn short_reads_report_needed_length() {
        let data = [0u8; 3];
        let reader = ByteReader::new(&data);
        let err = reader.read_u16_be(2..4).unwrap_err();
        assert!(matches!(err, DecodeError::TooShort { needed: 4, actual: 3 }));
        assert!(reader.require_len(4).is_err());
        assert!(reader.read_u8(3).is_err());
    }
}
