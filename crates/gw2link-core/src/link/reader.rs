use std::ops::Range;

use super::error::DecodeError;
use super::layout::{Encoding, Field};

/// Three `f32` components (x, y, z).
pub type Vec3 = [f32; 3];

/// Bounds-checked little-endian access to one record's bytes.
///
/// Offsets always come from a layout [`Field`]; callers never index the
/// buffer themselves.
pub struct LinkReader<'a> {
    buffer: &'a [u8],
}

impl<'a> LinkReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buffer.len() < needed {
            return Err(DecodeError::TruncatedBuffer {
                needed,
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.buffer
            .get(range.clone())
            .ok_or(DecodeError::TruncatedBuffer {
                needed: range.end,
                actual: self.buffer.len(),
            })
    }

    pub fn read_bytes<const N: usize>(&self, field: &Field) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(field.range())?;
        bytes.try_into().map_err(|_| DecodeError::TruncatedBuffer {
            needed: field.offset + N,
            actual: self.buffer.len(),
        })
    }

    pub fn read_u16_le(&self, field: &Field) -> Result<u16, DecodeError> {
        debug_assert_eq!(field.encoding, Encoding::U16, "{}", field.name);
        Ok(u16::from_le_bytes(self.read_bytes(field)?))
    }

    pub fn read_u32_le(&self, field: &Field) -> Result<u32, DecodeError> {
        debug_assert_eq!(field.encoding, Encoding::U32, "{}", field.name);
        Ok(u32::from_le_bytes(self.read_bytes(field)?))
    }

    pub fn read_u64_le(&self, field: &Field) -> Result<u64, DecodeError> {
        debug_assert_eq!(field.encoding, Encoding::U64, "{}", field.name);
        Ok(u64::from_le_bytes(self.read_bytes(field)?))
    }

    pub fn read_f32_le(&self, field: &Field) -> Result<f32, DecodeError> {
        debug_assert_eq!(field.encoding, Encoding::F32, "{}", field.name);
        Ok(f32::from_le_bytes(self.read_bytes(field)?))
    }

    pub fn read_vec3(&self, field: &Field) -> Result<Vec3, DecodeError> {
        debug_assert_eq!(field.encoding, Encoding::Vec3, "{}", field.name);
        let bytes = self.read_slice(field.range())?;
        let mut out = [0f32; 3];
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(out)
    }

    /// Read a fixed-capacity UTF-16LE string, stopping at the first NUL unit.
    ///
    /// Unpaired surrogates are rejected with `InvalidEncoding`; nothing is
    /// replaced.
    pub fn read_utf16(&self, field: &Field) -> Result<String, DecodeError> {
        debug_assert!(
            matches!(field.encoding, Encoding::Utf16 { .. }),
            "{}",
            field.name
        );
        let bytes = self.read_slice(field.range())?;
        let units = bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .take_while(|unit| *unit != 0);

        let mut out = String::new();
        let mut consumed = 0usize;
        for decoded in char::decode_utf16(units) {
            match decoded {
                Ok(ch) => {
                    consumed += ch.len_utf16();
                    out.push(ch);
                }
                Err(err) => {
                    return Err(DecodeError::InvalidEncoding {
                        field: field.name,
                        offset: field.offset + consumed * 2,
                        unit: err.unpaired_surrogate(),
                    });
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::LinkReader;
    use crate::link::error::DecodeError;
    use crate::link::layout::{Encoding, Field};

    const TEXT: Field = Field::first("text", Encoding::Utf16 { units: 4 });

    fn utf16_bytes(units: &[u16]) -> Vec<u8> {
        units.iter().flat_map(|unit| unit.to_le_bytes()).collect()
    }

    #[test]
    fn utf16_stops_at_first_nul() {
        let bytes = utf16_bytes(&[0x0041, 0x0000, 0x0042, 0x0000]);
        let reader = LinkReader::new(&bytes);
        assert_eq!(reader.read_utf16(&TEXT).unwrap(), "A");
    }

    #[test]
    fn utf16_uses_full_capacity_without_nul() {
        let bytes = utf16_bytes(&[0x0041, 0x0042, 0x0043, 0x0044, 0x0045]);
        let reader = LinkReader::new(&bytes);
        assert_eq!(reader.read_utf16(&TEXT).unwrap(), "ABCD");
    }

    #[test]
    fn utf16_decodes_surrogate_pairs() {
        // U+1F600 as a surrogate pair.
        let bytes = utf16_bytes(&[0xD83D, 0xDE00, 0x0000, 0x0000]);
        let reader = LinkReader::new(&bytes);
        assert_eq!(reader.read_utf16(&TEXT).unwrap(), "\u{1F600}");
    }

    #[test]
    fn utf16_rejects_unpaired_surrogate() {
        let bytes = utf16_bytes(&[0x0041, 0xD800, 0x0042, 0x0000]);
        let reader = LinkReader::new(&bytes);
        let err = reader.read_utf16(&TEXT).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidEncoding {
                field: "text",
                offset: 2,
                unit: 0xD800,
            }
        );
    }

    #[test]
    fn utf16_ignores_garbage_after_nul() {
        let bytes = utf16_bytes(&[0x0041, 0x0000, 0xDC00, 0x0000]);
        let reader = LinkReader::new(&bytes);
        assert_eq!(reader.read_utf16(&TEXT).unwrap(), "A");
    }

    #[test]
    fn read_past_end_is_truncated() {
        let bytes = [0u8; 3];
        let reader = LinkReader::new(&bytes);
        let field = Field::first("value", Encoding::U32);
        let err = reader.read_u32_le(&field).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedBuffer {
                needed: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn vec3_is_little_endian() {
        let mut bytes = Vec::new();
        for value in [1.0f32, -2.5, 100.25] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let reader = LinkReader::new(&bytes);
        let field = Field::first("pos", Encoding::Vec3);
        assert_eq!(reader.read_vec3(&field).unwrap(), [1.0, -2.5, 100.25]);
    }
}
