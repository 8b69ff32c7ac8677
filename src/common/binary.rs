//! Binary data parsing utilities shared by the record and field decoders.
//!
//! All HWP 5.x integers are little-endian. Strings are UTF-16LE, either
//! length-prefixed (`BSTR`) or single code units (`WCHAR`). Control ids
//! (`CHID`) are four ASCII bytes stored in reverse order.

use std::borrow::Cow;

use encoding_rs::UTF_16LE;
use zerocopy::{FromBytes, I16, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn check(data: &[u8], offset: usize, width: usize) -> BinaryResult<()> {
    if offset + width > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + width,
            available: data.len(),
        });
    }
    Ok(())
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use hwpmodel::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    check(data, offset, 2)?;
    U16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a little-endian i16 from a byte slice at the given offset.
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> BinaryResult<i16> {
    check(data, offset, 2)?;
    I16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i16".to_string()))
}

/// Read a little-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use hwpmodel::common::binary::read_u32_le;
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    check(data, offset, 4)?;
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u32".to_string()))
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    check(data, offset, 4)?;
    I32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i32".to_string()))
}

/// Decode UTF-16LE bytes, replacing malformed sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use hwpmodel::common::binary::decode_utf16le;
/// assert_eq!(decode_utf16le(b"j\0p\0g\0"), "jpg");
/// ```
pub fn decode_utf16le(data: &[u8]) -> Cow<'_, str> {
    let (text, _) = UTF_16LE.decode_without_bom_handling(data);
    text
}

/// Decode a control id. The four bytes are stored last character first.
///
/// ```
/// use hwpmodel::common::binary::decode_chid;
/// assert_eq!(decode_chid(b" lbt"), "tbl ");
/// ```
pub fn decode_chid(data: &[u8]) -> String {
    data.iter().rev().map(|&b| b as char).collect()
}

/// Forward-only reader over a record payload.
///
/// Every read either consumes exactly the bytes of the value or fails
/// without moving the position, so no read ever crosses the payload end.
#[derive(Debug, Clone)]
pub struct ByteCursor<'data> {
    data: &'data [u8],
    pos: usize,
}

impl<'data> ByteCursor<'data> {
    #[inline]
    pub fn new(data: &'data [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move back to an earlier position.
    #[inline]
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.data.len());
        self.pos = pos.min(self.data.len());
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the payload.
    #[inline]
    pub fn rest(&self) -> &'data [u8] {
        &self.data[self.pos..]
    }

    pub fn read_bytes(&mut self, len: usize) -> BinaryResult<&'data [u8]> {
        check(self.data, self.pos, len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> BinaryResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> BinaryResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> BinaryResult<u16> {
        let v = read_u16_le(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_i16(&mut self) -> BinaryResult<i16> {
        let v = read_i16_le(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> BinaryResult<u32> {
        let v = read_u32_le(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> BinaryResult<i32> {
        let v = read_i32_le(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    /// Read a single UTF-16 code unit as a string.
    pub fn read_wchar(&mut self) -> BinaryResult<String> {
        let bytes = self.read_bytes(2)?;
        Ok(decode_utf16le(bytes).into_owned())
    }

    /// Read a `BSTR`: u16 character count followed by UTF-16LE text.
    pub fn read_bstr(&mut self) -> BinaryResult<String> {
        let start = self.pos;
        let count = self.read_u16()? as usize;
        match self.read_bytes(count * 2) {
            Ok(bytes) => Ok(decode_utf16le(bytes).into_owned()),
            Err(e) => {
                self.pos = start;
                Err(e)
            },
        }
    }

    pub fn read_chid(&mut self) -> BinaryResult<String> {
        Ok(decode_chid(self.read_bytes(4)?))
    }
}

/// Format bytes as lowercase, space-separated hex pairs.
///
/// ```
/// use hwpmodel::common::binary::hex_pairs;
/// assert_eq!(hex_pairs(&[0xff, 0xfe, 0x0a]), "ff fe 0a");
/// ```
pub fn hex_pairs(data: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(data.len() * 3);
    for (i, &b) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Hex dump split into lines of 16 bytes each.
pub fn hex_lines(data: &[u8]) -> Vec<String> {
    data.chunks(16).map(hex_pairs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16_le() {
        let data = [0x34, 0x12, 0x78, 0x56];
        assert!(read_u16_le(&data, 0).is_ok_and(|v| v == 0x1234));
        assert!(read_u16_le(&data, 2).is_ok_and(|v| v == 0x5678));
        assert!(read_u16_le(&data, 3).is_err());
    }

    #[test]
    fn test_read_u32_le() {
        let data = [0x78, 0x56, 0x34, 0x12];
        assert!(read_u32_le(&data, 0).is_ok_and(|v| v == 0x12345678));
        assert!(read_u32_le(&data, 1).is_err());
    }

    #[test]
    fn test_cursor_failed_read_keeps_position() {
        let data = [0x01, 0x00, 0x02];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u16(), Ok(1));
        assert_eq!(
            cursor.read_u16(),
            Err(BinaryError::InsufficientData {
                expected: 4,
                available: 3
            })
        );
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.rest(), &[0x02]);
    }

    #[test]
    fn test_bstr() {
        let data = b"\x03\x00j\x00p\x00g\x00";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_bstr().unwrap(), "jpg");
        assert!(cursor.is_empty());

        // Truncated body: the length prefix is not consumed either.
        let data = b"\x03\x00j\x00";
        let mut cursor = ByteCursor::new(data);
        assert!(cursor.read_bstr().is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_korean_text() {
        // "굴림"
        let data = [0x74, 0xad, 0xbc, 0xb9];
        assert_eq!(decode_utf16le(&data), "굴림");
    }

    #[test]
    fn test_hex_lines() {
        let data: Vec<u8> = (0u8..20).collect();
        let lines = hex_lines(&data);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "10 11 12 13");
        assert!(hex_lines(&[]).is_empty());
    }
}
