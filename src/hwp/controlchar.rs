//! Control characters embedded in paragraph text.
//!
//! Paragraph text is UTF-16LE. Code units below `0x20` are control
//! characters: some stand alone, others occupy eight code units and carry
//! a parameter block. Extended controls name the control record they
//! stand for by its control id.

use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::common::binary::{BinaryError, BinaryResult, ByteCursor, decode_chid, decode_utf16le, read_u16_le};
use crate::hwp::dataio::{Content, Value};

pub const UNUSABLE: u16 = 0x00;
pub const SECTION_COLUMN_DEF: u16 = 0x02;
pub const FIELD_START: u16 = 0x03;
pub const FIELD_END: u16 = 0x04;
pub const TAB: u16 = 0x09;
pub const LINE_BREAK: u16 = 0x0a;
pub const DRAWING_TABLE_OBJECT: u16 = 0x0b;
pub const PARAGRAPH_BREAK: u16 = 0x0d;
pub const HIDDEN_EXPLANATION: u16 = 0x0f;
pub const HEADER_FOOTER: u16 = 0x10;
pub const FOOTNOTE: u16 = 0x11;
pub const AUTO_NUMBERING: u16 = 0x12;
pub const PAGE_CTLCHR: u16 = 0x15;
pub const BOOKMARK: u16 = 0x16;
pub const DUTMAL_CHAROVERLAP: u16 = 0x17;
pub const HYPHEN: u16 = 0x18;
pub const NONBREAK_SPACE: u16 = 0x1e;
pub const FIXWIDTH_SPACE: u16 = 0x1f;

/// Control character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// A single code unit
    Char,
    /// Eight code units with an inline parameter block
    Inline,
    /// Eight code units pointing at a control record
    Extended,
}

impl ControlKind {
    /// Class of `code`, `None` for ordinary characters.
    pub fn of(code: u16) -> Option<Self> {
        match code {
            0x01..=0x03 | 0x0b | 0x0c | 0x0e..=0x12 | 0x15..=0x17 => Some(ControlKind::Extended),
            0x04..=0x09 | 0x13 | 0x14 => Some(ControlKind::Inline),
            0x00..=0x1f => Some(ControlKind::Char),
            _ => None,
        }
    }

    /// Size in UTF-16 code units.
    pub fn width(self) -> usize {
        match self {
            ControlKind::Char => 1,
            ControlKind::Inline | ControlKind::Extended => 8,
        }
    }
}

/// Parameter block of a tab control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabParam {
    pub width: u32,
    pub unknown0: u8,
    pub unknown1: u8,
    pub unknown2: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlParam {
    Tab(TabParam),
    Raw(Bytes),
}

/// One decoded control character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlChar {
    pub code: u16,
    pub chid: Option<String>,
    pub param: Option<ControlParam>,
}

impl ControlChar {
    pub fn kind(&self) -> ControlKind {
        ControlKind::of(self.code).unwrap_or(ControlKind::Char)
    }

    pub fn to_content(&self) -> Content {
        let mut content = Content::new();
        content.insert("code", Value::Int(self.code as i64));
        if let Some(chid) = &self.chid {
            content.insert("chid", Value::Str(chid.clone()));
        }
        match &self.param {
            Some(ControlParam::Raw(bytes)) => content.insert("param", Value::Bytes(bytes.clone())),
            Some(ControlParam::Tab(tab)) => content.insert(
                "param",
                Value::Struct(Content::from([
                    ("width", Value::Int(tab.width as i64)),
                    ("unknown0", Value::Int(tab.unknown0 as i64)),
                    ("unknown1", Value::Int(tab.unknown1 as i64)),
                    ("unknown2", Value::Bytes(tab.unknown2.clone())),
                ])),
            ),
            None => {},
        }
        content
    }
}

impl Serialize for ControlChar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_content().serialize(serializer)
    }
}

/// Locate the next control character at or after byte offset `start`.
///
/// Returns its byte range, clamped to the buffer; `(len, len)` when there
/// is none.
///
/// ```
/// use hwpmodel::hwp::controlchar::find;
/// assert_eq!(find(b"\x41\x00", 0), (2, 2));
/// assert_eq!(find(b"\x41\x00\x0d\x00", 0), (2, 4));
/// ```
pub fn find(data: &[u8], start: usize) -> (usize, usize) {
    let mut i = start;
    while i + 1 < data.len() {
        if data[i] < 0x20 && data[i + 1] == 0 {
            let width = ControlKind::of(data[i] as u16).map_or(1, ControlKind::width);
            return (i, (i + width * 2).min(data.len()));
        }
        i += 2;
    }
    (data.len(), data.len())
}

/// Decode the control character at the start of `data`.
pub fn decode(data: &[u8]) -> BinaryResult<ControlChar> {
    let code = read_u16_le(data, 0)?;
    let kind = ControlKind::of(code)
        .ok_or_else(|| BinaryError::ParseError(format!("{:#06x} is not a control character", code)))?;
    if kind == ControlKind::Char {
        return Ok(ControlChar {
            code,
            chid: None,
            param: None,
        });
    }

    let mut cursor = ByteCursor::new(data);
    cursor.read_u16()?;
    let block = cursor.read_bytes(12)?;
    if code == TAB {
        return Ok(ControlChar {
            code,
            chid: None,
            param: Some(ControlParam::Tab(TabParam {
                width: u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
                unknown0: block[4],
                unknown1: block[5],
                unknown2: Bytes::copy_from_slice(&block[6..12]),
            })),
        });
    }
    Ok(ControlChar {
        code,
        chid: Some(decode_chid(&block[..4])),
        param: Some(ControlParam::Raw(Bytes::copy_from_slice(&block[4..12]))),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkBody {
    Text(String),
    Control(ControlChar),
}

/// A run of plain text or one control character, with its byte range in
/// the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub start: usize,
    pub end: usize,
    pub body: ChunkBody,
}

impl TextChunk {
    /// The range in UTF-16 code units.
    pub fn char_range(&self) -> (usize, usize) {
        (self.start / 2, self.end / 2)
    }

    fn to_value(&self) -> Value {
        let range = Value::List(vec![Value::Int(self.start as i64), Value::Int(self.end as i64)]);
        let body = match &self.body {
            ChunkBody::Text(text) => Value::Str(text.clone()),
            ChunkBody::Control(control) => Value::Struct(control.to_content()),
        };
        Value::List(vec![range, body])
    }
}

/// Split paragraph text into alternating text and control chunks.
pub fn text_chunks(data: &[u8]) -> BinaryResult<Vec<TextChunk>> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let (start, end) = find(data, pos);
        if start > pos {
            chunks.push(TextChunk {
                start: pos,
                end: start,
                body: ChunkBody::Text(decode_utf16le(&data[pos..start]).into_owned()),
            });
        }
        if start < end {
            chunks.push(TextChunk {
                start,
                end,
                body: ChunkBody::Control(decode(&data[start..end])?),
            });
        }
        pos = end;
    }
    Ok(chunks)
}

/// Paragraph text without control characters; line and paragraph breaks
/// become newlines and tabs become `\t`.
pub fn plain_text(data: &[u8]) -> BinaryResult<String> {
    let mut out = String::new();
    for chunk in text_chunks(data)? {
        match chunk.body {
            ChunkBody::Text(text) => out.push_str(&text),
            ChunkBody::Control(control) => match control.code {
                LINE_BREAK | PARAGRAPH_BREAK => out.push('\n'),
                TAB => out.push('\t'),
                _ => {},
            },
        }
    }
    Ok(out)
}

/// Field decoder of `ParaText`: consumes the whole payload.
pub fn decode_chunks(cursor: &mut ByteCursor<'_>) -> BinaryResult<Value> {
    let data = cursor.rest();
    let chunks = text_chunks(data)?;
    cursor.read_bytes(data.len())?;
    Ok(Value::List(chunks.iter().map(TextChunk::to_value).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp::fixtures::SECD_TEXT;

    #[test]
    fn test_decode_section_def() {
        let control = decode(&SECD_TEXT[0..16]).unwrap();
        assert_eq!(control.code, SECTION_COLUMN_DEF);
        assert_eq!(control.chid.as_deref(), Some("secd"));
        assert_eq!(control.param, Some(ControlParam::Raw(Bytes::from_static(&[0; 8]))));
        assert_eq!(control.kind(), ControlKind::Extended);
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"\x41\x00", 0), (2, 2));
        assert_eq!(find(SECD_TEXT, 0), (0, 16));
        assert_eq!(find(SECD_TEXT, 16), (16, 32));
        // "Hi" then the paragraph break
        assert_eq!(find(SECD_TEXT, 32), (36, 38));
        // A wide control cut short by the buffer end
        assert_eq!(find(&SECD_TEXT[..10], 0), (0, 10));
    }

    #[test]
    fn test_class_table() {
        assert_eq!(ControlKind::of(0x0d), Some(ControlKind::Char));
        assert_eq!(ControlKind::of(0x09), Some(ControlKind::Inline));
        assert_eq!(ControlKind::of(0x0b), Some(ControlKind::Extended));
        assert_eq!(ControlKind::of(0x19), Some(ControlKind::Char));
        assert_eq!(ControlKind::of(0x20), None);
    }

    #[test]
    fn test_tab_param() {
        let mut data = vec![0x09, 0x00];
        data.extend_from_slice(&4000u32.to_le_bytes());
        data.extend_from_slice(&[0x00, 0x01, 0, 0, 0, 0, 0, 0, 0x09, 0x00]);
        let tab = decode(&data).unwrap();
        assert!(tab.chid.is_none());
        let content = tab.to_content();
        assert_eq!(content.names().collect::<Vec<_>>(), ["code", "param"]);
        let param = content.get_struct("param").unwrap();
        assert_eq!(param.int("width"), Some(4000));
        assert_eq!(param.int("unknown1"), Some(1));
    }

    #[test]
    fn test_chunks() {
        let chunks = text_chunks(SECD_TEXT).unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!((chunks[0].start, chunks[0].end), (0, 16));
        assert_eq!(chunks[0].char_range(), (0, 8));
        assert_eq!(chunks[2].body, ChunkBody::Text("Hi".to_string()));
        assert!(matches!(&chunks[3].body, ChunkBody::Control(c) if c.code == PARAGRAPH_BREAK));
        assert_eq!(plain_text(SECD_TEXT).unwrap(), "Hi\n");
    }

    #[test]
    fn test_chunk_json() {
        let mut cursor = ByteCursor::new(SECD_TEXT);
        let value = decode_chunks(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!([[0, 16], {
                "code": 2,
                "chid": "secd",
                "param": "00 00 00 00 00 00 00 00"
            }])
        );
        assert_eq!(json[2], serde_json::json!([[32, 36], "Hi"]));
    }

    #[test]
    fn test_truncated_wide_control_fails() {
        assert!(text_chunks(&SECD_TEXT[..10]).is_err());
    }
}
