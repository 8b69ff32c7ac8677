//! Record framing for HWP 5.x streams.
//!
//! A stream is a sequence of records laid back to back. Each record starts
//! with a 32-bit little-endian header:
//!
//! ```text
//!  31          20 19         10 9           0
//! +--------------+-------------+-------------+
//! |     size     |    level    |   tag id    |
//! +--------------+-------------+-------------+
//! ```
//!
//! A size field of `0xFFF` means the real size follows as an extra `u32`.

use std::io::{self, Read};

use bytes::Bytes;

use super::consts::HwpTag;
use crate::common::{Error, Result};

const TAG_MASK: u32 = 0x3FF;
const LEVEL_MASK: u32 = 0x3FF;
const LEVEL_SHIFT: u32 = 10;
const SIZE_SHIFT: u32 = 20;
/// Size value that selects the extended header form
pub const EXTENDED_SIZE: u32 = 0xFFF;
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub tag_id: u16,
    pub level: u16,
    pub size: u32,
}

impl RecordHeader {
    /// Unpack the fixed 32-bit header word. The size is the inline value,
    /// which is [`EXTENDED_SIZE`] when an extended size follows.
    #[inline]
    pub fn unpack(word: u32) -> Self {
        Self {
            tag_id: (word & TAG_MASK) as u16,
            level: ((word >> LEVEL_SHIFT) & LEVEL_MASK) as u16,
            size: word >> SIZE_SHIFT,
        }
    }

    /// Whether this size needs the 8-byte header form.
    #[inline]
    pub fn is_extended(&self) -> bool {
        self.size >= EXTENDED_SIZE
    }

    /// Header length in bytes.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        if self.is_extended() { 8 } else { 4 }
    }

    /// Encode the header, used to build fixtures.
    pub fn to_bytes(&self) -> Vec<u8> {
        let inline_size = self.size.min(EXTENDED_SIZE);
        let word = (self.tag_id as u32 & TAG_MASK)
            | (self.level as u32 & LEVEL_MASK) << LEVEL_SHIFT
            | inline_size << SIZE_SHIFT;
        let mut out = word.to_le_bytes().to_vec();
        if self.is_extended() {
            out.extend_from_slice(&self.size.to_le_bytes());
        }
        out
    }
}

/// One framed record. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag_id: u16,
    pub level: u16,
    pub payload: Bytes,
    /// Zero-based position in the stream
    pub seqno: usize,
    /// Byte offset of the header within the stream
    pub offset: u64,
}

impl Record {
    pub fn new(tag_id: u16, level: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            tag_id,
            level,
            payload: payload.into(),
            seqno: 0,
            offset: 0,
        }
    }

    #[inline]
    pub fn tag(&self) -> HwpTag {
        HwpTag::from(self.tag_id)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Header that frames this record; fails for payloads the 32-bit size
    /// field cannot describe.
    pub fn header(&self) -> Result<RecordHeader> {
        Ok(RecordHeader {
            tag_id: self.tag_id,
            level: self.level,
            size: framed_size(self.payload.len())?,
        })
    }
}

fn framed_size(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::InvalidFormat(format!("payload of {} bytes exceeds the record size field", len))
    })
}

/// Lazy record iterator over a byte stream.
///
/// Records are read one at a time as the iterator is advanced. A truncated
/// header or payload yields one [`Error::MalformedRecord`] and ends the
/// iteration.
pub struct RecordReader<R> {
    reader: R,
    offset: u64,
    seqno: usize,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            seqno: 0,
            done: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn malformed(&self, offset: u64, reason: impl Into<String>) -> Error {
        Error::MalformedRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// Fill `buf` completely, returning how many bytes were available.
    fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        let start = self.offset;

        let mut word = [0u8; 4];
        let got = self.read_full(&mut word)?;
        if got == 0 {
            return Ok(None);
        }
        if got < 4 {
            return Err(self.malformed(start, format!("truncated header: {} of 4 bytes", got)));
        }
        self.offset += 4;

        let mut header = RecordHeader::unpack(u32::from_le_bytes(word));
        if header.size == EXTENDED_SIZE {
            let mut ext = [0u8; 4];
            let got = self.read_full(&mut ext)?;
            if got < 4 {
                return Err(self.malformed(
                    start,
                    format!("truncated extended size: {} of 4 bytes", got),
                ));
            }
            self.offset += 4;
            header.size = u32::from_le_bytes(ext);
        }

        // Grow with the bytes actually present; the declared size is untrusted.
        let mut payload = Vec::with_capacity((header.size as usize).min(PREALLOC_LIMIT));
        let got = (&mut self.reader).take(header.size as u64).read_to_end(&mut payload)?;
        if got < header.size as usize {
            return Err(self.malformed(
                start,
                format!(
                    "declared payload of {} bytes but only {} remain",
                    header.size, got
                ),
            ));
        }
        self.offset += header.size as u64;

        let record = Record {
            tag_id: header.tag_id,
            level: header.level,
            payload: Bytes::from(payload),
            seqno: self.seqno,
            offset: start,
        };
        self.seqno += 1;

        tracing::trace!(
            seqno = record.seqno,
            tag_id = record.tag_id,
            level = record.level,
            size = record.size(),
            "framed record"
        );
        Ok(Some(record))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

/// Read every record of an in-memory stream.
pub fn read_records(data: &[u8]) -> Result<Vec<Record>> {
    RecordReader::new(data).collect()
}

/// Encode records back to back, used to build fixtures.
pub fn encode_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        out.extend_from_slice(&record.header()?.to_bytes());
        out.extend_from_slice(&record.payload);
    }
    Ok(out)
}
