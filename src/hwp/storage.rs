//! Access to the named streams of a document.
//!
//! The compound file container itself is not read here. A
//! [`StreamSource`] hands out byte streams by name (`FileHeader`,
//! `DocInfo`, `BodyText/Section0`, ...), either from memory or from a
//! directory the streams were extracted to.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use bytes::Bytes;
use zerocopy::{FromBytes, LE, U32};
use zerocopy_derive::FromBytes as DeriveFromBytes;

#[cfg(feature = "deflate")]
use flate2::read::DeflateDecoder;

use crate::common::{Error, Result, Version};

/// Provider of named byte streams.
pub trait StreamSource {
    type Stream: Read;

    fn open_stream(&self, name: &str) -> Result<Self::Stream>;
}

/// Streams held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    streams: HashMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.streams.insert(name.into(), data.into());
    }

    pub fn with_stream(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }
}

impl StreamSource for MemoryStorage {
    type Stream = Cursor<Bytes>;

    fn open_stream(&self, name: &str) -> Result<Self::Stream> {
        self.streams
            .get(name)
            .cloned()
            .map(Cursor::new)
            .ok_or_else(|| Error::StreamNotFound(name.to_string()))
    }
}

/// Streams extracted to files below a directory; `BodyText/Section0` is
/// the file `<root>/BodyText/Section0`.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl StreamSource for DirectoryStorage {
    type Stream = BufReader<File>;

    fn open_stream(&self, name: &str) -> Result<Self::Stream> {
        match File::open(self.path_of(name)) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::StreamNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Leading bytes of the `FileHeader` signature field
pub const SIGNATURE: &[u8] = b"HWP Document File";

bitflags! {
    /// Document property word of the `FileHeader` stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileProperties: u32 {
        /// DocInfo and BodyText streams are raw-deflate compressed
        const COMPRESSED = 1 << 0;
        const PASSWORD = 1 << 1;
        const DISTRIBUTABLE = 1 << 2;
        const SCRIPT = 1 << 3;
        const DRM = 1 << 4;
        const XML_TEMPLATE = 1 << 5;
        const HISTORY = 1 << 6;
        const CERT_SIGNED = 1 << 7;
        const CERT_ENCRYPTED = 1 << 8;
        const CERT_SIGNATURE_EXTRA = 1 << 9;
        const CERT_DRM = 1 << 10;
        const CCL = 1 << 11;
    }
}

/// On-disk prefix of the 256-byte `FileHeader` stream.
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawFileHeader {
    signature: [u8; 32],
    version: U32<LE>,
    properties: U32<LE>,
}

/// Decoded `FileHeader` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: Version,
    pub properties: FileProperties,
}

impl FileHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (raw, _) = RawFileHeader::read_from_prefix(data).map_err(|_| {
            Error::InvalidFormat(format!("FileHeader needs 40 bytes, got {}", data.len()))
        })?;
        let (signature, padding) = raw.signature.split_at(SIGNATURE.len());
        if signature != SIGNATURE || padding.iter().any(|&b| b != 0) {
            return Err(Error::InvalidFormat("not an HWP 5 document signature".to_string()));
        }
        Ok(Self {
            version: Version::from_u32(raw.version.get()),
            properties: FileProperties::from_bits_retain(raw.properties.get()),
        })
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::with_capacity(256);
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    pub fn compressed(&self) -> bool {
        self.properties.contains(FileProperties::COMPRESSED)
    }

    /// Encode a header, used to build fixtures.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; 256];
        out[..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        out[32..36].copy_from_slice(&self.version.to_u32().to_le_bytes());
        out[36..40].copy_from_slice(&self.properties.bits().to_le_bytes());
        out
    }
}

/// A document stream as stored, or inflated on the fly.
pub enum StreamReader<R> {
    Plain(R),
    #[cfg(feature = "deflate")]
    Deflate(DeflateDecoder<R>),
}

impl<R: Read> Read for StreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            StreamReader::Plain(reader) => reader.read(buf),
            #[cfg(feature = "deflate")]
            StreamReader::Deflate(reader) => reader.read(buf),
        }
    }
}

/// Wrap `stream` so that reads yield its decoded bytes.
pub fn decoded<R: Read>(stream: R, compressed: bool) -> Result<StreamReader<R>> {
    if !compressed {
        return Ok(StreamReader::Plain(stream));
    }
    #[cfg(feature = "deflate")]
    {
        Ok(StreamReader::Deflate(DeflateDecoder::new(stream)))
    }
    #[cfg(not(feature = "deflate"))]
    {
        drop(stream);
        Err(Error::Unsupported(
            "compressed streams need the `deflate` feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(properties: FileProperties) -> FileHeader {
        FileHeader {
            version: Version::new(5, 0, 1, 7),
            properties,
        }
    }

    #[test]
    fn test_file_header() {
        let bytes = header(FileProperties::COMPRESSED | FileProperties::HISTORY).to_bytes();
        let parsed = FileHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.version, Version::new(5, 0, 1, 7));
        assert!(parsed.compressed());
        assert!(parsed.properties.contains(FileProperties::HISTORY));
        assert!(!parsed.properties.contains(FileProperties::PASSWORD));
    }

    #[test]
    fn test_file_header_rejects_garbage() {
        assert!(matches!(FileHeader::parse(b"HWP"), Err(Error::InvalidFormat(_))));
        let mut bytes = header(FileProperties::empty()).to_bytes();
        bytes[0] = b'X';
        assert!(matches!(FileHeader::parse(&bytes), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new().with_stream("DocInfo", &b"\x01\x02"[..]);
        let mut data = Vec::new();
        storage.open_stream("DocInfo").unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, [1, 2]);
        assert!(matches!(
            storage.open_stream("BodyText/Section0"),
            Err(Error::StreamNotFound(name)) if name == "BodyText/Section0"
        ));
    }

    #[test]
    fn test_directory_storage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("BodyText")).unwrap();
        std::fs::write(dir.path().join("BodyText").join("Section0"), b"abc").unwrap();

        let storage = DirectoryStorage::new(dir.path());
        let mut data = String::new();
        storage
            .open_stream("BodyText/Section0")
            .unwrap()
            .read_to_string(&mut data)
            .unwrap();
        assert_eq!(data, "abc");
        assert!(matches!(storage.open_stream("DocInfo"), Err(Error::StreamNotFound(_))));
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_deflate_stream() {
        use std::io::Write;

        let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"record bytes").unwrap();
        let packed = encoder.finish().unwrap();

        let mut out = Vec::new();
        decoded(&packed[..], true).unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"record bytes");

        let mut out = Vec::new();
        decoded(&b"plain"[..], false).unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"plain");
    }
}
