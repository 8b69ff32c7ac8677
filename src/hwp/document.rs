//! Document-level access: the `FileHeader`, the `DocInfo` stream and the
//! body sections, each section read as its own [`ModelStream`].
//!
//! # Example
//!
//! ```no_run
//! use hwpmodel::hwp::document::Document;
//! use hwpmodel::hwp::storage::DirectoryStorage;
//!
//! let doc = Document::open(DirectoryStorage::new("extracted/"))?;
//! println!("version {}", doc.version());
//! for section in doc.sections()? {
//!     for model in section?.models() {
//!         let model = model?;
//!         println!("{:indent$}{}", "", model.model_type, indent = model.level as usize * 2);
//!     }
//! }
//! # Ok::<(), hwpmodel::Error>(())
//! ```

use std::io::Read;
use std::sync::Arc;

use crate::common::{Error, Result, Version};
use crate::hwp::binmodel::docinfo::LANGUAGE_FONT_COUNTS;
use crate::hwp::binmodel::{Model, ModelType};
use crate::hwp::consts::{DOCINFO_STREAM, FILEHEADER_STREAM, SECTION_STREAM_PREFIX};
use crate::hwp::storage::{FileHeader, FileProperties, StreamReader, StreamSource, decoded};
use crate::hwp::stream::ModelStream;

/// Overrides for what the `FileHeader` stream says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Decode with this version; the `FileHeader` stream may then be absent
    pub version: Option<Version>,
    pub compressed: Option<bool>,
}

/// Model stream of one document stream.
pub type DocStream<S> = ModelStream<StreamReader<<S as StreamSource>::Stream>>;

pub struct Document<S: StreamSource> {
    storage: S,
    header: FileHeader,
}

impl<S: StreamSource> Document<S> {
    pub fn open(storage: S) -> Result<Self> {
        Self::open_with(storage, DocumentOptions::default())
    }

    pub fn open_with(storage: S, options: DocumentOptions) -> Result<Self> {
        let stored = match storage.open_stream(FILEHEADER_STREAM) {
            Ok(stream) => Some(FileHeader::read_from(stream)?),
            Err(Error::StreamNotFound(_)) if options.version.is_some() => None,
            Err(e) => return Err(e),
        };

        let version = match (options.version, stored) {
            (Some(version), _) => version,
            (None, Some(header)) => header.version,
            (None, None) => return Err(Error::StreamNotFound(FILEHEADER_STREAM.to_string())),
        };
        let mut properties = stored.map_or(FileProperties::empty(), |h| h.properties);
        if let Some(compressed) = options.compressed {
            properties.set(FileProperties::COMPRESSED, compressed);
        }
        if properties.contains(FileProperties::PASSWORD) {
            return Err(Error::Unsupported("password-protected documents".to_string()));
        }

        let header = FileHeader { version, properties };
        tracing::debug!(version = %version, compressed = header.compressed(), "document opened");
        Ok(Self { storage, header })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn model_stream(&self, name: &str) -> Result<DocStream<S>> {
        let raw = self.storage.open_stream(name)?;
        ModelStream::new(decoded(raw, self.header.compressed())?, self.header.version)
    }

    pub fn docinfo(&self) -> Result<DocInfo<StreamReader<S::Stream>>> {
        Ok(DocInfo::new(self.model_stream(DOCINFO_STREAM)?))
    }

    /// Body section `n` (`BodyText/Section<n>`).
    pub fn section(&self, n: usize) -> Result<DocStream<S>> {
        self.model_stream(&format!("{}{}", SECTION_STREAM_PREFIX, n))
    }

    /// Number of body sections, as recorded in `DocumentProperties`.
    pub fn section_count(&self) -> Result<usize> {
        let properties = self.docinfo()?.document_properties()?;
        let count = properties.content.int("section_count").ok_or_else(|| {
            Error::InvalidFormat("DocumentProperties has no section count".to_string())
        })?;
        Ok(count as usize)
    }

    /// Every body section, opened as it is reached.
    pub fn sections(&self) -> Result<impl Iterator<Item = Result<DocStream<S>>> + '_> {
        let count = self.section_count()?;
        Ok((0..count).map(move |n| self.section(n)))
    }
}

/// Languages with their own face name lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Ko,
    En,
    Cn,
    Jp,
    Other,
    Symbol,
    User,
}

impl Lang {
    pub const ALL: [Lang; 7] = [
        Lang::Ko,
        Lang::En,
        Lang::Cn,
        Lang::Jp,
        Lang::Other,
        Lang::Symbol,
        Lang::User,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name in per-language structures such as `font_ids`.
    pub fn key(self) -> &'static str {
        match self {
            Lang::Ko => "ko",
            Lang::En => "en",
            Lang::Cn => "cn",
            Lang::Jp => "jp",
            Lang::Other => "other",
            Lang::Symbol => "symbol",
            Lang::User => "user",
        }
    }
}

/// The `DocInfo` stream with lookups across its definitions.
pub struct DocInfo<R: Read> {
    stream: ModelStream<R>,
}

impl<R: Read> DocInfo<R> {
    pub fn new(stream: ModelStream<R>) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &ModelStream<R> {
        &self.stream
    }

    pub fn into_stream(self) -> ModelStream<R> {
        self.stream
    }

    fn of_type(&self, model_type: ModelType) -> impl Iterator<Item = Result<Arc<Model>>> + '_ {
        self.stream
            .models()
            .filter(move |m| m.as_ref().map_or(true, |m| m.model_type == model_type))
    }

    fn first_of(&self, model_type: ModelType) -> Result<Arc<Model>> {
        self.of_type(model_type)
            .next()
            .unwrap_or_else(|| Err(Error::InvalidFormat(format!("DocInfo has no {}", model_type))))
    }

    pub fn document_properties(&self) -> Result<Arc<Model>> {
        self.first_of(ModelType::DocumentProperties)
    }

    pub fn id_mappings(&self) -> Result<Arc<Model>> {
        self.first_of(ModelType::IdMappings)
    }

    /// Face names of every language, in stored order.
    pub fn face_names(&self) -> Result<Vec<Arc<Model>>> {
        self.of_type(ModelType::FaceName).collect()
    }

    pub fn char_shape(&self, id: usize) -> Result<Arc<Model>> {
        let mut len = 0;
        for shape in self.of_type(ModelType::CharShape) {
            let shape = shape?;
            if len == id {
                return Ok(shape);
            }
            len += 1;
        }
        Err(Error::IndexOutOfRange { index: id, len })
    }

    /// Face name `index` of language `lang`.
    ///
    /// Face names of all languages are stored in one run; the counts in
    /// `IdMappings` give where each language starts.
    pub fn face_name(&self, lang: Lang, index: usize) -> Result<Arc<Model>> {
        let mappings = self.id_mappings()?;
        let count_of = |field: &str| mappings.content.int(field).unwrap_or(0) as usize;
        let start: usize = LANGUAGE_FONT_COUNTS[..lang.index()].iter().map(|f| count_of(f)).sum();
        let len = count_of(LANGUAGE_FONT_COUNTS[lang.index()]);
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        let position = start + index;
        let mut names = self.of_type(ModelType::FaceName);
        match names.nth(position) {
            Some(name) => name,
            None => Err(Error::InvalidFormat(format!(
                "IdMappings lists more face names than the {} stored",
                position
            ))),
        }
    }

    /// Face name a char shape uses for `lang`.
    pub fn char_shape_lang_face_name(&self, char_shape_id: usize, lang: Lang) -> Result<Arc<Model>> {
        let shape = self.char_shape(char_shape_id)?;
        let font_id = shape
            .content
            .get_struct("font_ids")
            .and_then(|ids| ids.int(lang.key()))
            .ok_or_else(|| Error::InvalidFormat(format!("CharShape {} has no font ids", char_shape_id)))?;
        self.face_name(lang, font_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp::consts::HwpTag;
    use crate::hwp::dataio::Value;
    use crate::hwp::fixtures::SECD_TEXT;
    use crate::hwp::record::{Record, encode_records};
    use crate::hwp::storage::MemoryStorage;

    const VERSION: Version = Version::new(5, 0, 1, 7);

    fn bstr(s: &str) -> Vec<u8> {
        let mut out = (s.encode_utf16().count() as u16).to_le_bytes().to_vec();
        out.extend(s.encode_utf16().flat_map(u16::to_le_bytes));
        out
    }

    fn docinfo_stream() -> Vec<u8> {
        let mut properties = vec![0u8; 26];
        properties[0] = 1;

        // two Korean faces, one English face
        let mut mappings = vec![0u8; 60];
        mappings[4] = 2;
        mappings[8] = 1;

        let face = |name: &str| {
            let mut payload = vec![0u8];
            payload.extend(bstr(name));
            Record::new(HwpTag::FaceName as u16, 1, payload)
        };

        let mut char_shape = vec![0u8; 68];
        char_shape[0] = 1;

        encode_records(&[
            Record::new(HwpTag::DocumentProperties as u16, 0, properties),
            Record::new(HwpTag::IdMappings as u16, 0, mappings),
            face("바탕"),
            face("굴림"),
            face("Arial"),
            Record::new(HwpTag::CharShape as u16, 1, char_shape),
        ])
        .unwrap()
    }

    fn section_stream() -> Vec<u8> {
        let mut paragraph = vec![0u8; 22];
        paragraph[0] = 19;
        encode_records(&[
            Record::new(HwpTag::ParaHeader as u16, 0, paragraph),
            Record::new(HwpTag::ParaText as u16, 1, SECD_TEXT),
        ])
        .unwrap()
    }

    fn storage(properties: FileProperties) -> MemoryStorage {
        MemoryStorage::new()
            .with_stream(
                FILEHEADER_STREAM,
                FileHeader {
                    version: VERSION,
                    properties,
                }
                .to_bytes(),
            )
            .with_stream(DOCINFO_STREAM, docinfo_stream())
            .with_stream("BodyText/Section0", section_stream())
    }

    #[test]
    fn test_open_and_read_sections() {
        let doc = Document::open(storage(FileProperties::empty())).unwrap();
        assert_eq!(doc.version(), VERSION);
        assert_eq!(doc.section_count().unwrap(), 1);

        let sections: Vec<_> = doc.sections().unwrap().collect::<Result<_>>().unwrap();
        let models: Vec<_> = sections[0].models().collect::<Result<_>>().unwrap();
        assert_eq!(models[0].model_type, ModelType::Paragraph);
        assert_eq!(models[1].model_type, ModelType::ParaText);
        let chunks = models[1].content.list("chunks").unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[2].as_list().unwrap()[1], Value::Str("Hi".to_string()));

        assert!(matches!(doc.section(1), Err(Error::StreamNotFound(_))));
    }

    #[test]
    fn test_face_name_lookup() {
        let doc = Document::open(storage(FileProperties::empty())).unwrap();
        let docinfo = doc.docinfo().unwrap();
        assert_eq!(docinfo.face_names().unwrap().len(), 3);

        let en = docinfo.face_name(Lang::En, 0).unwrap();
        assert_eq!(en.content.str("name"), Some("Arial"));
        assert!(matches!(
            docinfo.face_name(Lang::En, 1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));

        let ko = docinfo.char_shape_lang_face_name(0, Lang::Ko).unwrap();
        assert_eq!(ko.content.str("name"), Some("굴림"));
        let en = docinfo.char_shape_lang_face_name(0, Lang::En).unwrap();
        assert_eq!(en.content.str("name"), Some("Arial"));
        assert!(matches!(docinfo.char_shape(1), Err(Error::IndexOutOfRange { index: 1, len: 1 })));
    }

    #[test]
    fn test_options_override_header() {
        let storage = MemoryStorage::new().with_stream(DOCINFO_STREAM, docinfo_stream());
        assert!(matches!(
            Document::open(storage.clone()),
            Err(Error::StreamNotFound(_))
        ));

        let options = DocumentOptions {
            version: Some(Version::new(5, 0, 3, 2)),
            compressed: Some(false),
        };
        let doc = Document::open_with(storage, options).unwrap();
        assert_eq!(doc.version(), Version::new(5, 0, 3, 2));
        assert!(!doc.header().compressed());
    }

    #[test]
    fn test_password_is_unsupported() {
        let result = Document::open(storage(FileProperties::PASSWORD));
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_compressed_streams() {
        use std::io::Write;

        let pack = |data: Vec<u8>| {
            let mut encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&data).unwrap();
            encoder.finish().unwrap()
        };
        let storage = MemoryStorage::new()
            .with_stream(
                FILEHEADER_STREAM,
                FileHeader {
                    version: VERSION,
                    properties: FileProperties::COMPRESSED,
                }
                .to_bytes(),
            )
            .with_stream(DOCINFO_STREAM, pack(docinfo_stream()))
            .with_stream("BodyText/Section0", pack(section_stream()));

        let doc = Document::open(storage).unwrap();
        assert!(doc.header().compressed());
        assert_eq!(doc.section_count().unwrap(), 1);
        assert_eq!(doc.section(0).unwrap().len().unwrap(), 2);
    }
}
