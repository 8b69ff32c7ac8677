//! hwpmodel - decoder for the record streams of HWP 5.x documents
//!
//! HWP 5.x stores each document part (`DocInfo`, `BodyText/Section0`, ...)
//! as a stream of tagged, leveled binary records. This library turns such a
//! stream into typed models: paragraphs, tables, shapes, styles and the
//! control characters embedded in text.
//!
//! # Features
//!
//! - **Lazy decoding**: records are framed and decoded only as far as they
//!   are consumed
//! - **Random access**: decoded models are cached by sequence number
//! - **Tree grouping**: models grouped under their top-level paragraph
//! - **Version aware layouts**: fields are gated on the document version
//! - **Streaming JSON**: serialize a whole stream without building one string
//! - **Forward compatible**: unknown records and trailing bytes are kept
//!   as hex instead of being dropped
//!
//! # Example - Decoding a stream
//!
//! ```
//! use hwpmodel::{ModelStream, ModelType, Version};
//!
//! // A table body record
//! let data: &[u8] = b"M\x08\xa0\x01\x06\x00\x00\x04\x02\x00\x02\x00\x00\x00\
//!     \x8d\x00\x8d\x00\x8d\x00\x8d\x00\x02\x00\x02\x00\x01\x00\x00\x00";
//! let stream = ModelStream::new(data, Version::new(5, 0, 1, 7))?;
//!
//! let body = stream.model(0)?;
//! assert_eq!(body.model_type, ModelType::TableBody);
//! assert_eq!(body.content.int("rows"), Some(2));
//! assert_eq!(body.content.get_struct("padding").unwrap().int("left"), Some(141));
//! # Ok::<(), hwpmodel::Error>(())
//! ```
//!
//! # Example - Reading a document
//!
//! ```no_run
//! use hwpmodel::{DirectoryStorage, Document};
//!
//! let doc = Document::open(DirectoryStorage::new("extracted/"))?;
//! let section = doc.section(0)?;
//! section.write_json(std::io::stdout().lock())?;
//! # Ok::<(), hwpmodel::Error>(())
//! ```

/// Shared types: errors, versions and the byte cursor
pub mod common;

/// HWP record streams, models and documents
pub mod hwp;

// Re-export commonly used types for convenience
pub use common::{Error, Result, Version, VersionRange};
pub use hwp::{
    DirectoryStorage, DocInfo, Document, DocumentOptions, FileHeader, Lang, MemoryStorage, Model, ModelStream,
    ModelType, Record, StreamSource,
};
