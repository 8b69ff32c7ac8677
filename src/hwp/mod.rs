//! HWP 5.x record streams and their decoded models.
//!
//! Layers, lowest first:
//!
//! - [`record`]: framing of the raw byte stream into records
//! - [`treeop`]: ENTER/EXIT events of the tree implied by record levels
//! - [`dataio`] and [`binmodel`]: typed decoding of record payloads
//! - [`controlchar`]: control characters inside paragraph text
//! - [`stream`]: lazy, cached, indexable model streams and JSON output
//! - [`storage`] and [`document`]: named streams of a whole document

pub mod binmodel;
pub mod consts;
pub mod controlchar;
pub mod dataio;
pub mod document;
pub mod json;
pub mod record;
pub mod storage;
pub mod stream;
pub mod treeop;

#[cfg(test)]
pub(crate) mod fixtures;

pub use binmodel::{Model, ModelType, parse_model, parse_models};
pub use document::{DocInfo, Document, DocumentOptions, Lang};
pub use record::{Record, RecordReader};
pub use storage::{DirectoryStorage, FileHeader, MemoryStorage, StreamSource};
pub use stream::ModelStream;
