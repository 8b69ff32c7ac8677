//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}

impl Error {
    /// Whether the error ends decoding of the stream it came from.
    ///
    /// Index errors leave the stream usable for valid indices.
    pub fn is_fatal_to_stream(&self) -> bool {
        !matches!(self, Error::IndexOutOfRange { .. } | Error::UnknownName { .. })
    }

    /// An equivalent error for reporting a stored failure again.
    pub fn replay(&self) -> Error {
        match self {
            Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), e.to_string())),
            Error::MalformedRecord { offset, reason } => Error::MalformedRecord {
                offset: *offset,
                reason: reason.clone(),
            },
            Error::UnknownName { table, name } => Error::UnknownName {
                table: *table,
                name: name.clone(),
            },
            Error::DuplicateControlIdentifier { chid, first, second } => Error::DuplicateControlIdentifier {
                chid: chid.clone(),
                first: *first,
                second: *second,
            },
            Error::RegistryInconsistency { type_name, reason } => Error::RegistryInconsistency {
                type_name: *type_name,
                reason: reason.clone(),
            },
            Error::IndexOutOfRange { index, len } => Error::IndexOutOfRange {
                index: *index,
                len: *len,
            },
            Error::UnsupportedVersionLayout { type_name, version } => Error::UnsupportedVersionLayout {
                type_name: *type_name,
                version: *version,
            },
            Error::StreamNotFound(name) => Error::StreamNotFound(name.clone()),
            Error::InvalidFormat(msg) => Error::InvalidFormat(msg.clone()),
            Error::Unsupported(msg) => Error::Unsupported(msg.clone()),
            Error::Json(e) => Error::InvalidFormat(e.to_string()),
        }
    }
}
