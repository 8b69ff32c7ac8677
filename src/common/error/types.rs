//! Error type for decoding HWP record streams.
use thiserror::Error;

use crate::common::version::Version;

/// Main error type for hwpmodel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record header is truncated or its payload runs past the stream end
    #[error("Malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    /// A flag or enum name that the declared table does not contain
    #[error("'{name}' is not declared in {table}")]
    UnknownName { table: &'static str, name: String },

    /// Two control types registered under one control id
    #[error("Control id '{chid}' is registered for both {first} and {second}")]
    DuplicateControlIdentifier {
        chid: String,
        first: &'static str,
        second: &'static str,
    },

    /// A control type the control id table does not resolve to itself
    #[error("Control registry is inconsistent for {type_name}: {reason}")]
    RegistryInconsistency { type_name: &'static str, reason: String },

    /// Random access past the last model of a stream
    #[error("Model index {index} out of range (stream has {len} models)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No field layout of a content type matches the document version
    #[error("{type_name} has no field layout for version {version}")]
    UnsupportedVersionLayout {
        type_name: &'static str,
        version: Version,
    },

    /// Named stream is missing from the storage
    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for hwpmodel operations.
pub type Result<T> = std::result::Result<T, Error>;
