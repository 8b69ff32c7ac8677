//! Unified error types for the decoder.
//!
//! Framing and registry errors abort the stream being decoded. Per-record
//! anomalies never surface here: they degrade to opaque or partially
//! decoded content instead.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
