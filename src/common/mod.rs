//! Common types and utilities shared by the HWP decoder layers.

// Submodule declarations
pub mod binary;
pub mod error;
pub mod version;

// Re-exports for convenience
pub use error::{Error, Result};
pub use version::{Version, VersionRange};
