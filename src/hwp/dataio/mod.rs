//! Typed values decoded from record payloads.
//!
//! Field declarations live in [`crate::hwp::binmodel`]; this module holds
//! what they decode into.

pub mod flags;
pub mod value;

pub use flags::{BitField, BitLayout, EnumTable, EnumValue, FlagsValue};
pub use value::{Content, Value};
