//! Declarative field tables.
//!
//! Every content type is a static list of [`Field`]s decoded in order. A
//! field may be limited to a version range or to a condition over the
//! fields decoded before it.

use super::ModelType;
use crate::common::binary::{BinaryResult, ByteCursor};
use crate::common::{Version, VersionRange};
use crate::hwp::dataio::{BitLayout, EnumTable, Value};

/// Fixed-width primitive encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    /// One UTF-16LE code unit
    WChar,
    /// u16 length followed by UTF-16LE text
    Bstr,
    /// Four reversed ASCII bytes
    Chid,
    /// `0x00bbggrr`
    ColorRef,
    HwpUnit,
    SHwpUnit,
    HwpUnit16,
}

/// Custom payload decoder for layouts the table cannot express.
pub type CustomDecode = fn(&mut ByteCursor<'_>) -> BinaryResult<Value>;

/// How a field's bytes are decoded.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Prim(Prim),
    /// Integer wrapped with a named bit layout
    Flags(Prim, &'static BitLayout),
    /// Integer wrapped with a named value table
    Enum(Prim, &'static EnumTable),
    /// Nested structure stored under the field name
    Struct(&'static [Field]),
    /// Group whose fields are merged into the enclosing content
    Inline(&'static [Field]),
    /// Tuple of primitives, decoded to a list
    Tuple(&'static [Prim]),
    Array(&'static FieldKind, Count),
    /// Structure chosen by a sub-range of an earlier flags field
    Select {
        field: &'static str,
        bits: &'static str,
        cases: &'static [(u32, &'static [Field])],
    },
    Bytes(usize),
    Custom(CustomDecode),
}

/// Element count of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// Integer value of an earlier field of the same content
    Field(&'static str),
    /// Integer field of the parent model; without one, elements are read
    /// until the payload ends
    Parent(&'static str),
    /// Count stored right before the elements
    Prefixed(Prim),
    /// Bit range of an earlier flags field
    FlagBits {
        field: &'static str,
        bits: &'static str,
    },
    /// Elements until the payload ends
    ToEnd,
}

/// Presence condition evaluated before a field is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Named bit range of an earlier flags field is non-zero
    Flag {
        field: &'static str,
        name: &'static str,
    },
    NotFlag {
        field: &'static str,
        name: &'static str,
    },
    /// An earlier string field equals one of the listed values
    StrIn {
        field: &'static str,
        values: &'static [&'static str],
    },
    ParentIs(ModelType),
}

/// One declared field.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub versions: VersionRange,
    pub when: Condition,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            versions: VersionRange::ALL,
            when: Condition::Always,
        }
    }

    pub const fn prim(name: &'static str, prim: Prim) -> Self {
        Self::new(name, FieldKind::Prim(prim))
    }

    pub const fn since(mut self, version: Version) -> Self {
        self.versions.start = Some(version);
        self
    }

    pub const fn until(mut self, version: Version) -> Self {
        self.versions.end = Some(version);
        self
    }

    pub const fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

/// Descriptor of a content type: its fields, an optional base whose
/// fields come first, and the versions it can decode.
#[derive(Debug)]
pub struct ContentType {
    pub name: &'static str,
    pub base: Option<&'static ContentType>,
    pub fields: &'static [Field],
    pub supported: VersionRange,
}

/// Every HWP 5.x revision.
pub const HWP5: VersionRange = VersionRange::new(
    Some(Version::new(5, 0, 0, 0)),
    Some(Version::new(6, 0, 0, 0)),
);

impl ContentType {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            base: None,
            fields,
            supported: HWP5,
        }
    }

    pub const fn extends(name: &'static str, base: &'static ContentType, fields: &'static [Field]) -> Self {
        Self {
            name,
            base: Some(base),
            fields,
            supported: HWP5,
        }
    }

    /// Descriptors from the outermost base down to `self`.
    pub fn chain(&'static self) -> Vec<&'static ContentType> {
        let mut chain = vec![self];
        let mut cursor = self.base;
        while let Some(base) = cursor {
            chain.push(base);
            cursor = base.base;
        }
        chain.reverse();
        chain
    }

    /// First descriptor in the chain that cannot decode `version`.
    pub fn unsupported_in(&'static self, version: Version) -> Option<&'static ContentType> {
        self.chain()
            .into_iter()
            .find(|ty| !ty.supported.contains(version))
    }
}

/// Shorthand constructors used by the content tables.
pub(crate) mod dsl {
    pub use super::{Condition, Count, Field, FieldKind, Prim};
    use crate::hwp::dataio::{BitLayout, EnumTable};

    pub const fn u8(name: &'static str) -> Field {
        Field::prim(name, Prim::U8)
    }
    pub const fn i8(name: &'static str) -> Field {
        Field::prim(name, Prim::I8)
    }
    pub const fn u16(name: &'static str) -> Field {
        Field::prim(name, Prim::U16)
    }
    pub const fn i16(name: &'static str) -> Field {
        Field::prim(name, Prim::I16)
    }
    pub const fn u32(name: &'static str) -> Field {
        Field::prim(name, Prim::U32)
    }
    pub const fn i32(name: &'static str) -> Field {
        Field::prim(name, Prim::I32)
    }
    pub const fn wchar(name: &'static str) -> Field {
        Field::prim(name, Prim::WChar)
    }
    pub const fn bstr(name: &'static str) -> Field {
        Field::prim(name, Prim::Bstr)
    }
    pub const fn chid(name: &'static str) -> Field {
        Field::prim(name, Prim::Chid)
    }
    pub const fn color(name: &'static str) -> Field {
        Field::prim(name, Prim::ColorRef)
    }
    pub const fn hwpunit(name: &'static str) -> Field {
        Field::prim(name, Prim::HwpUnit)
    }
    pub const fn shwpunit(name: &'static str) -> Field {
        Field::prim(name, Prim::SHwpUnit)
    }
    pub const fn hwpunit16(name: &'static str) -> Field {
        Field::prim(name, Prim::HwpUnit16)
    }
    pub const fn flags(name: &'static str, prim: Prim, layout: &'static BitLayout) -> Field {
        Field::new(name, FieldKind::Flags(prim, layout))
    }
    pub const fn enumerated(name: &'static str, prim: Prim, table: &'static EnumTable) -> Field {
        Field::new(name, FieldKind::Enum(prim, table))
    }
    pub const fn structure(name: &'static str, fields: &'static [Field]) -> Field {
        Field::new(name, FieldKind::Struct(fields))
    }
    pub const fn inline(fields: &'static [Field]) -> Field {
        Field::new("", FieldKind::Inline(fields))
    }
    pub const fn array(name: &'static str, elem: &'static FieldKind, count: Count) -> Field {
        Field::new(name, FieldKind::Array(elem, count))
    }
    pub const fn bytes(name: &'static str, len: usize) -> Field {
        Field::new(name, FieldKind::Bytes(len))
    }
    pub const fn flag_set(field: &'static str, name: &'static str) -> Condition {
        Condition::Flag { field, name }
    }
    pub const fn flag_clear(field: &'static str, name: &'static str) -> Condition {
        Condition::NotFlag { field, name }
    }
}
