//! Named bit layouts and value tables.
//!
//! A [`BitLayout`] names sub-ranges of an integer; an [`EnumTable`] names
//! its values. Decoded values keep the raw integer together with the table
//! so lookups never lose information.

use crate::common::{Error, Result};

/// Named value table of an enumeration.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumTable {
    pub name: &'static str,
    pub items: &'static [(&'static str, u32)],
}

impl EnumTable {
    /// Value declared under `name`.
    pub fn value_of(&'static self, name: &str) -> Result<u32> {
        self.items
            .iter()
            .find(|(item, _)| *item == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::UnknownName {
                table: self.name,
                name: name.to_string(),
            })
    }

    /// Name declared for `value`, if any.
    pub fn name_of(&self, value: u32) -> Option<&'static str> {
        self.items
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }
}

/// One named sub-range `[lsb, msb]` of a bit layout.
#[derive(Debug, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub lsb: u8,
    pub msb: u8,
    pub table: Option<&'static EnumTable>,
}

impl BitField {
    /// Single-bit flag.
    pub const fn flag(name: &'static str, bit: u8) -> Self {
        Self {
            name,
            lsb: bit,
            msb: bit,
            table: None,
        }
    }

    /// Unsigned integer spanning bits `lsb..=msb`.
    pub const fn bits(name: &'static str, lsb: u8, msb: u8) -> Self {
        Self {
            name,
            lsb,
            msb,
            table: None,
        }
    }

    /// Enumeration spanning bits `lsb..=msb`.
    pub const fn enumerated(name: &'static str, lsb: u8, msb: u8, table: &'static EnumTable) -> Self {
        Self {
            name,
            lsb,
            msb,
            table: Some(table),
        }
    }

    #[inline]
    pub fn extract(&self, raw: u32) -> u32 {
        let width = (self.msb - self.lsb + 1) as u32;
        let mask = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
        (raw >> self.lsb) & mask
    }
}

/// Named bit layout of a flags integer.
#[derive(Debug, PartialEq, Eq)]
pub struct BitLayout {
    pub name: &'static str,
    pub fields: &'static [BitField],
}

impl BitLayout {
    pub fn field(&'static self, name: &str) -> Result<&'static BitField> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownName {
                table: self.name,
                name: name.to_string(),
            })
    }
}

/// Decoded flags integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagsValue {
    pub raw: u32,
    pub layout: &'static BitLayout,
}

impl FlagsValue {
    pub fn new(raw: u32, layout: &'static BitLayout) -> Self {
        Self { raw, layout }
    }

    /// Value of the named sub-range.
    ///
    /// ```
    /// use hwpmodel::hwp::binmodel::docinfo::BIN_DATA_FLAGS;
    /// use hwpmodel::hwp::dataio::FlagsValue;
    ///
    /// let flags = FlagsValue::new(0x0001, &BIN_DATA_FLAGS);
    /// assert_eq!(flags.get("storage").unwrap(), 1);
    /// assert!(flags.get("colour").is_err());
    /// ```
    pub fn get(&self, name: &str) -> Result<u32> {
        Ok(self.layout.field(name)?.extract(self.raw))
    }

    /// Whether the named sub-range is non-zero.
    pub fn is_set(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)? != 0)
    }

    /// The named sub-range as an enumeration value.
    pub fn enum_value(&self, name: &str) -> Result<EnumValue> {
        let field = self.layout.field(name)?;
        let table = field.table.ok_or_else(|| Error::UnknownName {
            table: self.layout.name,
            name: name.to_string(),
        })?;
        Ok(EnumValue::new(field.extract(self.raw), table))
    }
}

/// Decoded enumeration integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub raw: u32,
    pub table: &'static EnumTable,
}

impl EnumValue {
    pub fn new(raw: u32, table: &'static EnumTable) -> Self {
        Self { raw, table }
    }

    /// Declared name of the raw value; `None` for values outside the table.
    pub fn name(&self) -> Option<&'static str> {
        self.table.name_of(self.raw)
    }

    /// Whether the value equals the one declared under `name`.
    pub fn is(&self, name: &str) -> Result<bool> {
        Ok(self.table.value_of(name)? == self.raw)
    }
}
