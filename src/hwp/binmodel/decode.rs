//! Table-driven field decoder.
//!
//! Fields are decoded strictly in declaration order, bases first. When a
//! field cannot be decoded, the cursor is moved back to where that field
//! started and decoding ends; whatever is left of the payload becomes the
//! model's unparsed tail.

use bytes::Bytes;

use super::context::ParseContext;
use super::field::{Condition, ContentType, Count, Field, FieldKind, Prim};
use crate::common::binary::{BinaryError, BinaryResult, ByteCursor};
use crate::common::{Error, Result};
use crate::hwp::dataio::{Content, EnumValue, FlagsValue, Value};

/// The field that stopped a decode.
#[derive(Debug)]
pub struct DecodeStop {
    pub field: &'static str,
    pub error: BinaryError,
}

/// Decode `ty` (and its bases) from the context cursor.
///
/// Fails only when the type has no layout for the context version. Field
/// level failures are reported through the returned [`DecodeStop`].
pub fn decode_content(
    ctx: &mut ParseContext<'_>,
    ty: &'static ContentType,
) -> Result<(Content, Option<DecodeStop>)> {
    if let Some(unsupported) = ty.unsupported_in(ctx.version) {
        return Err(Error::UnsupportedVersionLayout {
            type_name: unsupported.name,
            version: ctx.version,
        });
    }

    let mut content = Content::new();
    let mut reader = FieldReader { ctx };
    for part in ty.chain() {
        if let Err(stop) = reader.fields(part.fields, &mut content) {
            return Ok((content, Some(stop)));
        }
    }
    Ok((content, None))
}

struct FieldReader<'r, 'a> {
    ctx: &'r mut ParseContext<'a>,
}

impl FieldReader<'_, '_> {
    fn fields(&mut self, fields: &'static [Field], content: &mut Content) -> std::result::Result<(), DecodeStop> {
        for field in fields {
            if !field.versions.contains(self.ctx.version) || !self.holds(&field.when, content) {
                continue;
            }
            if let FieldKind::Inline(group) = field.kind {
                // Inner fields rewind on their own.
                self.fields(group, content)?;
                continue;
            }

            let start = self.ctx.cursor.position();
            match self.kind(&field.kind, content) {
                Ok(value) => content.insert(field.name, value),
                Err(error) => {
                    self.ctx.cursor.rewind(start);
                    return Err(DecodeStop {
                        field: field.name,
                        error,
                    });
                },
            }
        }
        Ok(())
    }

    fn holds(&self, condition: &Condition, content: &Content) -> bool {
        match condition {
            Condition::Always => true,
            Condition::Flag { field, name } => flag_bits(content, field, name).is_some_and(|v| v != 0),
            Condition::NotFlag { field, name } => flag_bits(content, field, name).is_some_and(|v| v == 0),
            Condition::StrIn { field, values } => content
                .str(field)
                .is_some_and(|s| values.contains(&s)),
            Condition::ParentIs(parent) => self.ctx.parent_type() == Some(*parent),
        }
    }

    fn kind(&mut self, kind: &FieldKind, content: &Content) -> BinaryResult<Value> {
        match *kind {
            FieldKind::Prim(prim) => read_prim(&mut self.ctx.cursor, prim),
            FieldKind::Flags(prim, layout) => {
                let raw = read_unsigned(&mut self.ctx.cursor, prim)?;
                Ok(Value::Flags(FlagsValue::new(raw, layout)))
            },
            FieldKind::Enum(prim, table) => {
                let raw = read_unsigned(&mut self.ctx.cursor, prim)?;
                Ok(Value::Enum(EnumValue::new(raw, table)))
            },
            FieldKind::Struct(fields) => {
                let mut nested = Content::new();
                self.fields(fields, &mut nested).map_err(|stop| stop.error)?;
                Ok(Value::Struct(nested))
            },
            FieldKind::Inline(fields) => {
                let mut nested = Content::new();
                self.fields(fields, &mut nested).map_err(|stop| stop.error)?;
                Ok(Value::Struct(nested))
            },
            FieldKind::Tuple(prims) => {
                let items = prims
                    .iter()
                    .map(|&prim| read_prim(&mut self.ctx.cursor, prim))
                    .collect::<BinaryResult<Vec<_>>>()?;
                Ok(Value::List(items))
            },
            FieldKind::Array(elem, count) => self.array(elem, count, content),
            FieldKind::Select { field, bits, cases } => {
                let selector = flag_bits(content, field, bits).ok_or_else(|| {
                    BinaryError::ParseError(format!("selector {}.{} is not decoded", field, bits))
                })?;
                let (_, fields) = cases
                    .iter()
                    .find(|(key, _)| *key == selector)
                    .ok_or_else(|| {
                        BinaryError::ParseError(format!("no layout for {}.{} = {}", field, bits, selector))
                    })?;
                let mut nested = Content::new();
                self.fields(fields, &mut nested).map_err(|stop| stop.error)?;
                Ok(Value::Struct(nested))
            },
            FieldKind::Bytes(len) => Ok(Value::Bytes(Bytes::copy_from_slice(
                self.ctx.cursor.read_bytes(len)?,
            ))),
            FieldKind::Custom(decode) => decode(&mut self.ctx.cursor),
        }
    }

    fn array(&mut self, elem: &FieldKind, count: Count, content: &Content) -> BinaryResult<Value> {
        let count = match count {
            Count::Fixed(n) => Some(n),
            Count::Field(name) => Some(count_value(content.int(name), name)?),
            Count::Parent(name) => match self.ctx.parent_int(name) {
                Some(n) => Some(count_value(Some(n), name)?),
                None => None,
            },
            Count::Prefixed(prim) => {
                let n = read_unsigned(&mut self.ctx.cursor, prim)?;
                Some(n as usize)
            },
            Count::FlagBits { field, bits } => {
                let n = flag_bits(content, field, bits).ok_or_else(|| {
                    BinaryError::ParseError(format!("count {}.{} is not decoded", field, bits))
                })?;
                Some(n as usize)
            },
            Count::ToEnd => None,
        };

        let scratch = Content::new();
        let mut items = Vec::new();
        match count {
            Some(n) => {
                for _ in 0..n {
                    items.push(self.kind(elem, &scratch)?);
                }
            },
            None => {
                // Whole elements until the payload runs out.
                while !self.ctx.cursor.is_empty() {
                    let start = self.ctx.cursor.position();
                    match self.kind(elem, &scratch) {
                        Ok(item) => items.push(item),
                        Err(_) => {
                            self.ctx.cursor.rewind(start);
                            break;
                        },
                    }
                }
            },
        }
        Ok(Value::List(items))
    }
}

fn flag_bits(content: &Content, field: &str, name: &str) -> Option<u32> {
    content.flags(field)?.get(name).ok()
}

fn count_value(value: Option<i64>, name: &str) -> BinaryResult<usize> {
    match value {
        Some(n) if n >= 0 => Ok(n as usize),
        Some(n) => Err(BinaryError::ParseError(format!("negative count {} = {}", name, n))),
        None => Err(BinaryError::ParseError(format!("count {} is not decoded", name))),
    }
}

/// Read a primitive as a value.
pub fn read_prim(cursor: &mut ByteCursor<'_>, prim: Prim) -> BinaryResult<Value> {
    Ok(match prim {
        Prim::U8 => Value::Int(cursor.read_u8()? as i64),
        Prim::I8 => Value::Int(cursor.read_i8()? as i64),
        Prim::U16 => Value::Int(cursor.read_u16()? as i64),
        Prim::I16 | Prim::HwpUnit16 => Value::Int(cursor.read_i16()? as i64),
        Prim::U32 | Prim::ColorRef | Prim::HwpUnit => Value::Int(cursor.read_u32()? as i64),
        Prim::I32 | Prim::SHwpUnit => Value::Int(cursor.read_i32()? as i64),
        Prim::WChar => Value::Str(cursor.read_wchar()?),
        Prim::Bstr => Value::Str(cursor.read_bstr()?),
        Prim::Chid => Value::Str(cursor.read_chid()?),
    })
}

/// Read an integer primitive as the raw word of a flags or enum value.
fn read_unsigned(cursor: &mut ByteCursor<'_>, prim: Prim) -> BinaryResult<u32> {
    match prim {
        Prim::U8 => Ok(cursor.read_u8()? as u32),
        Prim::I8 => Ok(cursor.read_i8()? as u8 as u32),
        Prim::U16 => Ok(cursor.read_u16()? as u32),
        Prim::I16 | Prim::HwpUnit16 => Ok(cursor.read_i16()? as u16 as u32),
        Prim::U32 | Prim::I32 | Prim::ColorRef | Prim::HwpUnit | Prim::SHwpUnit => cursor.read_u32(),
        Prim::WChar | Prim::Bstr | Prim::Chid => Err(BinaryError::ParseError(format!(
            "{:?} is not an integer encoding",
            prim
        ))),
    }
}
