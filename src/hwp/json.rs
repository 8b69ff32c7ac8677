//! JSON form of decoded models.
//!
//! ```text
//! {"type": "TableBody", "tagid": 77, "level": 2, "seqno": 2, "size": 26,
//!  "content": {...}, "payload": ["4d 08 ..."], "unparsed": ["..."]}
//! ```
//!
//! `unparsed` appears only when some payload bytes were not decoded.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::common::Result;
use crate::common::binary::hex_lines;
use crate::hwp::binmodel::Model;

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_unparsed = !self.unparsed.is_empty();
        let mut state = serializer.serialize_struct("Model", if has_unparsed { 8 } else { 7 })?;
        state.serialize_field("type", self.model_type.name())?;
        state.serialize_field("tagid", &self.record.tag_id)?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("seqno", &self.seqno)?;
        state.serialize_field("size", &self.record.size())?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("payload", &hex_lines(&self.record.payload))?;
        if has_unparsed {
            state.serialize_field("unparsed", &hex_lines(&self.unparsed))?;
        } else {
            state.skip_field("unparsed")?;
        }
        state.end()
    }
}

/// One model as compact JSON text.
pub fn model_to_json(model: &Model) -> Result<String> {
    Ok(serde_json::to_string(model)?)
}
