//! Per-record parse state and the state containers share with children.

use super::{Model, ModelType};
use crate::common::Version;
use crate::common::binary::ByteCursor;
use crate::hwp::record::Record;

/// State a container model keeps while its children are parsed.
///
/// Created when the container is entered and dropped when it is exited,
/// so facts recorded by one child are visible to later siblings only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContainerState {
    #[default]
    Leaf,
    Table(TableParseState),
}

/// Children seen so far by a table control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableParseState {
    pub body_seen: bool,
}

impl ContainerState {
    pub fn table(&self) -> Option<&TableParseState> {
        match self {
            ContainerState::Table(state) => Some(state),
            ContainerState::Leaf => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TableParseState> {
        match self {
            ContainerState::Table(state) => Some(state),
            ContainerState::Leaf => None,
        }
    }
}

/// The parent of the record being parsed.
pub struct Parent<'a> {
    pub model: &'a Model,
    pub state: &'a mut ContainerState,
}

impl<'a> Parent<'a> {
    pub fn new(model: &'a Model, state: &'a mut ContainerState) -> Self {
        Self { model, state }
    }

    pub fn model_type(&self) -> ModelType {
        self.model.model_type
    }
}

/// Everything one record decode needs.
pub struct ParseContext<'a> {
    pub version: Version,
    pub record: &'a Record,
    pub cursor: ByteCursor<'a>,
    pub parent: Option<Parent<'a>>,
}

impl<'a> ParseContext<'a> {
    pub fn new(version: Version, record: &'a Record, parent: Option<Parent<'a>>) -> Self {
        Self {
            version,
            record,
            cursor: ByteCursor::new(&record.payload),
            parent,
        }
    }

    pub fn parent_type(&self) -> Option<ModelType> {
        self.parent.as_ref().map(Parent::model_type)
    }

    /// Integer field of the parent model's content.
    pub fn parent_int(&self, name: &str) -> Option<i64> {
        self.parent.as_ref()?.model.content.int(name)
    }
}
