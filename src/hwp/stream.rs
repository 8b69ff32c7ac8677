//! Lazy, indexable view over the models of one record stream.
//!
//! Models are decoded only as far as a consumer asks for them and are
//! cached by sequence number, so random access never decodes a record
//! twice. Once the record source is exhausted (or fails) it is dropped.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;
use std::sync::Arc;

use crate::common::{Error, Result, Version};
use crate::hwp::binmodel::controls::verify_registry;
use crate::hwp::binmodel::{Model, ModelParser};
use crate::hwp::record::{Record, RecordReader};
use crate::hwp::treeop::{PrefixEvents, TreeEvent};

struct StreamState<R: Read> {
    /// `None` once the source is exhausted or failed
    parser: Option<ModelParser<RecordReader<R>>>,
    models: Vec<Arc<Model>>,
    failure: Option<Error>,
}

/// Models of one logical stream (`DocInfo`, `BodyText/Section0`, ...).
///
/// The cache is single-threaded; separate streams may be decoded on
/// separate threads.
///
/// ```
/// use hwpmodel::hwp::stream::ModelStream;
/// use hwpmodel::hwp::binmodel::ModelType;
/// use hwpmodel::Version;
///
/// let data: &[u8] = b"\x12\x04\xc0\x00\x01\x00\x02\x00\x03\x00j\x00p\x00g\x00";
/// let stream = ModelStream::new(data, Version::new(5, 0, 1, 7))?;
/// assert_eq!(stream.model(0)?.model_type, ModelType::BinData);
/// assert!(stream.model(1).is_err());
/// # Ok::<(), hwpmodel::Error>(())
/// ```
pub struct ModelStream<R: Read> {
    version: Version,
    state: RefCell<StreamState<R>>,
}

impl<R: Read> ModelStream<R> {
    pub fn new(reader: R, version: Version) -> Result<Self> {
        verify_registry()?;
        Ok(Self {
            version,
            state: RefCell::new(StreamState {
                parser: Some(ModelParser::new(version, RecordReader::new(reader))),
                models: Vec::new(),
                failure: None,
            }),
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Decode until model `n` is cached. `Ok(false)` when the stream ends
    /// before it.
    fn fill_to(&self, n: usize) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        while state.models.len() <= n {
            if let Some(failure) = &state.failure {
                return Err(failure.replay());
            }
            let Some(parser) = state.parser.as_mut() else {
                return Ok(false);
            };
            match parser.next() {
                Some(Ok(model)) => state.models.push(model),
                Some(Err(e)) => {
                    let reported = e.replay();
                    state.failure = Some(e);
                    state.parser = None;
                    return Err(reported);
                },
                None => state.parser = None,
            }
        }
        Ok(true)
    }

    /// Model with sequence number `n`.
    pub fn model(&self, n: usize) -> Result<Arc<Model>> {
        if self.fill_to(n)? {
            Ok(Arc::clone(&self.state.borrow().models[n]))
        } else {
            Err(Error::IndexOutOfRange {
                index: n,
                len: self.state.borrow().models.len(),
            })
        }
    }

    /// Record with sequence number `n`.
    pub fn record(&self, n: usize) -> Result<Record> {
        Ok(self.model(n)?.record.clone())
    }

    /// Number of models, decoding the whole stream.
    pub fn len(&self) -> Result<usize> {
        self.fill_to(usize::MAX)?;
        Ok(self.state.borrow().models.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(!self.fill_to(0)?)
    }

    /// Models in stream order. Each call starts over from the cache.
    pub fn models(&self) -> Models<'_, R> {
        Models {
            stream: self,
            next: 0,
            done: false,
        }
    }

    /// Models grouped by top-level entity: each group is a level 0 model
    /// followed by its descendants, read as the group is iterated.
    pub fn models_treegrouped(&self) -> TreeGroups<'_, R> {
        TreeGroups {
            cursor: Rc::new(RefCell::new(GroupCursor {
                events: PrefixEvents::new(self.models().map(leveled as Leveled)),
                pending: None,
                generation: 0,
            })),
        }
    }

    /// Fragments of one JSON array holding every model.
    pub fn models_json(&self) -> JsonFragments<'_, R> {
        JsonFragments {
            models: self.models(),
            state: JsonState::Open,
        }
    }

    /// Stream the JSON array of [`ModelStream::models_json`] into `writer`.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        for fragment in self.models_json() {
            writer.write_all(fragment?.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Restartable model iterator of a [`ModelStream`].
pub struct Models<'s, R: Read> {
    stream: &'s ModelStream<R>,
    next: usize,
    done: bool,
}

impl<R: Read> Iterator for Models<'_, R> {
    type Item = Result<Arc<Model>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.fill_to(self.next) {
            Ok(true) => {
                let model = Arc::clone(&self.stream.state.borrow().models[self.next]);
                self.next += 1;
                Some(Ok(model))
            },
            Ok(false) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = e.is_fatal_to_stream();
                Some(Err(e))
            },
        }
    }
}

type Leveled = fn(Result<Arc<Model>>) -> Result<(u32, Arc<Model>)>;

fn leveled(model: Result<Arc<Model>>) -> Result<(u32, Arc<Model>)> {
    model.map(|m| (m.level as u32, m))
}

/// Position shared by a [`TreeGroups`] iterator and the groups it hands out.
struct GroupCursor<'s, R: Read> {
    events: PrefixEvents<std::iter::Map<Models<'s, R>, Leveled>, Arc<Model>>,
    /// Leader read while finishing the previous group
    pending: Option<Arc<Model>>,
    /// Groups started so far; a group from an older generation is over
    generation: usize,
}

enum GroupStep {
    Leader(Arc<Model>),
    Member(Arc<Model>),
    Failed(Error),
    End,
}

impl<R: Read> GroupCursor<'_, R> {
    fn step(&mut self) -> GroupStep {
        loop {
            match self.events.next() {
                None => return GroupStep::End,
                Some(Ok((TreeEvent::Enter, model))) if self.events.depth() == 1 => {
                    if model.level == 0 {
                        return GroupStep::Leader(model);
                    }
                    tracing::warn!(
                        seqno = model.seqno,
                        level = model.level,
                        "model before the first top-level model skipped"
                    );
                },
                Some(Ok((TreeEvent::Enter, model))) => return GroupStep::Member(model),
                Some(Ok((TreeEvent::Exit, _))) => {},
                Some(Err(e)) => return GroupStep::Failed(e),
            }
        }
    }
}

/// Iterator of [`ModelGroup`]s, one per level 0 model.
pub struct TreeGroups<'s, R: Read> {
    cursor: Rc<RefCell<GroupCursor<'s, R>>>,
}

impl<'s, R: Read> Iterator for TreeGroups<'s, R> {
    type Item = Result<ModelGroup<'s, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut cursor = self.cursor.borrow_mut();
        let leader = match cursor.pending.take() {
            Some(leader) => leader,
            None => loop {
                match cursor.step() {
                    GroupStep::Leader(leader) => break leader,
                    // left unread by the previous group, or below an orphan
                    GroupStep::Member(_) => {},
                    GroupStep::Failed(e) => return Some(Err(e)),
                    GroupStep::End => return None,
                }
            },
        };
        cursor.generation += 1;
        Some(Ok(ModelGroup {
            leader,
            cursor: Rc::clone(&self.cursor),
            generation: cursor.generation,
            started: false,
            done: false,
        }))
    }
}

/// A level 0 model followed lazily by its descendants.
///
/// The group reads from the same position as the [`TreeGroups`] it came
/// from. Once the next group is requested, members not read yet are
/// skipped and this group ends.
pub struct ModelGroup<'s, R: Read> {
    leader: Arc<Model>,
    cursor: Rc<RefCell<GroupCursor<'s, R>>>,
    generation: usize,
    started: bool,
    done: bool,
}

impl<R: Read> ModelGroup<'_, R> {
    pub fn leader(&self) -> &Arc<Model> {
        &self.leader
    }
}

impl<R: Read> Iterator for ModelGroup<'_, R> {
    type Item = Result<Arc<Model>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Ok(Arc::clone(&self.leader)));
        }
        let mut cursor = self.cursor.borrow_mut();
        if cursor.generation != self.generation || cursor.pending.is_some() {
            self.done = true;
            return None;
        }
        match cursor.step() {
            GroupStep::Member(model) => Some(Ok(model)),
            GroupStep::Leader(leader) => {
                cursor.pending = Some(leader);
                self.done = true;
                None
            },
            GroupStep::Failed(e) => {
                self.done = true;
                Some(Err(e))
            },
            GroupStep::End => {
                self.done = true;
                None
            },
        }
    }
}

enum JsonState {
    Open,
    First,
    Rest,
    Done,
}

/// Text fragments that concatenate to a JSON array of models.
pub struct JsonFragments<'s, R: Read> {
    models: Models<'s, R>,
    state: JsonState,
}

impl<R: Read> Iterator for JsonFragments<'_, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            JsonState::Open => {
                self.state = JsonState::First;
                Some(Ok("[".to_string()))
            },
            JsonState::First | JsonState::Rest => match self.models.next() {
                Some(Ok(model)) => {
                    let separator = matches!(self.state, JsonState::Rest);
                    self.state = JsonState::Rest;
                    Some(serde_json::to_string(&*model).map_err(Error::from).map(|json| {
                        if separator { format!(",{}", json) } else { json }
                    }))
                },
                Some(Err(e)) => {
                    self.state = JsonState::Done;
                    Some(Err(e))
                },
                None => {
                    self.state = JsonState::Done;
                    Some(Ok("]".to_string()))
                },
            },
            JsonState::Done => None,
        }
    }
}
