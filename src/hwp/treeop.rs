//! Tree reconstruction from level-annotated sequences.
//!
//! HWP records carry no parent pointers, only a nesting level. Walking a
//! flat `(level, item)` sequence with a stack of open items yields the
//! pre/post-order events of the implied tree.

use std::convert::Infallible;

use smallvec::SmallVec;

/// Event kind of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeEvent {
    Enter,
    Exit,
}

/// Lazy ENTER/EXIT event iterator over a fallible `(level, item)` source.
///
/// Every item produces exactly one ENTER and one EXIT. An item is exited
/// once an item with the same or a lower level arrives, or when the input
/// ends. An error from the source is passed through and ends the walk
/// without closing the open items.
pub struct PrefixEvents<I, T> {
    source: I,
    stack: SmallVec<[(u32, T); 16]>,
    pending: Option<(u32, T)>,
    exhausted: bool,
}

impl<I, T, E> PrefixEvents<I, T>
where
    I: Iterator<Item = Result<(u32, T), E>>,
{
    pub fn new(source: I) -> Self {
        Self {
            source,
            stack: SmallVec::new(),
            pending: None,
            exhausted: false,
        }
    }

    /// Number of items entered but not yet exited.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<I, T, E> Iterator for PrefixEvents<I, T>
where
    I: Iterator<Item = Result<(u32, T), E>>,
    T: Clone,
{
    type Item = Result<(TreeEvent, T), E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((level, _)) = &self.pending {
                let level = *level;
                if let Some((top, _)) = self.stack.last()
                    && *top >= level
                {
                    let (_, item) = self.stack.pop()?;
                    return Some(Ok((TreeEvent::Exit, item)));
                }
                let (level, item) = self.pending.take()?;
                self.stack.push((level, item.clone()));
                return Some(Ok((TreeEvent::Enter, item)));
            }

            if self.exhausted {
                return self
                    .stack
                    .pop()
                    .map(|(_, item)| Ok((TreeEvent::Exit, item)));
            }

            match self.source.next() {
                Some(Ok(entry)) => self.pending = Some(entry),
                Some(Err(e)) => {
                    self.exhausted = true;
                    self.stack.clear();
                    return Some(Err(e));
                },
                None => self.exhausted = true,
            }
        }
    }
}

/// Events over an infallible `(level, item)` sequence.
///
/// ```
/// use hwpmodel::hwp::treeop::{prefix_events, TreeEvent::*};
///
/// let events: Vec<_> = prefix_events([(0, 'a'), (1, 'b'), (0, 'c')]).collect();
/// assert_eq!(
///     events,
///     [(Enter, 'a'), (Enter, 'b'), (Exit, 'b'), (Exit, 'a'), (Enter, 'c'), (Exit, 'c')]
/// );
/// ```
pub fn prefix_events<T, I>(items: I) -> impl Iterator<Item = (TreeEvent, T)>
where
    I: IntoIterator<Item = (u32, T)>,
    T: Clone,
{
    PrefixEvents::new(items.into_iter().map(Ok::<_, Infallible>)).map(|event| match event {
        Ok(event) => event,
        Err(never) => match never {},
    })
}
