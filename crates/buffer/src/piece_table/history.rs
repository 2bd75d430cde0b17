use super::piece::PieceId;
use super::range::PieceRange;

/// Kind of edit an undo or redo frame was created by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Delete,
}

/// One undoable step. Multiple coalesced edits share a frame.
#[derive(Debug)]
pub(crate) struct Frame<M> {
    pub(crate) kind: EditKind,
    pub(crate) range: PieceRange,
    /// Metadata given by the edit that opened this frame
    pub(crate) meta: Option<M>,
}

/// Edit restored by an undo or redo
#[derive(Debug, PartialEq, Eq)]
pub struct Change<'a, M> {
    /// Kind of the original edit
    pub kind: EditKind,
    /// Document position the edit affected
    pub index: usize,
    /// Number of characters inserted or deleted
    pub len: usize,
    /// Metadata attached to the edit, if any
    pub meta: Option<&'a M>,
}

impl<'a, M> Change<'a, M> {
    pub(crate) fn of(frame: &'a Frame<M>) -> Change<'a, M> {
        Change {
            kind: frame.kind,
            index: frame.range.index,
            len: frame.range.len,
            meta: frame.meta.as_ref(),
        }
    }
}

/// Undo or redo history
#[derive(Debug)]
pub(crate) struct EventStack<M> {
    frames: Vec<Frame<M>>,
}

impl<M> EventStack<M> {
    pub fn new() -> EventStack<M> {
        EventStack { frames: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: Frame<M>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame<M>> {
        self.frames.pop()
    }

    pub fn last(&self) -> Option<&Frame<M>> {
        self.frames.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Frame<M>> {
        self.frames.last_mut()
    }

    /// Remove all frames, returning them oldest first
    pub fn take(&mut self) -> Vec<Frame<M>> {
        std::mem::take(&mut self.frames)
    }
}

/// The previous edit, used to decide whether the next one can be merged
/// into the same undo frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LastEdit {
    /// Next edit always opens a new frame
    Sentinel,
    /// Text was inserted into `piece`, ending at document position `end`
    Insert { end: usize, piece: PieceId },
    /// Text was removed at `index`. Fragments are the pieces left over on
    /// each side of the removed text, if the removal split a piece.
    Delete {
        index: usize,
        frag1: Option<PieceId>,
        frag2: Option<PieceId>,
    },
}
