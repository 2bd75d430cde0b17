pub(crate) mod buffers;
pub(crate) mod chunks;
mod delete;
pub(crate) mod history;
pub(crate) mod list;
pub(crate) mod piece;
pub(crate) mod range;

use crate::error::EditError;
use crate::options::Options;

use self::buffers::{BufferId, Buffers};
use self::chunks::Chunks;
use self::history::{Change, EditKind, EventStack, Frame, LastEdit};
use self::list::{corrupted, PieceList};
use self::piece::{Piece, PieceId};
use self::range::{PieceRange, Run, Span};

/// Text is stored in append only buffers. The document is a doubly linked
/// list of pieces, each referencing a part of one buffer. Edits never
/// modify stored text, they only relink pieces.
///
/// Every edit records the pieces it replaced on the undo stack. Undo and
/// redo swap the stored pieces back into the list, so they never touch the
/// buffers. Adjacent edits of the same kind are merged into one undo frame,
/// typing a word and undoing it removes the whole word.
///
/// Each undo frame may carry metadata `M` given by the caller, for example
/// a cursor position to restore.
///
/// All positions and lengths are in characters.
#[derive(Debug)]
pub struct PieceTable<M = ()> {
    options: Options,
    buffers: Buffers,
    list: PieceList,
    len: usize,

    undo: EventStack<M>,
    redo: EventStack<M>,
    last: LastEdit,
    /// Undo stack depth the document was last marked clean at
    clean: Option<usize>,
}

impl PieceTable {
    /// Create a new empty document
    #[inline]
    pub fn new() -> PieceTable {
        PieceTable::with_options(Options::default())
    }
}

impl<M> PieceTable<M> {
    #[inline]
    pub fn with_options(options: Options) -> PieceTable<M> {
        PieceTable {
            buffers: Buffers::new(options.add_buffer_slack),
            options,
            list: PieceList::new(),
            len: 0,
            undo: EventStack::new(),
            redo: EventStack::new(),
            last: LastEdit::Sentinel,
            clean: Some(0),
        }
    }

    /// Replace the document with `text`. History and buffers are dropped,
    /// options are kept.
    pub fn init(&mut self, text: &str) {
        let len = text.chars().count();
        log::debug!("Initializing document with {len} characters");

        *self = PieceTable::with_options(self.options.clone());

        if len != 0 {
            let buf = self.buffers.import_original(text, len);
            let id = self.list.alloc(Piece::new(buf, 0, len));
            let mut run = Run::default();
            run.push(&mut self.list, id);
            self.list.splice(
                Span::Boundary {
                    before: PieceId::HEAD,
                    after: PieceId::TAIL,
                },
                run,
            );
        }

        self.len = len;
    }

    /// Insert `text` at `index`
    #[inline]
    pub fn insert(&mut self, index: usize, text: &str) -> Result<(), EditError> {
        self.insert_impl(index, text, None)
    }

    /// Insert `text` at `index`, attaching `meta` to the undo frame if this
    /// edit opens a new one.
    #[inline]
    pub fn insert_with(&mut self, index: usize, text: &str, meta: M) -> Result<(), EditError> {
        self.insert_impl(index, text, Some(meta))
    }

    /// Delete `len` characters starting at `index`
    #[inline]
    pub fn delete(&mut self, index: usize, len: usize) -> Result<(), EditError> {
        self.delete_checked(index, len, None)
    }

    /// Delete `len` characters starting at `index`, attaching `meta` to the
    /// undo frame if this edit opens a new one.
    #[inline]
    pub fn delete_with(&mut self, index: usize, len: usize, meta: M) -> Result<(), EditError> {
        self.delete_checked(index, len, Some(meta))
    }

    /// Undo the latest undo frame. Returns the edit that was undone, or
    /// `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<Change<'_, M>> {
        let mut frame = self.undo.pop()?;
        self.last = LastEdit::Sentinel;
        self.restore_frame(&mut frame);
        log::trace!(
            "Undo {:?} at {} ({} chars), size now {}",
            frame.kind,
            frame.range.index,
            frame.range.len,
            self.len
        );

        self.redo.push(frame);
        self.redo.last().map(Change::of)
    }

    /// Redo the latest undone frame. Returns the edit that was redone, or
    /// `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<Change<'_, M>> {
        let mut frame = self.redo.pop()?;
        self.last = LastEdit::Sentinel;
        self.restore_frame(&mut frame);
        log::trace!(
            "Redo {:?} at {} ({} chars), size now {}",
            frame.kind,
            frame.range.index,
            frame.range.len,
            self.len
        );

        self.undo.push(frame);
        self.undo.last().map(Change::of)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Make the next edit start a new undo frame
    #[inline]
    pub fn create_undo_point(&mut self) {
        self.last = LastEdit::Sentinel;
    }

    /// Whether the document has changed since it was last marked clean
    pub fn is_dirty(&self) -> bool {
        self.clean != Some(self.undo.len())
    }

    /// Mark the current state as clean, for example after saving. Undoing
    /// or redoing back to this state makes the document clean again.
    pub fn mark_clean(&mut self) {
        self.clean = Some(self.undo.len());
        self.last = LastEdit::Sentinel;
    }

    /// Document length in characters
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pieces the document consists of
    pub fn piece_count(&self) -> usize {
        self.list.count()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Copy at most `len` characters starting at `index`. The range is
    /// clamped to the document.
    pub fn render(&self, index: usize, len: usize) -> String {
        if index >= self.len || len == 0 {
            return String::new();
        }

        let mut remaining = len.min(self.len - index);
        let mut result = String::with_capacity(remaining);
        let mut chunks = self.chunks_at(index);
        let mut current = chunks.get();

        while let Some((pos, chunk)) = current {
            let chars = chunk.as_chars();
            let start = index.saturating_sub(pos);
            let end = chars.len().min(start + remaining);
            result.extend(&chars[start..end]);
            remaining -= end - start;

            if remaining == 0 {
                break;
            }

            current = chunks.next();
        }

        result
    }

    #[inline]
    pub fn chunks(&self) -> Chunks<'_> {
        self.chunks_at(0)
    }

    /// Chunks starting from the piece containing `pos`
    #[inline]
    pub fn chunks_at(&self, pos: usize) -> Chunks<'_> {
        Chunks::new(&self.list, &self.buffers, pos)
    }

    fn insert_impl(&mut self, index: usize, text: &str, meta: Option<M>) -> Result<(), EditError> {
        if index > self.len {
            log::trace!("Rejected insert at {index}, size {}", self.len);
            return Err(EditError::InvalidIndex {
                index,
                size: self.len,
            });
        }

        self.clear_redo();

        let len = text.chars().count();
        if len == 0 {
            return Ok(());
        }

        let (pd, pd_index) = self.list.locate(index);
        let (buf, pos) = self.buffers.import(text, len).location();

        let offset = index - pd_index;
        let piece = match self.extendable(offset, index, pd, buf, pos) {
            Some(prev) => {
                self.list.get_mut(prev).len += len;
                let Some(frame) = self.undo.last_mut() else {
                    corrupted("coalesced insert without an undo frame");
                };
                frame.range.len += len;
                prev
            }
            None if offset == 0 => {
                // Between two pieces
                let id = self.list.alloc(Piece::new(buf, pos, len));
                let mut run = Run::default();
                run.push(&mut self.list, id);

                let span = Span::Boundary {
                    before: self.list.prev(pd),
                    after: pd,
                };
                self.list.splice(span, run);
                self.push_frame(EditKind::Insert, span, index, len, meta);
                id
            }
            None => {
                // Split the piece in two and place the text between
                let (head, tail) = {
                    let piece = self.list.get(pd);
                    (piece.head(offset), piece.tail(offset))
                };
                let head = self.list.alloc(head);
                let id = self.list.alloc(Piece::new(buf, pos, len));
                let tail = self.list.alloc(tail);

                let mut run = Run::default();
                run.push(&mut self.list, head);
                run.push(&mut self.list, id);
                run.push(&mut self.list, tail);

                let span = Span::Chain {
                    first: pd,
                    last: pd,
                };
                self.list.splice(span, run);
                self.push_frame(EditKind::Insert, span, index, len, meta);
                id
            }
        };

        self.len += len;
        self.last = LastEdit::Insert {
            end: index + len,
            piece,
        };
        Ok(())
    }

    /// Returns the piece the inserted text can be appended to. This is the
    /// case when the text continues the previous insert both in the
    /// document and in the add buffer.
    fn extendable(
        &self,
        offset: usize,
        index: usize,
        pd: PieceId,
        buf: BufferId,
        pos: usize,
    ) -> Option<PieceId> {
        if !self.options.coalesce || offset != 0 {
            return None;
        }

        let LastEdit::Insert { end, piece } = self.last else {
            return None;
        };

        if end != index || self.list.prev(pd) != piece {
            return None;
        }

        let prev = self.list.get(piece);
        (prev.buf == buf && prev.end() == pos).then_some(piece)
    }

    fn delete_checked(&mut self, index: usize, len: usize, meta: Option<M>) -> Result<(), EditError> {
        let valid = len != 0
            && index
                .checked_add(len)
                .map_or(false, |end| end <= self.len);

        if !valid {
            log::trace!("Rejected delete of {len} at {index}, size {}", self.len);
            return Err(EditError::InvalidRange {
                index,
                len,
                size: self.len,
            });
        }

        self.delete_impl(index, len, meta);
        Ok(())
    }

    /// Record a new undo frame. Called before the document length is
    /// updated.
    fn push_frame(
        &mut self,
        kind: EditKind,
        span: Span,
        index: usize,
        len: usize,
        meta: Option<M>,
    ) {
        self.undo.push(Frame {
            kind,
            range: PieceRange {
                span,
                seq_len: self.len,
                index,
                len,
            },
            meta,
        });
    }

    /// Swap the frame contents with the live document
    fn restore_frame(&mut self, frame: &mut Frame<M>) {
        frame.range.span = self.list.restore(frame.range.span);
        std::mem::swap(&mut frame.range.seq_len, &mut self.len);
    }

    /// Drop all redo frames. Pieces only they reference are released.
    fn clear_redo(&mut self) {
        if self.redo.is_empty() {
            return;
        }

        for frame in self.redo.take() {
            if let Span::Chain { first, last } = frame.range.span {
                self.list.release_chain(first, last);
            }
        }
        log::trace!(
            "Dropped redo history, {} pieces allocated",
            self.list.allocated()
        );

        if matches!(self.clean, Some(clean) if clean > self.undo.len()) {
            self.clean = None;
        }
    }

    /// Panics if the piece list is inconsistent with the document length
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut total = 0;
        let mut prev = PieceId::HEAD;
        let mut id = self.list.first();

        while id != PieceId::TAIL {
            let piece = self.list.get(id);
            assert!(piece.len > 0, "empty piece in document");
            assert_eq!(Some(prev), piece.prev, "broken prev link");
            total += piece.len;
            prev = id;
            id = self.list.next(id);
        }

        assert_eq!(Some(prev), self.list.get(PieceId::TAIL).prev);
        assert_eq!(self.len, total, "document length mismatch");
    }
}

impl<M> Default for PieceTable<M> {
    fn default() -> Self {
        PieceTable::with_options(Options::default())
    }
}

impl<M> From<&str> for PieceTable<M> {
    fn from(text: &str) -> Self {
        let mut pt = PieceTable::default();
        pt.init(text);
        pt
    }
}

impl<M> From<&PieceTable<M>> for String {
    fn from(pt: &PieceTable<M>) -> Self {
        pt.render(0, pt.size())
    }
}
