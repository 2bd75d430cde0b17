use super::history::{EditKind, LastEdit};
use super::list::corrupted;
use super::piece::PieceId;
use super::range::Run;
use super::PieceTable;

/// Result of removing a range of characters from the live list
#[derive(Debug, Default)]
struct Consumed {
    /// Pieces taken out of the document
    removed: Run,
    /// Leftover of the first piece, before the removed text
    frag1: Option<PieceId>,
    /// Leftover of the last piece, after the removed text
    frag2: Option<PieceId>,
}

impl<M> PieceTable<M> {
    /// Remove `len` characters at `index`. The range is validated already.
    pub(super) fn delete_impl(&mut self, index: usize, len: usize, meta: Option<M>) {
        self.clear_redo();

        let last = self.last;
        match last {
            LastEdit::Delete {
                index: lindex,
                frag1,
                frag2,
            } if self.options.coalesce && index == lindex => {
                self.delete_forward(index, len, frag1, frag2)
            }
            LastEdit::Delete {
                index: lindex,
                frag1,
                frag2,
            } if self.options.coalesce && index + len == lindex => {
                self.delete_backward(index, len, frag1, frag2)
            }
            _ => self.delete_general(index, len, meta),
        }

        self.len -= len;
    }

    fn delete_general(&mut self, index: usize, len: usize, meta: Option<M>) {
        let consumed = self.consume(index, len);
        self.push_frame(EditKind::Delete, consumed.removed.chain(), index, len, meta);
        self.last = LastEdit::Delete {
            index,
            frag1: consumed.frag1,
            frag2: consumed.frag2,
        };
    }

    /// Delete continuing after the previous delete, like pressing delete
    /// repeatedly. The text starts where `frag2` is, if it exists.
    fn delete_forward(
        &mut self,
        index: usize,
        len: usize,
        frag1: Option<PieceId>,
        frag2: Option<PieceId>,
    ) {
        let mut remaining = len;
        let mut frag2 = frag2;

        if let Some(id) = frag2 {
            let piece = self.list.get_mut(id);
            if len < piece.len {
                piece.pos += len;
                piece.len -= len;
                remaining = 0;
            } else {
                remaining -= piece.len;
                self.discard(id);
                frag2 = None;
            }
        }

        let frame = match self.undo.last_mut() {
            Some(frame) if frame.kind == EditKind::Delete => frame,
            _ => corrupted("coalesced delete without a delete frame"),
        };
        frame.range.len += len;

        if remaining > 0 {
            let consumed = self.consume(index, remaining);
            debug_assert!(consumed.frag1.is_none());
            frag2 = consumed.frag2;

            let Some(frame) = self.undo.last_mut() else {
                corrupted("coalesced delete without a delete frame");
            };
            frame.range.span = frame.range.span.append(&mut self.list, consumed.removed);
        }

        self.last = LastEdit::Delete {
            index,
            frag1,
            frag2,
        };
    }

    /// Delete ending where the previous delete started, like pressing
    /// backspace repeatedly. The text ends where `frag1` ends, if it exists.
    fn delete_backward(
        &mut self,
        index: usize,
        len: usize,
        frag1: Option<PieceId>,
        frag2: Option<PieceId>,
    ) {
        let mut remaining = len;
        let mut frag1 = frag1;

        if let Some(id) = frag1 {
            let piece = self.list.get_mut(id);
            if len < piece.len {
                piece.len -= len;
                remaining = 0;
            } else {
                remaining -= piece.len;
                self.discard(id);
                frag1 = None;
            }
        }

        if remaining > 0 {
            let consumed = self.consume(index, remaining);
            debug_assert!(consumed.frag2.is_none());
            frag1 = consumed.frag1;

            let Some(frame) = self.undo.last_mut() else {
                corrupted("coalesced delete without a delete frame");
            };
            frame.range.span = frame.range.span.prepend(&mut self.list, consumed.removed);
        }

        let frame = match self.undo.last_mut() {
            Some(frame) if frame.kind == EditKind::Delete => frame,
            _ => corrupted("coalesced delete without a delete frame"),
        };
        frame.range.index = index;
        frame.range.len += len;

        self.last = LastEdit::Delete {
            index,
            frag1,
            frag2,
        };
    }

    /// Take a fragment created by the current frame out of the document.
    /// Nothing else references it, so its slot is released.
    fn discard(&mut self, id: PieceId) {
        self.list.unlink(id);
        self.list.release(id);
    }

    /// Remove `len` characters starting at `index` from the live list.
    /// Partially removed pieces are replaced by fragments holding the
    /// remaining characters.
    fn consume(&mut self, index: usize, len: usize) -> Consumed {
        let (mut pd, pd_index) = self.list.locate(index);
        let mut offset = index - pd_index;
        let mut remaining = len;
        let mut inserted = Run::default();
        let mut result = Consumed::default();

        while remaining > 0 {
            if pd == PieceId::TAIL {
                corrupted("deleted past the end of the document");
            }

            let piece = self.list.get(pd).clone();
            let next = self.list.next(pd);

            if offset != 0 {
                let id = self.list.alloc(piece.head(offset));
                inserted.push(&mut self.list, id);
                result.frag1 = Some(id);
            }

            let available = piece.len - offset;
            if remaining < available {
                let id = self.list.alloc(piece.tail(offset + remaining));
                inserted.push(&mut self.list, id);
                result.frag2 = Some(id);
            }

            remaining -= remaining.min(available);
            result.removed.push(&mut self.list, pd);
            offset = 0;
            pd = next;
        }

        self.list.splice(result.removed.chain(), inserted);
        result
    }
}
