use super::list::{corrupted, PieceList};
use super::piece::PieceId;

/// A run of pieces linked to each other, being moved into or out of the
/// document.
///
/// Pushing pieces that are already adjacent in the document does not change
/// any links, so a run of removed pieces keeps its outer links pointing to
/// the document neighbours it was removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Run {
    ends: Option<(PieceId, PieceId)>,
}

impl Run {
    /// Add a piece to the end of the run
    pub fn push(&mut self, list: &mut PieceList, id: PieceId) {
        self.ends = match self.ends {
            None => Some((id, id)),
            Some((first, last)) => {
                list.link(last, id);
                Some((first, id))
            }
        };
    }

    pub fn ends(&self) -> Option<(PieceId, PieceId)> {
        self.ends
    }

    /// The removed part of the document as a stored chain
    pub fn chain(&self) -> Span {
        match self.ends {
            Some((first, last)) => Span::Chain { first, last },
            None => corrupted("expected a non empty run"),
        }
    }
}

/// What an undo or redo frame holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span {
    /// Nothing was removed. The two pieces are the document neighbours the
    /// content was placed between.
    Boundary { before: PieceId, after: PieceId },
    /// A detached chain of pieces. `first.prev` and `last.next` still point
    /// to the document neighbours the chain was removed from.
    Chain { first: PieceId, last: PieceId },
}

impl Span {
    /// Link a removed run after this chain
    pub fn append(self, list: &mut PieceList, run: Run) -> Span {
        let Some((rfirst, rlast)) = run.ends() else {
            return self;
        };

        match self {
            Span::Chain { first, last } => {
                list.link(last, rfirst);
                Span::Chain { first, last: rlast }
            }
            Span::Boundary { .. } => Span::Chain {
                first: rfirst,
                last: rlast,
            },
        }
    }

    /// Link a removed run before this chain
    pub fn prepend(self, list: &mut PieceList, run: Run) -> Span {
        let Some((rfirst, rlast)) = run.ends() else {
            return self;
        };

        match self {
            Span::Chain { first, last } => {
                list.link(rlast, first);
                Span::Chain { first: rfirst, last }
            }
            Span::Boundary { .. } => Span::Chain {
                first: rfirst,
                last: rlast,
            },
        }
    }
}

/// A range of the document that was replaced by an edit, and the
/// information needed to put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PieceRange {
    pub(crate) span: Span,
    /// Document length to restore when this range is put back
    pub(crate) seq_len: usize,
    /// Document position the edit affected
    pub(crate) index: usize,
    /// Number of characters inserted or removed
    pub(crate) len: usize,
}

impl PieceList {
    /// Replace the document part described by `removed` with the pieces in
    /// `inserted`.
    ///
    /// Only the links of the document neighbours and the inserted run ends
    /// are modified, the removed chain keeps pointing to its old neighbours.
    pub fn splice(&mut self, removed: Span, inserted: Run) {
        let (prev, next) = match removed {
            Span::Boundary { before, after } => (before, after),
            Span::Chain { first, last } => (self.prev(first), self.next(last)),
        };

        match inserted.ends() {
            Some((first, last)) => {
                self.link(prev, first);
                self.link(last, next);
            }
            None => {
                if let Span::Chain { .. } = removed {
                    self.link(prev, next);
                }
            }
        }
    }

    /// Put a stored span back into the document. Returns the span describing
    /// what was displaced, restoring that one undoes this restore.
    pub fn restore(&mut self, span: Span) -> Span {
        match span {
            Span::Boundary { before, after } => {
                let first = self.next(before);
                let last = self.prev(after);

                if first == after {
                    // Nothing between the pieces
                    return span;
                }

                self.link(before, after);
                Span::Chain { first, last }
            }
            Span::Chain { first, last } => {
                let prev = self.prev(first);
                let next = self.next(last);

                // Moving back into an empty position between two pieces
                if self.next(prev) == next {
                    self.link(prev, first);
                    self.link(last, next);
                    return Span::Boundary {
                        before: prev,
                        after: next,
                    };
                }

                // Swap the pieces currently in the document with the stored
                // ones
                let cur_first = self.next(prev);
                let cur_last = self.prev(next);
                self.get_mut(prev).next = Some(first);
                self.get_mut(next).prev = Some(last);

                Span::Chain {
                    first: cur_first,
                    last: cur_last,
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::piece_table::buffers::BufferId;
    use crate::piece_table::piece::Piece;

    fn lens(list: &PieceList) -> Vec<usize> {
        list.iter().map(|(_, p)| p.len).collect()
    }

    fn new_run(list: &mut PieceList, lens: &[usize]) -> Run {
        let mut run = Run::default();
        for len in lens {
            let id = list.alloc(Piece::new(BufferId(0), 0, *len));
            run.push(list, id);
        }
        run
    }

    fn document(lens: &[usize]) -> PieceList {
        let mut list = PieceList::new();
        let run = new_run(&mut list, lens);
        list.splice(
            Span::Boundary {
                before: PieceId::HEAD,
                after: PieceId::TAIL,
            },
            run,
        );
        list
    }

    #[test]
    fn splice_into_boundary() {
        let mut list = document(&[1, 2]);
        let second = list.prev(PieceId::TAIL);
        let first = list.prev(second);

        let run = new_run(&mut list, &[5, 6]);
        list.splice(
            Span::Boundary {
                before: first,
                after: second,
            },
            run,
        );
        assert_eq!(vec![1, 5, 6, 2], lens(&list));
    }

    #[test]
    fn splice_chain_with_nothing() {
        let mut list = document(&[1, 2, 3]);
        let first = list.first();
        let second = list.next(first);

        list.splice(
            Span::Chain {
                first,
                last: second,
            },
            Run::default(),
        );
        assert_eq!(vec![3], lens(&list));
        // Removed chain still points to its old neighbours
        assert_eq!(PieceId::HEAD, list.prev(first));
        assert_eq!(list.first(), list.next(second));
    }

    #[test]
    fn splice_chain_with_run() {
        let mut list = document(&[1, 2, 3]);
        let second = list.next(list.first());

        let run = new_run(&mut list, &[7, 8]);
        list.splice(
            Span::Chain {
                first: second,
                last: second,
            },
            run,
        );
        assert_eq!(vec![1, 7, 8, 3], lens(&list));
    }

    #[test]
    fn splice_boundary_with_nothing() {
        let mut list = document(&[1, 2]);
        list.splice(
            Span::Boundary {
                before: PieceId::HEAD,
                after: list.first(),
            },
            Run::default(),
        );
        assert_eq!(vec![1, 2], lens(&list));
    }

    #[test]
    fn restore_toggles() {
        let mut list = document(&[1, 2, 3]);
        let second = list.next(list.first());

        let run = new_run(&mut list, &[7, 8]);
        let removed = Span::Chain {
            first: second,
            last: second,
        };
        list.splice(removed, run);
        assert_eq!(vec![1, 7, 8, 3], lens(&list));

        let displaced = list.restore(removed);
        assert_eq!(vec![1, 2, 3], lens(&list));

        let back = list.restore(displaced);
        assert_eq!(vec![1, 7, 8, 3], lens(&list));
        assert_eq!(removed, back);
    }

    #[test]
    fn restore_boundary() {
        let mut list = document(&[1, 3]);
        let first = list.first();
        let last = list.next(first);

        let run = new_run(&mut list, &[2]);
        let removed = Span::Boundary {
            before: first,
            after: last,
        };
        list.splice(removed, run);
        assert_eq!(vec![1, 2, 3], lens(&list));

        let displaced = list.restore(removed);
        assert_eq!(vec![1, 3], lens(&list));
        assert!(matches!(displaced, Span::Chain { .. }));

        let back = list.restore(displaced);
        assert_eq!(vec![1, 2, 3], lens(&list));
        assert_eq!(removed, back);
    }

    #[test]
    fn append_joins_chains() {
        let mut list = document(&[1, 2, 3, 4]);
        let a = list.first();
        let b = list.next(a);
        let c = list.next(b);

        // Remove b and c separately and join them into one chain
        list.splice(Span::Chain { first: b, last: b }, Run::default());
        let mut run = Run::default();
        run.push(&mut list, c);
        list.splice(Span::Chain { first: c, last: c }, Run::default());
        assert_eq!(vec![1, 4], lens(&list));

        let span = Span::Chain { first: b, last: b }.append(&mut list, run);
        assert_eq!(Span::Chain { first: b, last: c }, span);

        list.restore(span);
        assert_eq!(vec![1, 2, 3, 4], lens(&list));
    }

    #[test]
    fn prepend_joins_chains() {
        let mut list = document(&[1, 2, 3, 4]);
        let a = list.first();
        let b = list.next(a);
        let c = list.next(b);

        list.splice(Span::Chain { first: c, last: c }, Run::default());
        let mut run = Run::default();
        run.push(&mut list, b);
        list.splice(Span::Chain { first: b, last: b }, Run::default());
        assert_eq!(vec![1, 4], lens(&list));

        let span = Span::Chain { first: c, last: c }.prepend(&mut list, run);
        assert_eq!(Span::Chain { first: b, last: c }, span);

        list.restore(span);
        assert_eq!(vec![1, 2, 3, 4], lens(&list));
    }
}
