use super::piece::{Piece, PieceId};

/// Called when a link that must exist is missing, or a stored range has the
/// wrong shape. Continuing would produce garbage document content.
#[cold]
#[track_caller]
pub(crate) fn corrupted(what: &str) -> ! {
    panic!("piece list corrupted: {what}")
}

/// Doubly linked list of pieces stored in an arena.
///
/// Pieces are addressed using [`PieceId`] handles which stay valid until the
/// piece is released. Two sentinels `HEAD` and `TAIL` are always present, the
/// document content is the pieces from `HEAD.next` to `TAIL.prev`.
///
/// Pieces removed from the list are not released, they stay alive as undo
/// and redo ranges reference them. Released slots are reused.
#[derive(Debug)]
pub(crate) struct PieceList {
    slots: Vec<Option<Piece>>,
    free: Vec<PieceId>,
}

impl PieceList {
    pub fn new() -> PieceList {
        let mut head = Piece::sentinel();
        let mut tail = Piece::sentinel();
        head.next = Some(PieceId::TAIL);
        tail.prev = Some(PieceId::HEAD);

        PieceList {
            slots: vec![Some(head), Some(tail)],
            free: Vec::new(),
        }
    }

    /// Store a new unlinked piece
    pub fn alloc(&mut self, piece: Piece) -> PieceId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(piece);
                id
            }
            None => {
                let id = PieceId(self.slots.len());
                self.slots.push(Some(piece));
                id
            }
        }
    }

    /// Release a piece so its slot can be reused. The piece must not be
    /// referenced anymore.
    pub fn release(&mut self, id: PieceId) {
        debug_assert!(!id.is_sentinel(), "releasing a sentinel");
        if self.slots[id.0].take().is_none() {
            corrupted("released a piece twice");
        }
        self.free.push(id);
    }

    /// Release a detached chain of pieces linked from first to last
    pub fn release_chain(&mut self, first: PieceId, last: PieceId) {
        let mut id = first;
        loop {
            let next = self.get(id).next;
            self.release(id);

            if id == last {
                break;
            }

            id = next.unwrap_or_else(|| corrupted("chain ended before its last piece"));
        }
    }

    #[inline]
    pub fn get(&self, id: PieceId) -> &Piece {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| corrupted("dangling piece handle"))
    }

    #[inline]
    pub fn get_mut(&mut self, id: PieceId) -> &mut Piece {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| corrupted("dangling piece handle"))
    }

    #[inline]
    pub fn next(&self, id: PieceId) -> PieceId {
        self.get(id)
            .next
            .unwrap_or_else(|| corrupted("missing next link"))
    }

    #[inline]
    pub fn prev(&self, id: PieceId) -> PieceId {
        self.get(id)
            .prev
            .unwrap_or_else(|| corrupted("missing prev link"))
    }

    /// Link a -> b
    #[inline]
    pub fn link(&mut self, a: PieceId, b: PieceId) {
        self.get_mut(a).next = Some(b);
        self.get_mut(b).prev = Some(a);
    }

    /// First piece of the document, or `TAIL` if the document is empty
    #[inline]
    pub fn first(&self) -> PieceId {
        self.next(PieceId::HEAD)
    }

    /// Remove a piece from between its neighbours.
    /// The piece itself keeps pointing to them.
    pub fn unlink(&mut self, id: PieceId) {
        let prev = self.prev(id);
        let next = self.next(id);
        self.link(prev, next);
    }

    /// Find the piece containing document position `index`.
    /// Returns the piece and its starting position in the document.
    ///
    /// If index is at the end of the document returns `TAIL` and the
    /// document length.
    pub fn locate(&self, index: usize) -> (PieceId, usize) {
        let mut pos = 0;
        let mut id = self.first();

        while id != PieceId::TAIL {
            let piece = self.get(id);
            if index < pos + piece.len {
                return (id, pos);
            }

            pos += piece.len;
            id = self.next(id);
        }

        (PieceId::TAIL, pos)
    }

    /// Iterate over the pieces in document order, along with their
    /// starting positions
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            id: self.first(),
            pos: 0,
        }
    }

    /// Number of pieces in the document
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Number of pieces allocated, including ones only referenced by the
    /// history. Sentinels are not counted.
    pub fn allocated(&self) -> usize {
        self.slots.len() - self.free.len() - 2
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Iter<'a> {
    list: &'a PieceList,
    id: PieceId,
    pos: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Piece);

    fn next(&mut self) -> Option<Self::Item> {
        if self.id == PieceId::TAIL {
            return None;
        }

        let piece = self.list.get(self.id);
        let pos = self.pos;
        self.pos += piece.len;
        self.id = self.list.next(self.id);
        Some((pos, piece))
    }
}
