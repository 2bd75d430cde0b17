use std::ops::Range;

use super::buffers::BufferId;

/// Handle to a piece in the piece list arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PieceId(pub(crate) usize);

impl PieceId {
    /// Sentinel before the first piece
    pub(crate) const HEAD: PieceId = PieceId(0);
    /// Sentinel after the last piece
    pub(crate) const TAIL: PieceId = PieceId(1);

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        *self == PieceId::HEAD || *self == PieceId::TAIL
    }
}

/// Piece describes a span of characters in one of the buffers, and its
/// place in the document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Piece {
    /// Buffer we are indexing
    pub(crate) buf: BufferId,

    /// index in buffer
    pub(crate) pos: usize,
    /// Length in characters
    pub(crate) len: usize,

    pub(crate) prev: Option<PieceId>,
    pub(crate) next: Option<PieceId>,
}

impl Piece {
    pub fn new(buf: BufferId, pos: usize, len: usize) -> Piece {
        Piece {
            buf,
            pos,
            len,
            prev: None,
            next: None,
        }
    }

    pub(crate) fn sentinel() -> Piece {
        Piece::new(BufferId::default(), 0, 0)
    }

    /// A new unlinked piece referencing the first `offset` characters of this
    /// piece.
    pub fn head(&self, offset: usize) -> Piece {
        debug_assert!(offset <= self.len);
        Piece::new(self.buf, self.pos, offset)
    }

    /// A new unlinked piece referencing this piece starting from `offset`.
    pub fn tail(&self, offset: usize) -> Piece {
        debug_assert!(offset <= self.len);
        Piece::new(self.buf, self.pos + offset, self.len - offset)
    }

    /// Position right after the last referenced character in the buffer
    pub fn end(&self) -> usize {
        self.pos + self.len
    }

    /// Returns the range this piece references
    pub fn range(&self) -> Range<usize> {
        self.pos..self.pos + self.len
    }
}
