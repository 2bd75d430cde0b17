use std::fmt;

use super::buffers::Buffers;
use super::list::PieceList;
use super::piece::PieceId;

/// Contiguous characters of the document, referenced by one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a>(pub(crate) &'a [char]);

impl<'a> Chunk<'a> {
    pub fn as_chars(&self) -> &'a [char] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> AsRef<[char]> for Chunk<'a> {
    #[inline(always)]
    fn as_ref(&self) -> &[char] {
        self.0
    }
}

impl<'a> fmt::Display for Chunk<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0 {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Cursor over the pieces of the document. Each step yields the document
/// position a chunk starts at, and the chunk.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    list: &'a PieceList,
    buffers: &'a Buffers,
    piece: PieceId,
    pos: usize,
}

impl<'a> Chunks<'a> {
    #[inline]
    pub(crate) fn new(list: &'a PieceList, buffers: &'a Buffers, at: usize) -> Chunks<'a> {
        let (piece, pos) = list.locate(at);
        Chunks {
            list,
            buffers,
            piece,
            pos,
        }
    }

    /// Chunk at the current position, or `None` if at the end
    #[inline]
    pub fn get(&self) -> Option<(usize, Chunk<'a>)> {
        if self.piece.is_sentinel() {
            return None;
        }

        let piece = self.list.get(self.piece);
        let chars = self.buffers.slice(piece.buf, piece.range());
        Some((self.pos, Chunk(chars)))
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(usize, Chunk<'a>)> {
        if self.piece == PieceId::TAIL {
            return None;
        }

        self.pos += self.list.get(self.piece).len;
        self.piece = self.list.next(self.piece);
        self.get()
    }

    #[inline]
    pub fn prev(&mut self) -> Option<(usize, Chunk<'a>)> {
        let prev = self.list.prev(self.piece);
        if prev == PieceId::HEAD {
            return None;
        }

        self.piece = prev;
        self.pos -= self.list.get(prev).len;
        self.get()
    }
}

#[cfg(test)]
mod test {
    use crate::PieceTable;

    fn chunk(pos: usize, string: &str) -> Option<(usize, String)> {
        Some((pos, string.to_string()))
    }

    fn owned(item: Option<(usize, super::Chunk)>) -> Option<(usize, String)> {
        item.map(|(pos, chunk)| (pos, chunk.to_string()))
    }

    #[test]
    fn next_start() {
        let mut pt = PieceTable::new();
        pt.insert(0, "bar").unwrap();
        pt.insert(0, "foo").unwrap();

        let mut chunks = pt.chunks();

        assert_eq!(chunk(0, "foo"), owned(chunks.get()));
        assert_eq!(chunk(3, "bar"), owned(chunks.next()));

        assert_eq!(None, owned(chunks.next()));
        assert_eq!(None, owned(chunks.next()));
        assert_eq!(None, owned(chunks.next()));
    }

    #[test]
    fn prev_end() {
        let mut pt = PieceTable::new();
        pt.insert(0, "bar").unwrap();
        pt.insert(0, "foo").unwrap();

        let mut chunks = pt.chunks_at(pt.size());

        assert_eq!(None, owned(chunks.get()));

        assert_eq!(chunk(3, "bar"), owned(chunks.prev()));
        assert_eq!(chunk(0, "foo"), owned(chunks.prev()));

        assert_eq!(None, owned(chunks.prev()));
        assert_eq!(chunk(0, "foo"), owned(chunks.get()));
    }

    #[test]
    fn next_prev() {
        let mut pt = PieceTable::new();
        pt.insert(0, "bar").unwrap();
        pt.insert(0, "foo").unwrap();

        let mut chunks = pt.chunks();

        assert_eq!(chunk(0, "foo"), owned(chunks.get()));
        assert_eq!(chunk(3, "bar"), owned(chunks.next()));
        assert_eq!(chunk(0, "foo"), owned(chunks.prev()));
    }

    #[test]
    fn prev_next() {
        let mut pt = PieceTable::new();
        pt.insert(0, "bar").unwrap();
        pt.insert(0, "foo").unwrap();

        let mut chunks = pt.chunks_at(pt.size());

        assert_eq!(None, owned(chunks.get()));
        assert_eq!(chunk(3, "bar"), owned(chunks.prev()));
        assert_eq!(chunk(0, "foo"), owned(chunks.prev()));
        assert_eq!(chunk(3, "bar"), owned(chunks.next()));
    }

    #[test]
    fn at_middle_of_piece() {
        let pt: PieceTable = PieceTable::from("hello world");
        let chunks = pt.chunks_at(4);
        assert_eq!(chunk(0, "hello world"), owned(chunks.get()));
    }

    #[test]
    fn empty() {
        let pt = PieceTable::new();
        let mut chunks = pt.chunks();
        assert_eq!(None, owned(chunks.get()));
        assert_eq!(None, owned(chunks.next()));
        assert_eq!(None, owned(chunks.prev()));
    }
}
