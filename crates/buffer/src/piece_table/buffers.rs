use std::ops::Range;

/// Extra capacity given to a freshly allocated add buffer on top of the text
/// that caused the allocation.
pub(crate) const DEFAULT_SLACK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub(crate) struct BufferId(pub(crate) usize);

/// Append only character storage. Text is only ever written to the tail and
/// a buffer never grows past the capacity it was allocated with, so pieces
/// can reference it for as long as the document lives.
#[derive(Debug)]
pub(crate) struct Buffer {
    id: BufferId,
    text: Vec<char>,
    /// Limit on the text length. Memory is only allocated as text is
    /// appended.
    capacity: usize,
}

impl Buffer {
    fn with_capacity(id: BufferId, capacity: usize) -> Buffer {
        Buffer {
            id,
            text: Vec::new(),
            capacity,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn fits(&self, n: usize) -> bool {
        self.capacity - self.text.len() >= n
    }

    /// Append text to the tail, returns the position it was written to
    fn append(&mut self, text: &str) -> usize {
        debug_assert!(self.fits(text.chars().count()));
        let pos = self.text.len();
        self.text.extend(text.chars());
        pos
    }

    #[inline]
    pub fn slice(&self, range: Range<usize>) -> &[char] {
        &self.text[range]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppendResult {
    /// Allocated a new add buffer and appended to its start.
    NewBuffer(BufferId),
    /// Appended to the tail of the current add buffer at a position.
    Append(BufferId, usize),
}

impl AppendResult {
    /// Buffer and position the appended text starts at
    pub fn location(&self) -> (BufferId, usize) {
        match *self {
            AppendResult::NewBuffer(id) => (id, 0),
            AppendResult::Append(id, pos) => (id, pos),
        }
    }
}

/// All the buffers of a document. The last allocated buffer is the add
/// buffer all inserted text is appended to.
#[derive(Debug)]
pub(crate) struct Buffers {
    list: Vec<Buffer>,
    add: Option<BufferId>,
    slack: usize,
}

impl Buffers {
    pub fn new(slack: usize) -> Buffers {
        Buffers {
            list: Vec::new(),
            add: None,
            slack,
        }
    }

    /// Create a new buffer and make it the add buffer
    pub fn allocate(&mut self, capacity: usize) -> BufferId {
        let id = BufferId(self.len());
        log::debug!("Allocating buffer {} with capacity {}", id.0, capacity);
        self.list.push(Buffer::with_capacity(id, capacity));
        self.add = Some(id);
        id
    }

    /// Store the initial document text in a buffer of its own.
    /// The buffer is full right away, so the first insertion opens a new add
    /// buffer.
    pub fn import_original(&mut self, text: &str, len: usize) -> BufferId {
        let id = self.allocate(len);
        self.list[id.0].append(text);
        id
    }

    /// Append `len` characters of `text` to the add buffer, allocating a new
    /// one if they do not fit.
    pub fn import(&mut self, text: &str, len: usize) -> AppendResult {
        if let Some(id) = self.add {
            let buf = &mut self.list[id.0];
            if buf.fits(len) {
                let pos = buf.append(text);
                return AppendResult::Append(id, pos);
            }

            log::debug!(
                "Add buffer {} full ({}/{}), cannot fit {} characters",
                buf.id().0,
                buf.len(),
                buf.capacity(),
                len
            );
        }

        let id = self.allocate(len.saturating_add(self.slack));
        self.list[id.0].append(text);
        AppendResult::NewBuffer(id)
    }

    #[inline]
    pub fn get(&self, id: BufferId) -> &Buffer {
        &self.list[id.0]
    }

    #[inline]
    pub fn slice(&self, id: BufferId, range: Range<usize>) -> &[char] {
        self.get(id).slice(range)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn original_buffer_is_full() {
        let mut bufs = Buffers::new(DEFAULT_SLACK);
        let orig = bufs.import_original("hello", 5);
        assert_eq!(orig, bufs.get(orig).id());
        assert_eq!(5, bufs.get(orig).capacity());
        assert_eq!(5, bufs.get(orig).len());

        let result = bufs.import("x", 1);
        assert!(matches!(result, AppendResult::NewBuffer(BufferId(1))));
        assert_eq!(2, bufs.len());
    }

    #[test]
    fn append_to_add_buffer() {
        let mut bufs = Buffers::new(8);
        assert_eq!(AppendResult::NewBuffer(BufferId(0)), bufs.import("ab", 2));
        assert_eq!(AppendResult::Append(BufferId(0), 2), bufs.import("cd", 2));
        assert_eq!(&['a', 'b', 'c', 'd'], bufs.slice(BufferId(0), 0..4));
    }

    #[test]
    fn grows_to_new_buffer() {
        let mut bufs = Buffers::new(2);
        bufs.import("abc", 3);
        // Capacity is 3 + 2
        assert_eq!(AppendResult::Append(BufferId(0), 3), bufs.import("de", 2));
        assert_eq!(AppendResult::NewBuffer(BufferId(1)), bufs.import("f", 1));
        assert_eq!(3, bufs.get(BufferId(1)).capacity());

        // Old buffer is kept as is
        assert_eq!(&['a', 'b', 'c', 'd', 'e'], bufs.slice(BufferId(0), 0..5));
        assert_eq!(&['f'], bufs.slice(BufferId(1), 0..1));
    }

    #[test]
    fn capacity_is_not_reserved() {
        let mut bufs = Buffers::new(usize::MAX);
        assert_eq!(AppendResult::NewBuffer(BufferId(0)), bufs.import("ab", 2));
        assert_eq!(usize::MAX, bufs.get(BufferId(0)).capacity());
        assert_eq!(AppendResult::Append(BufferId(0), 2), bufs.import("c", 1));
        assert_eq!(&['a', 'b', 'c'], bufs.slice(BufferId(0), 0..3));
    }

    #[test]
    fn counts_chars() {
        let mut bufs = Buffers::new(0);
        let text = "äö€";
        let result = bufs.import(text, text.chars().count());
        let (id, pos) = result.location();
        assert_eq!(0, pos);
        assert_eq!(3, bufs.get(id).len());
        assert_eq!(&['ö', '€'], bufs.slice(id, 1..3));
    }
}
