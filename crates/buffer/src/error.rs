use thiserror::Error;

/// Rejected edit. Nothing in the document was modified.
///
/// A corrupted piece list is not reported here, it panics instead as the
/// document content can no longer be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Insert position {index} is past the end of the document (size {size})")]
    InvalidIndex { index: usize, size: usize },

    #[error("Cannot delete {len} characters at {index} from a document of size {size}")]
    InvalidRange {
        index: usize,
        len: usize,
        size: usize,
    },
}
