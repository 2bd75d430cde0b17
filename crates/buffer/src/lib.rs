mod error;
mod options;
mod piece_table;

pub use error::EditError;
pub use options::Options;
pub use piece_table::{
    chunks::{Chunk, Chunks},
    history::{Change, EditKind},
    PieceTable,
};
