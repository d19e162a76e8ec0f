/// Error types for board construction and level loading.
///
/// Move-time problems are not errors: blocked or out-of-range pushes
/// resolve to no-ops or bounces inside the engine.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A level character with no cell mapping.
    #[error("invalid cell character {ch:?} at row {row}, column {col}")]
    InvalidCellCharacter { ch: char, row: usize, col: usize },

    /// Layers that are empty, ragged, or differ in shape.
    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    /// Coordinate outside `[0, rows) × [0, cols)`.
    #[error("({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfRange { row: usize, col: usize, rows: usize, cols: usize },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no playable levels")]
    NoLevels,

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("level {name:?}: {reason}")]
    Format { name: String, reason: String },

    #[error("level {name:?}: {source}")]
    Board {
        name: String,
        #[source]
        source: BoardError,
    },
}
