//! Errors raised by the board state machine and its configuration.

use thiserror::Error;

use super::{Cell, PlayerId};

/// A move the board refuses.
///
/// Recoverable: the state is left untouched and the caller may retry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("{cell} is outside the board ({cells} cells)")]
    OutOfRange { cell: Cell, cells: usize },

    #[error("{cell} is already occupied by {owner}")]
    Occupied { cell: Cell, owner: PlayerId },
}

/// Invalid board configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board {rows}x{cols} cannot fit a line of {win_length}")]
    BoardTooSmall {
        rows: usize,
        cols: usize,
        win_length: usize,
    },

    #[error("board {rows}x{cols} exceeds the addressable cell range")]
    BoardTooLarge { rows: usize, cols: usize },

    #[error("win length must be at least 1")]
    ZeroWinLength,

    #[error("history depth must be at least 1")]
    ZeroHistoryDepth,
}

/// A position that cannot be built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Move(#[from] IllegalMove),
}
