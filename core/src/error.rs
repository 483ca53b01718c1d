use thiserror::Error;

use crate::Money;

/// Legality rule violated by a candidate move.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Source and destination are the same cell")]
    SameCell,
    #[error("Destination is not on the same row or column")]
    NotOrthogonal,
    #[error("Only player tiles can be moved")]
    NotPlayerTile,
    #[error("Cannot jump onto an empty cell")]
    JumpToEmpty,
    #[error("Destination holds a tile of a different value")]
    TileMismatch,
    #[error("Resulting tile, cash, score or move count is out of range")]
    Overflow,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    #[error("Bankrupt, cash would drop to {cash}")]
    Bankrupt { cash: Money },
}

pub type Result<T> = core::result::Result<T, GameError>;
