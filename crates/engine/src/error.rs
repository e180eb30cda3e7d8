//! Error types for board operations.
//!
//! Only caller contract violations are errors. Undo on an empty history and
//! engine replies with no legal move are no-ops and surface as `None` instead.

use thiserror::Error;

use crate::types::Square;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinates outside the 8x8 grid
    #[error("square ({row}, {column}) is off the board")]
    OutOfBounds { row: i8, column: i8 },

    /// Source/destination pair is not in the current legal-move set
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    /// Per-square query on a square with no occupant
    #[error("no piece on {square}")]
    EmptySquare { square: Square },

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

pub type BoardResult<T> = Result<T, BoardError>;
