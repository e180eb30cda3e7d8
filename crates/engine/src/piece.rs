use crate::bitboard::SquareSet;
use crate::tables;
use crate::types::{Color, PieceKind, Square};

/// A piece owned by the board arena. The four square sets are derived state,
/// recomputed by the board on every update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub alive: bool,
    pub times_moved: u32,
    /// Full geometric reach, including defended friendly squares.
    pub influence: SquareSet,
    pub quiet: SquareSet,
    pub captures: SquareSet,
    /// Castling destinations for kings; en passant and promotion targets for pawns.
    pub special: SquareSet,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            square,
            alive: true,
            times_moved: 0,
            influence: SquareSet::EMPTY,
            quiet: SquareSet::EMPTY,
            captures: SquareSet::EMPTY,
            special: SquareSet::EMPTY,
        }
    }

    pub fn all_moves(&self) -> SquareSet {
        self.quiet | self.captures | self.special
    }

    /// Material value signed by color.
    pub fn value(&self) -> i32 {
        self.color.sign() * self.kind.value()
    }

    pub fn positional_value(&self) -> i32 {
        tables::positional_value(self.kind, self.color, self.square)
    }

    pub fn contribution(&self) -> i32 {
        tables::contribution(self.kind, self.color, self.square)
    }

    pub fn clear_moves(&mut self) {
        self.quiet = SquareSet::EMPTY;
        self.captures = SquareSet::EMPTY;
        self.special = SquareSet::EMPTY;
    }

    /// FEN letter, uppercase for White.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol().to_ascii_uppercase(),
            Color::Black => self.kind.symbol(),
        }
    }
}
