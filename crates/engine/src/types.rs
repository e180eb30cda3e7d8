use std::fmt;

use crate::error::{BoardError, BoardResult};

/// Board cell identity. Index is `row * 8 + column`; row 0 is White's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

impl Square {
    /// Caller guarantees `row` and `column` are in `0..8`.
    pub const fn new(row: u8, column: u8) -> Self {
        Self(row * 8 + column)
    }

    /// Bounds-checked constructor for coordinates coming from outside the core.
    pub fn try_new(row: i8, column: i8) -> BoardResult<Self> {
        if Self::is_valid(row, column) {
            Ok(Self::new(row as u8, column as u8))
        } else {
            Err(BoardError::OutOfBounds { row, column })
        }
    }

    pub const fn is_valid(row: i8, column: i8) -> bool {
        row >= 0 && row < 8 && column >= 0 && column < 8
    }

    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    pub const fn column(self) -> u8 {
        self.0 % 8
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Square reached by stepping `steps` times along `direction`, if still on the board.
    pub fn offset(self, direction: Direction, steps: i8) -> Option<Self> {
        let row = self.row() as i8 + direction.row * steps;
        let column = self.column() as i8 + direction.column * steps;
        if Self::is_valid(row, column) {
            Some(Self::new(row as u8, column as u8))
        } else {
            None
        }
    }

    /// Parses coordinate notation such as `e4`.
    pub fn from_algebraic(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let column = bytes[0].wrapping_sub(b'a') as i8;
        let row = bytes[1].wrapping_sub(b'1') as i8;
        Self::try_new(row, column).ok()
    }

    pub fn distance(self, other: Square) -> u8 {
        let rows = (self.row() as i8 - other.row() as i8).unsigned_abs();
        let columns = (self.column() as i8 - other.column() as i8).unsigned_abs();
        rows.max(columns)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.column()) as char;
        let rank = (b'1' + self.row()) as char;
        write!(f, "{}{}", file, rank)
    }
}

/// Unit step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub row: i8,
    pub column: i8,
}

impl Direction {
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    pub const fn is_orthogonal(self) -> bool {
        self.row == 0 || self.column == 0
    }

    pub const fn is_diagonal(self) -> bool {
        self.row != 0 && self.column != 0
    }

    /// True when `to` lies on the line through `from` along this direction (either way).
    pub fn is_on_axis(self, from: Square, to: Square) -> bool {
        let rows = to.row() as i8 - from.row() as i8;
        let columns = to.column() as i8 - from.column() as i8;
        rows * self.column == columns * self.row
    }

    /// Unit step from `from` towards `to`. Meaningful only for aligned squares.
    pub fn towards(from: Square, to: Square) -> Self {
        let rows = to.row() as i8 - from.row() as i8;
        let columns = to.column() as i8 - from.column() as i8;
        Self::new(rows.signum(), columns.signum())
    }
}

pub const QUEEN_DIRECTIONS: [Direction; 8] = [
    Direction::new(1, 0),
    Direction::new(-1, 0),
    Direction::new(0, 1),
    Direction::new(0, -1),
    Direction::new(1, 1),
    Direction::new(1, -1),
    Direction::new(-1, 1),
    Direction::new(-1, -1),
];

pub const KNIGHT_PATTERNS: [Direction; 8] = [
    Direction::new(2, 1),
    Direction::new(2, -1),
    Direction::new(-2, 1),
    Direction::new(-2, -1),
    Direction::new(1, 2),
    Direction::new(1, -2),
    Direction::new(-1, 2),
    Direction::new(-1, -2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// +1 for White, -1 for Black.
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn push.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Unsigned material value.
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 10000,
        }
    }

    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Whether a slider of this kind attacks along `direction`.
    pub const fn slides_along(self, direction: Direction) -> bool {
        match self {
            PieceKind::Queen => true,
            PieceKind::Rook => direction.is_orthogonal(),
            PieceKind::Bishop => direction.is_diagonal(),
            _ => false,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Arena index of a piece owned by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u8);

impl PieceId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const fn rook_column(self) -> u8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    /// Column the rook lands on after castling.
    pub const fn rook_target_column(self) -> u8 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    pub const fn king_target_column(self) -> u8 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }
}

/// A move record. `captured` is fixed when the move is built; the flags are
/// filled in when the board executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub castle: Option<CastleSide>,
    pub promotion: bool,
    pub en_passant: bool,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: PieceId, captured: Option<PieceId>) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            castle: None,
            promotion: false,
            en_passant: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn same_squares(&self, from: Square, to: Square) -> bool {
        self.from == from && self.to == to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion {
            write!(f, "q")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check(Color),     // Side in check
    Checkmate(Color), // Side that is mated
    Stalemate,
}

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
