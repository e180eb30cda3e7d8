use std::fmt;
use std::rc::Rc;

use crate::attack_map::AttackMap;
use crate::bitboard::SquareSet;
use crate::error::{BoardError, BoardResult};
use crate::piece::Piece;
use crate::types::*;

// Declare submodules
pub mod moves;
pub mod snapshot;
pub mod state;

use snapshot::Snapshot;

type EvaluationListener = Box<dyn FnMut(i32)>;

/// The board state machine: grid, piece arena, attack maps, turn, move log,
/// legal-move set and the undo journal.
///
/// Pieces are owned by an arena and referenced by [`PieceId`]. The arena, the
/// attack maps and the legal-move set are shared copy-on-write with the
/// snapshots in the undo journal, so taking a snapshot costs a few reference
/// count bumps and the first write after it clones only what is touched.
pub struct Board {
    grid: [Option<PieceId>; 64],
    pieces: Rc<Vec<Piece>>,
    kings: [PieceId; 2],
    attacks: [Rc<AttackMap>; 2],
    turn: Color,
    moves_made: Vec<Move>,
    valid_moves: Rc<Vec<Move>>,
    evaluation: i32,
    history: Vec<Snapshot>,
    listeners: Vec<EvaluationListener>,
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board.finish_setup();
        board
    }

    fn empty() -> Self {
        Self {
            grid: [None; 64],
            pieces: Rc::new(Vec::with_capacity(32)),
            kings: [PieceId(0); 2],
            attacks: [Rc::new(AttackMap::new()), Rc::new(AttackMap::new())],
            turn: Color::White,
            moves_made: Vec::new(),
            valid_moves: Rc::new(Vec::new()),
            evaluation: 0,
            history: Vec::new(),
            listeners: Vec::new(),
        }
    }

    fn setup_starting_position(&mut self) {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        // White pieces (row 0) and pawns (row 1)
        for (column, &kind) in BACK_RANK.iter().enumerate() {
            self.place(kind, Color::White, Square::new(0, column as u8));
        }
        for column in 0..8 {
            self.place(PieceKind::Pawn, Color::White, Square::new(1, column));
        }

        // Black pawns (row 6) and pieces (row 7)
        for column in 0..8 {
            self.place(PieceKind::Pawn, Color::Black, Square::new(6, column));
        }
        for (column, &kind) in BACK_RANK.iter().enumerate() {
            self.place(kind, Color::Black, Square::new(7, column as u8));
        }
    }

    /// Adds a piece to the arena during setup. Returns its id.
    fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        let pieces = Rc::make_mut(&mut self.pieces);
        let id = PieceId(pieces.len() as u8);
        pieces.push(Piece::new(kind, color, square));
        self.grid[square.index()] = Some(id);
        if kind == PieceKind::King {
            self.kings[color.index()] = id;
        }
        id
    }

    /// Computes the static evaluation from scratch and runs the first update pass.
    fn finish_setup(&mut self) {
        self.evaluation = self
            .pieces
            .iter()
            .filter(|piece| piece.alive)
            .map(Piece::contribution)
            .sum();
        self.update_board_state();
    }

    // FEN parsing functionality
    pub fn from_fen(fen: &str) -> BoardResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 2 || parts.len() > 6 {
            return Err(BoardError::InvalidFen(format!(
                "expected 2 to 6 fields, found {}",
                parts.len()
            )));
        }

        let mut board = Self::empty();
        board.parse_piece_placement(parts[0])?;

        board.turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(BoardError::InvalidFen(format!("invalid active color '{}'", other)))
            }
        };

        board.parse_castling_rights(parts.get(2).copied().unwrap_or("-"))?;

        let en_passant = parts.get(3).copied().unwrap_or("-");
        if en_passant != "-" && Square::from_algebraic(en_passant).is_none() {
            return Err(BoardError::InvalidFen(format!(
                "invalid en passant square '{}'",
                en_passant
            )));
        }

        for counter in parts.iter().skip(4) {
            if counter.parse::<u32>().is_err() {
                return Err(BoardError::InvalidFen(format!("invalid move counter '{}'", counter)));
            }
        }

        board.finish_setup();
        if board.is_in_check(board.turn.opposite()) {
            return Err(BoardError::InvalidFen(format!(
                "{} is in check but it is {}'s turn",
                board.turn.opposite(),
                board.turn
            )));
        }
        Ok(board)
    }

    fn parse_piece_placement(&mut self, placement: &str) -> BoardResult<()> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::InvalidFen(
                "piece placement must have 8 ranks".to_string(),
            ));
        }

        let mut king_count = [0usize; 2];
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let row = 7 - rank_idx as u8; // FEN starts from rank 8, rows start from rank 1
            let mut column = 0u8;

            for ch in rank_str.chars() {
                if let Some(empty_squares) = ch.to_digit(10) {
                    if !(1..=8).contains(&empty_squares) {
                        return Err(BoardError::InvalidFen(format!("invalid digit '{}'", ch)));
                    }
                    column += empty_squares as u8;
                } else {
                    let kind = PieceKind::from_symbol(ch).ok_or_else(|| {
                        BoardError::InvalidFen(format!("invalid piece character '{}'", ch))
                    })?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if column >= 8 {
                        return Err(BoardError::InvalidFen(format!(
                            "rank {} is too long",
                            row + 1
                        )));
                    }
                    if kind == PieceKind::Pawn && (row == 0 || row == 7) {
                        return Err(BoardError::InvalidFen(format!(
                            "pawn on back rank {}",
                            row + 1
                        )));
                    }
                    if kind == PieceKind::King {
                        king_count[color.index()] += 1;
                    }
                    self.place(kind, color, Square::new(row, column));
                    column += 1;
                }
                if column > 8 {
                    return Err(BoardError::InvalidFen(format!("rank {} is too long", row + 1)));
                }
            }

            if column != 8 {
                return Err(BoardError::InvalidFen(format!(
                    "rank {} does not cover 8 squares",
                    row + 1
                )));
            }
        }

        for color in Color::ALL {
            if king_count[color.index()] != 1 {
                return Err(BoardError::InvalidFen(format!(
                    "{} must have exactly one king, found {}",
                    color,
                    king_count[color.index()]
                )));
            }
        }
        Ok(())
    }

    /// Kings and rooks start as already moved unless a castling right keeps them fresh.
    fn parse_castling_rights(&mut self, castling: &str) -> BoardResult<()> {
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(BoardError::InvalidFen(format!(
                "invalid castling rights '{}'",
                castling
            )));
        }

        let pieces = Rc::make_mut(&mut self.pieces);
        for piece in pieces.iter_mut() {
            if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
                piece.times_moved = 1;
            }
        }

        for right in castling.chars().filter(|&c| c != '-') {
            let color = if right.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let side = if right.eq_ignore_ascii_case(&'k') {
                CastleSide::KingSide
            } else {
                CastleSide::QueenSide
            };
            let rank = color.back_rank();
            let king_home = Square::new(rank, 4);
            let rook_home = Square::new(rank, side.rook_column());

            let (Some(king), Some(rook)) = (self.grid[king_home.index()], self.grid[rook_home.index()])
            else {
                continue;
            };
            let pieces = Rc::make_mut(&mut self.pieces);
            let king_ok = pieces[king.index()].kind == PieceKind::King
                && pieces[king.index()].color == color;
            let rook_ok = pieces[rook.index()].kind == PieceKind::Rook
                && pieces[rook.index()].color == color;
            if king_ok && rook_ok {
                pieces[king.index()].times_moved = 0;
                pieces[rook.index()].times_moved = 0;
            }
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for row in (0..8).rev() {
            let mut empty = 0;
            for column in 0..8 {
                match self.piece_at(Square::new(row, column)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row > 0 {
                placement.push('/');
            }
        }

        let side = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };

        let mut castling = String::new();
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if self.has_castling_right(color, side) {
                    let symbol = match side {
                        CastleSide::KingSide => 'k',
                        CastleSide::QueenSide => 'q',
                    };
                    castling.push(match color {
                        Color::White => symbol.to_ascii_uppercase(),
                        Color::Black => symbol,
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .double_step_target()
            .map(|square| square.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!("{} {} {} {}", placement, side, castling, en_passant)
    }

    /// King and rook are both unmoved on their home squares.
    fn has_castling_right(&self, color: Color, side: CastleSide) -> bool {
        let rank = color.back_rank();
        let unmoved = |square: Square, kind: PieceKind| {
            self.piece_at(square)
                .is_some_and(|p| p.kind == kind && p.color == color && p.times_moved == 0)
        };
        unmoved(Square::new(rank, 4), PieceKind::King)
            && unmoved(Square::new(rank, side.rook_column()), PieceKind::Rook)
    }

    /// Square skipped by the last move when it was a pawn double step.
    fn double_step_target(&self) -> Option<Square> {
        let last = self.moves_made.last()?;
        let piece = self.piece(last.piece);
        if piece.kind != PieceKind::Pawn || last.from.row().abs_diff(last.to.row()) != 2 {
            return None;
        }
        Some(Square::new((last.from.row() + last.to.row()) / 2, last.from.column()))
    }

    // Basic accessors
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn evaluation(&self) -> i32 {
        self.evaluation
    }

    pub fn moves_made(&self) -> &[Move] {
        &self.moves_made
    }

    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn attack_map(&self, color: Color) -> &AttackMap {
        &self.attacks[color.index()]
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub fn piece_id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.grid[square.index()].map(|id| &self.pieces[id.index()])
    }

    /// Live pieces in arena order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.alive)
            .map(|(index, piece)| (PieceId(index as u8), piece))
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.pieces[self.kings[color.index()].index()].square
    }

    /// Registers a callback invoked synchronously whenever the evaluation changes.
    pub fn add_evaluation_listener<F>(&mut self, listener: F)
    where
        F: FnMut(i32) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify_evaluation(&mut self, previous: i32) {
        if self.evaluation == previous {
            return;
        }
        let evaluation = self.evaluation;
        for listener in self.listeners.iter_mut() {
            listener(evaluation);
        }
    }

    /// Copy of the full position and undo journal without the listeners,
    /// for use as a search scratchpad.
    pub fn detached(&self) -> Self {
        Self {
            grid: self.grid,
            pieces: Rc::clone(&self.pieces),
            kings: self.kings,
            attacks: [Rc::clone(&self.attacks[0]), Rc::clone(&self.attacks[1])],
            turn: self.turn,
            moves_made: self.moves_made.clone(),
            valid_moves: Rc::clone(&self.valid_moves),
            evaluation: self.evaluation,
            history: self.history.clone(),
            listeners: Vec::new(),
        }
    }

    // Per-square queries
    fn occupied(&self, row: i8, column: i8) -> BoardResult<(PieceId, &Piece)> {
        let square = Square::try_new(row, column)?;
        let id = self
            .piece_id_at(square)
            .ok_or(BoardError::EmptySquare { square })?;
        Ok((id, self.piece(id)))
    }

    /// Legal destinations of the piece on `(row, column)`. Empty for pieces of
    /// the side not to move.
    pub fn legal_destinations(&self, row: i8, column: i8) -> BoardResult<Vec<Square>> {
        let (id, _) = self.occupied(row, column)?;
        Ok(self
            .valid_moves
            .iter()
            .filter(|mv| mv.piece == id)
            .map(|mv| mv.to)
            .collect())
    }

    pub fn quiet_moves(&self, row: i8, column: i8) -> BoardResult<SquareSet> {
        self.occupied(row, column).map(|(_, piece)| piece.quiet)
    }

    pub fn captures(&self, row: i8, column: i8) -> BoardResult<SquareSet> {
        self.occupied(row, column).map(|(_, piece)| piece.captures)
    }

    pub fn special_moves(&self, row: i8, column: i8) -> BoardResult<SquareSet> {
        self.occupied(row, column).map(|(_, piece)| piece.special)
    }

    // Game state
    pub fn is_in_check(&self, color: Color) -> bool {
        self.attacks[color.opposite().index()].is_attacked(self.king_square(color))
    }

    /// Squares of the enemy pieces giving check to `color`.
    pub fn checkers(&self, color: Color) -> SquareSet {
        self.attacks[color.opposite().index()].attackers_of(self.king_square(color))
    }

    pub fn is_checkmate(&self) -> bool {
        self.valid_moves.is_empty() && self.is_in_check(self.turn)
    }

    pub fn is_stalemate(&self) -> bool {
        self.valid_moves.is_empty() && !self.is_in_check(self.turn)
    }

    pub fn status(&self) -> GameStatus {
        let in_check = self.is_in_check(self.turn);
        match (self.valid_moves.is_empty(), in_check) {
            (true, true) => GameStatus::Checkmate(self.turn),
            (true, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Check(self.turn),
            (false, false) => GameStatus::InProgress,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("evaluation", &self.evaluation)
            .field("moves_made", &self.moves_made.len())
            .field("valid_moves", &self.valid_moves.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for column in 0..8 {
                let symbol = self
                    .piece_at(Square::new(row, column))
                    .map(Piece::symbol)
                    .unwrap_or('.');
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_setup() {
        let board = Board::new();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.evaluation(), 0);
        assert_eq!(board.valid_moves().len(), 20);
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.king_square(Color::White), Square::new(0, 4));
        assert_eq!(board.king_square(Color::Black), Square::new(7, 4));
        assert_eq!(board.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_fen_round_trip() {
        let board = Board::from_fen(STARTING_POSITION_FEN).unwrap();
        assert_eq!(board.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");

        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b Kq -";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        for fen in [
            "",
            "8/8/8/8/8/8/8/8 w - -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq -",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9",
            "4k3/8/8/8/8/8/8/4K2P w - -",
            "4k3/4R3/8/8/8/8/8/4K3 w - -",
        ] {
            assert!(
                matches!(Board::from_fen(fen), Err(BoardError::InvalidFen(_))),
                "accepted {:?}",
                fen
            );
        }
    }

    #[test]
    fn test_queries_reject_bad_coordinates() {
        let board = Board::new();
        assert_eq!(
            board.legal_destinations(8, 0),
            Err(BoardError::OutOfBounds { row: 8, column: 0 })
        );
        assert_eq!(
            board.quiet_moves(-1, 3),
            Err(BoardError::OutOfBounds { row: -1, column: 3 })
        );
        assert_eq!(
            board.captures(4, 4),
            Err(BoardError::EmptySquare { square: Square::new(4, 4) })
        );
    }

    #[test]
    fn test_legal_destinations_of_knight_and_opponent_piece() {
        let board = Board::new();
        let knight = board.legal_destinations(0, 1).unwrap();
        assert_eq!(knight, vec![Square::new(2, 0), Square::new(2, 2)]);
        assert!(board.legal_destinations(7, 1).unwrap().is_empty());
    }

    #[test]
    fn test_detached_board_keeps_position_without_listeners() {
        let mut board = Board::new();
        board.add_evaluation_listener(|_| {});
        let copy = board.detached();
        assert_eq!(copy.to_fen(), board.to_fen());
        assert_eq!(copy.valid_moves(), board.valid_moves());
        assert_eq!(copy.listeners.len(), 0);
    }

    #[test]
    fn test_display_renders_ranks_top_down() {
        let text = Board::new().to_string();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "8  r n b q k b n r");
    }
}
