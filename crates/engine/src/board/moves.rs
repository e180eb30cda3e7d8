use std::collections::HashMap;
use std::rc::Rc;

use super::Board;
use crate::bitboard::{SquareSet, RANK_1, RANK_8};
use crate::piece::Piece;
use crate::types::*;

/// Restriction on a piece's moves for one update pass. Influence is never restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    Normal,
    /// Moves stay on the pin axis.
    Pinned(Direction),
    /// Moves must land on a blocking square.
    InCheck(SquareSet),
    /// Pinned while the king is in check: no move can help.
    Frozen,
}

impl Regime {
    fn restrict(self, from: Square, targets: SquareSet) -> SquareSet {
        match self {
            Regime::Normal => targets,
            Regime::Pinned(direction) => targets
                .iter()
                .filter(|&to| direction.is_on_axis(from, to))
                .collect(),
            Regime::InCheck(blocking) => targets & blocking,
            Regime::Frozen => SquareSet::EMPTY,
        }
    }
}

/// Geometric reach of a piece before any regime is applied.
#[derive(Debug, Default)]
struct Reach {
    influence: SquareSet,
    quiet: SquareSet,
    captures: SquareSet,
}

impl Board {
    /// Full recomputation after a mutation: the side that just moved first,
    /// then the side to move, then special moves and the legal-move set.
    pub(crate) fn update_board_state(&mut self) {
        let mover = self.turn.opposite();
        // A legal move never leaves the mover in check; its pins still apply.
        self.update_side(mover, false);
        self.update_side(self.turn, true);
        self.update_special_moves();
        self.valid_moves = Rc::new(self.collect_valid_moves());
    }

    fn update_side(&mut self, color: Color, consider_check: bool) {
        let pins = self.pinned_pieces(color);
        let in_check = consider_check && self.is_in_check(color);
        let blocking = if in_check {
            self.blocking_squares(color)
        } else {
            SquareSet::EMPTY
        };

        for index in 0..self.pieces.len() {
            let piece = self.pieces[index];
            if !piece.alive || piece.color != color {
                continue;
            }
            let id = PieceId(index as u8);
            let regime = match (piece.kind, pins.get(&id), in_check) {
                (PieceKind::King, _, _) => Regime::Normal,
                (_, Some(_), true) => Regime::Frozen,
                (_, Some(&direction), false) => Regime::Pinned(direction),
                (_, None, true) => Regime::InCheck(blocking),
                (_, None, false) => Regime::Normal,
            };
            self.update_piece(id, regime);
        }
    }

    /// Unregisters the piece's old influence, recomputes, and re-registers.
    fn update_piece(&mut self, id: PieceId, regime: Regime) {
        self.unregister(id);
        let piece = self.pieces[id.index()];
        let reach = self.reach(&piece);

        Rc::make_mut(&mut self.attacks[piece.color.index()]).register(piece.square, reach.influence);
        let piece = &mut Rc::make_mut(&mut self.pieces)[id.index()];
        piece.influence = reach.influence;
        piece.quiet = regime.restrict(piece.square, reach.quiet);
        piece.captures = regime.restrict(piece.square, reach.captures);
    }

    /// Removes the piece's contribution from its color's attack map.
    pub(crate) fn unregister(&mut self, id: PieceId) {
        let piece = self.pieces[id.index()];
        if piece.influence.is_empty() {
            return;
        }
        Rc::make_mut(&mut self.attacks[piece.color.index()]).unregister(piece.square, piece.influence);
        Rc::make_mut(&mut self.pieces)[id.index()].influence = SquareSet::EMPTY;
    }

    fn reach(&self, piece: &Piece) -> Reach {
        match piece.kind {
            PieceKind::Pawn => self.pawn_reach(piece),
            PieceKind::Knight => self.step_reach(piece, &KNIGHT_PATTERNS),
            PieceKind::King => self.king_reach(piece),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => self.slider_reach(piece),
        }
    }

    fn slider_reach(&self, piece: &Piece) -> Reach {
        let mut reach = Reach::default();
        for direction in QUEEN_DIRECTIONS {
            if !piece.kind.slides_along(direction) {
                continue;
            }
            // Squares behind the enemy king stay attacked but are not moves.
            let mut behind_king = false;
            for steps in 1..8 {
                let Some(square) = piece.square.offset(direction, steps) else {
                    break;
                };
                reach.influence.insert(square);
                match self.piece_at(square) {
                    None => {
                        if !behind_king {
                            reach.quiet.insert(square);
                        }
                    }
                    Some(other) if other.color == piece.color || behind_king => break,
                    Some(other) => {
                        reach.captures.insert(square);
                        if other.kind != PieceKind::King {
                            break;
                        }
                        behind_king = true;
                    }
                }
            }
        }
        reach
    }

    fn step_reach(&self, piece: &Piece, patterns: &[Direction]) -> Reach {
        let mut reach = Reach::default();
        for &pattern in patterns {
            let Some(square) = piece.square.offset(pattern, 1) else {
                continue;
            };
            reach.influence.insert(square);
            match self.piece_at(square) {
                None => reach.quiet.insert(square),
                Some(other) if other.color != piece.color => reach.captures.insert(square),
                Some(_) => {}
            }
        }
        reach
    }

    /// King steps are legal only onto squares the opponent does not attack.
    fn king_reach(&self, piece: &Piece) -> Reach {
        let mut reach = self.step_reach(piece, &QUEEN_DIRECTIONS);
        let enemy = &self.attacks[piece.color.opposite().index()];
        let safe = |targets: SquareSet| -> SquareSet {
            targets.iter().filter(|&to| !enemy.is_attacked(to)).collect()
        };
        reach.quiet = safe(reach.quiet);
        reach.captures = safe(reach.captures);
        reach
    }

    fn pawn_reach(&self, piece: &Piece) -> Reach {
        let mut reach = Reach::default();
        let forward = Direction::new(piece.color.forward(), 0);

        if let Some(one) = piece.square.offset(forward, 1) {
            if self.piece_id_at(one).is_none() {
                reach.quiet.insert(one);
                if piece.square.row() == piece.color.pawn_start_row() {
                    if let Some(two) = piece.square.offset(forward, 2) {
                        if self.piece_id_at(two).is_none() {
                            reach.quiet.insert(two);
                        }
                    }
                }
            }
        }

        for column in [-1, 1] {
            let Some(square) = piece.square.offset(Direction::new(piece.color.forward(), column), 1)
            else {
                continue;
            };
            reach.influence.insert(square);
            if self.piece_at(square).is_some_and(|other| other.color != piece.color) {
                reach.captures.insert(square);
            }
        }
        reach
    }

    /// Pieces of `color` pinned to their king, keyed to the direction from the
    /// king towards the pinning piece.
    pub fn pinned_pieces(&self, color: Color) -> HashMap<PieceId, Direction> {
        let mut pins = HashMap::new();
        let king_square = self.king_square(color);

        for direction in QUEEN_DIRECTIONS {
            let mut candidate = None;
            for steps in 1..8 {
                let Some(square) = king_square.offset(direction, steps) else {
                    break;
                };
                let Some(id) = self.piece_id_at(square) else {
                    continue;
                };
                let piece = self.piece(id);
                if piece.color == color {
                    if candidate.is_some() {
                        break;
                    }
                    candidate = Some(id);
                } else {
                    if let Some(pinned) = candidate {
                        if piece.kind.slides_along(direction) {
                            pins.insert(pinned, direction);
                        }
                    }
                    break;
                }
            }
        }
        pins
    }

    /// Squares a non-king piece of `color` may move to in order to resolve a
    /// check: the checker itself plus, for a sliding checker, the squares
    /// strictly between it and the king. Empty under double check or when not
    /// in check.
    pub fn blocking_squares(&self, color: Color) -> SquareSet {
        let checkers = self.checkers(color);
        if checkers.len() != 1 {
            return SquareSet::EMPTY;
        }

        let king_square = self.king_square(color);
        let mut blocking = checkers;
        for checker in checkers {
            if !self.piece_at(checker).is_some_and(|p| p.kind.is_slider()) {
                continue;
            }
            let direction = Direction::towards(checker, king_square);
            for steps in 1..8 {
                match checker.offset(direction, steps) {
                    Some(square) if square != king_square => blocking.insert(square),
                    _ => break,
                }
            }
        }
        blocking
    }

    fn update_special_moves(&mut self) {
        // Kings of both sides see the final state of the opposing map.
        for color in Color::ALL {
            self.update_piece(self.kings[color.index()], Regime::Normal);
        }

        for index in 0..self.pieces.len() {
            let piece = self.pieces[index];
            if !piece.alive {
                continue;
            }
            let special = match piece.kind {
                PieceKind::King => self.castling_targets(&piece),
                PieceKind::Pawn => {
                    let mut special = (piece.quiet | piece.captures) & (RANK_1 | RANK_8);
                    if let Some(target) = self.en_passant_target(PieceId(index as u8), &piece) {
                        special.insert(target);
                    }
                    special
                }
                _ => SquareSet::EMPTY,
            };
            Rc::make_mut(&mut self.pieces)[index].special = special;
        }
    }

    /// Castling destinations for an unmoved king on its home square.
    fn castling_targets(&self, king: &Piece) -> SquareSet {
        let mut targets = SquareSet::EMPTY;
        let rank = king.color.back_rank();
        if king.times_moved != 0 || king.square != Square::new(rank, 4) {
            return targets;
        }
        let enemy = &self.attacks[king.color.opposite().index()];
        if enemy.is_attacked(king.square) {
            return targets;
        }

        for side in [CastleSide::KingSide, CastleSide::QueenSide] {
            let rook_column = side.rook_column();
            let rook_ready = self.piece_at(Square::new(rank, rook_column)).is_some_and(|rook| {
                rook.kind == PieceKind::Rook && rook.color == king.color && rook.times_moved == 0
            });
            if !rook_ready {
                continue;
            }

            let (low, high) = if rook_column > 4 { (5, rook_column) } else { (rook_column + 1, 4) };
            let path_clear = (low..high).all(|column| self.piece_id_at(Square::new(rank, column)).is_none());

            // The king may not pass through or land on an attacked square.
            let transit = Square::new(rank, side.rook_target_column());
            let destination = Square::new(rank, side.king_target_column());
            if path_clear && !enemy.is_attacked(transit) && !enemy.is_attacked(destination) {
                targets.insert(destination);
            }
        }
        targets
    }

    /// En passant square for `pawn`, available only right after an adjacent
    /// enemy pawn's double step and only if the capture keeps the king safe.
    fn en_passant_target(&self, id: PieceId, pawn: &Piece) -> Option<Square> {
        let last = self.moves_made.last()?;
        let victim = self.piece(last.piece);
        if victim.kind != PieceKind::Pawn
            || victim.color == pawn.color
            || last.from.row().abs_diff(last.to.row()) != 2
            || last.to.row() != pawn.square.row()
            || last.to.column().abs_diff(pawn.square.column()) != 1
        {
            return None;
        }

        let target = last.to.offset(Direction::new(pawn.color.forward(), 0), 1)?;
        if self.piece_id_at(target).is_some() {
            return None;
        }

        // Simulate on a scratch grid; the real grid is never touched.
        let mut grid = self.grid;
        grid[pawn.square.index()] = None;
        grid[last.to.index()] = None;
        grid[target.index()] = Some(id);
        let king_square = self.king_square(pawn.color);
        if self.is_attacked_on(&grid, king_square, pawn.color.opposite()) {
            return None;
        }
        Some(target)
    }

    /// Occupancy scan for attacks on `square` by `by` over an arbitrary grid.
    fn is_attacked_on(&self, grid: &[Option<PieceId>; 64], square: Square, by: Color) -> bool {
        let enemy_at = |target: Square| {
            grid[target.index()]
                .map(|id| self.piece(id))
                .filter(|piece| piece.color == by)
        };

        for direction in QUEEN_DIRECTIONS {
            for steps in 1..8 {
                let Some(target) = square.offset(direction, steps) else {
                    break;
                };
                let Some(id) = grid[target.index()] else {
                    continue;
                };
                let piece = self.piece(id);
                if piece.color == by
                    && (piece.kind.slides_along(direction) || (steps == 1 && piece.kind == PieceKind::King))
                {
                    return true;
                }
                break;
            }
        }

        let knight = KNIGHT_PATTERNS
            .iter()
            .filter_map(|&pattern| square.offset(pattern, 1))
            .any(|target| enemy_at(target).is_some_and(|p| p.kind == PieceKind::Knight));

        let pawn = [-1, 1]
            .iter()
            .filter_map(|&column| square.offset(Direction::new(-by.forward(), column), 1))
            .any(|target| enemy_at(target).is_some_and(|p| p.kind == PieceKind::Pawn));

        knight || pawn
    }

    /// Legal moves of the side to move, in arena order then ascending destination.
    fn collect_valid_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (id, piece) in self.pieces() {
            if piece.color != self.turn {
                continue;
            }
            for to in piece.all_moves() {
                moves.push(Move::new(piece.square, to, id, self.captured_by(piece, to)));
            }
        }
        moves
    }

    fn captured_by(&self, piece: &Piece, to: Square) -> Option<PieceId> {
        if let Some(id) = self.piece_id_at(to) {
            return Some(id);
        }
        if piece.kind == PieceKind::Pawn && to.column() != piece.square.column() {
            return self.piece_id_at(Square::new(piece.square.row(), to.column()));
        }
        None
    }
}
