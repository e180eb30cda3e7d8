use std::rc::Rc;

use super::Board;
use crate::bitboard::SquareSet;
use crate::error::{BoardError, BoardResult};
use crate::types::*;

impl Board {
    /// Execute a move from the current legal-move set and update game state.
    ///
    /// Castling, en passant and promotion are recognised from the move itself.
    /// Returns the executed record with its flags filled in. An illegal pair
    /// leaves the board untouched.
    pub fn make_move(&mut self, from: Square, to: Square) -> BoardResult<Move> {
        let mut record = *self
            .valid_moves
            .iter()
            .find(|mv| mv.same_squares(from, to))
            .ok_or(BoardError::IllegalMove { from, to })?;

        self.history.push(self.snapshot());
        let previous_evaluation = self.evaluation;
        let mover = *self.piece(record.piece);

        // Special moves are recognised before the grid changes.
        let castle = match mover.kind {
            PieceKind::King if from.distance(to) == 2 => Some(if to.column() > from.column() {
                CastleSide::KingSide
            } else {
                CastleSide::QueenSide
            }),
            _ => None,
        };
        let en_passant = mover.kind == PieceKind::Pawn
            && from.column() != to.column()
            && self.piece_id_at(to).is_none()
            && mover.special.contains(to);
        let promotion = mover.kind == PieceKind::Pawn && to.row() == mover.color.promotion_row();

        self.unregister(record.piece);
        self.evaluation -= mover.contribution();

        if let Some(captured) = record.captured {
            self.unregister(captured);
            let victim = &mut Rc::make_mut(&mut self.pieces)[captured.index()];
            victim.alive = false;
            victim.clear_moves();
            let (square, contribution) = (victim.square, victim.contribution());
            self.evaluation -= contribution;
            self.grid[square.index()] = None;
        }

        Rc::make_mut(&mut self.pieces)[record.piece.index()].times_moved += 1;

        if let Some(side) = castle {
            record.castle = Some(side);
            self.castle_rook(mover.color, side);
        } else if en_passant {
            record.en_passant = true;
        } else if promotion {
            record.promotion = true;
        }

        self.relocate(record.piece, from, to);
        {
            let piece = &mut Rc::make_mut(&mut self.pieces)[record.piece.index()];
            if record.promotion {
                piece.kind = PieceKind::Queen;
            }
            if record.castle.is_some() {
                piece.special = SquareSet::EMPTY;
            }
        }
        self.evaluation += self.piece(record.piece).contribution();

        self.turn = self.turn.opposite();
        self.moves_made.push(record);
        self.update_board_state();
        self.notify_evaluation(previous_evaluation);

        debug_assert_eq!(self.history.len(), self.moves_made.len());
        Ok(record)
    }

    /// Reverts the most recent move. Returns `None` on an empty history.
    pub fn undo_move(&mut self) -> Option<Move> {
        let (Some(record), Some(snapshot)) = (self.moves_made.pop(), self.history.pop()) else {
            return None;
        };
        let previous_evaluation = self.evaluation;

        self.grid[record.to.index()] = None;
        self.grid[record.from.index()] = Some(record.piece);

        if let Some(side) = record.castle {
            let rank = record.from.row();
            let rook_home = Square::new(rank, side.rook_column());
            let rook_target = Square::new(rank, side.rook_target_column());
            self.grid[rook_home.index()] = self.grid[rook_target.index()].take();
        }

        if let Some(captured) = record.captured {
            let square = if record.en_passant {
                Square::new(record.from.row(), record.to.column())
            } else {
                record.to
            };
            self.grid[square.index()] = Some(captured);
        }

        self.restore(snapshot);
        self.notify_evaluation(previous_evaluation);
        Some(record)
    }

    fn castle_rook(&mut self, color: Color, side: CastleSide) {
        let rank = color.back_rank();
        let rook_home = Square::new(rank, side.rook_column());
        let rook_target = Square::new(rank, side.rook_target_column());
        let Some(rook) = self.piece_id_at(rook_home) else {
            debug_assert!(false, "castling without a rook on {}", rook_home);
            return;
        };

        self.unregister(rook);
        self.evaluation -= self.piece(rook).contribution();
        self.relocate(rook, rook_home, rook_target);
        Rc::make_mut(&mut self.pieces)[rook.index()].times_moved += 1;
        self.evaluation += self.piece(rook).contribution();
    }

    fn relocate(&mut self, id: PieceId, from: Square, to: Square) {
        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
        Rc::make_mut(&mut self.pieces)[id.index()].square = to;
    }
}
