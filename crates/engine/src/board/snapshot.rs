use std::rc::Rc;

use super::Board;
use crate::attack_map::AttackMap;
use crate::piece::Piece;
use crate::types::{Color, Move};

/// State captured right before a mutation. Every field is shared with the
/// board until one side writes to it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pieces: Rc<Vec<Piece>>,
    attacks: [Rc<AttackMap>; 2],
    valid_moves: Rc<Vec<Move>>,
    turn: Color,
    evaluation: i32,
}

impl Board {
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: Rc::clone(&self.pieces),
            attacks: [Rc::clone(&self.attacks[0]), Rc::clone(&self.attacks[1])],
            valid_moves: Rc::clone(&self.valid_moves),
            turn: self.turn,
            evaluation: self.evaluation,
        }
    }

    /// Overwrites every derived set, both maps, the legal-move set, turn and
    /// evaluation. The grid is reversed structurally by the caller.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.pieces = snapshot.pieces;
        self.attacks = snapshot.attacks;
        self.valid_moves = snapshot.valid_moves;
        self.turn = snapshot.turn;
        self.evaluation = snapshot.evaluation;
    }
}
