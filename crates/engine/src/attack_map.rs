//! Per-color index from target square to the squares of the pieces attacking it.
//!
//! Each piece registers its influence squares against its own square and
//! unregisters them before every recomputation, so the map never has to be
//! rebuilt from scratch.

use crate::bitboard::SquareSet;
use crate::types::Square;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackMap {
    attackers: [SquareSet; 64],
}

impl AttackMap {
    pub fn new() -> Self {
        Self {
            attackers: [SquareSet::EMPTY; 64],
        }
    }

    pub fn register(&mut self, attacker: Square, targets: SquareSet) {
        for target in targets {
            self.attackers[target.index()].insert(attacker);
        }
    }

    pub fn unregister(&mut self, attacker: Square, targets: SquareSet) {
        for target in targets {
            self.attackers[target.index()].remove(attacker);
        }
    }

    pub fn attackers_of(&self, square: Square) -> SquareSet {
        self.attackers[square.index()]
    }

    pub fn attack_count(&self, square: Square) -> u32 {
        self.attackers[square.index()].len()
    }

    pub fn is_attacked(&self, square: Square) -> bool {
        !self.attackers[square.index()].is_empty()
    }

    /// Sum of attacker counts over all squares, i.e. total reach of the color.
    pub fn total_influence(&self) -> u32 {
        self.attackers.iter().map(|set| set.len()).sum()
    }

    /// Every square `attacker` is currently registered against.
    pub fn targets_of(&self, attacker: Square) -> SquareSet {
        (0..64u8)
            .map(Square)
            .filter(|&target| self.attackers[target.index()].contains(attacker))
            .collect()
    }
}

impl Default for AttackMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_unregister_leaves_map_clean() {
        let mut map = AttackMap::new();
        let knight = Square::new(0, 1);
        let targets: SquareSet = [Square::new(2, 0), Square::new(2, 2), Square::new(1, 3)]
            .into_iter()
            .collect();

        map.register(knight, targets);
        assert_eq!(map.targets_of(knight), targets);
        assert_eq!(map.total_influence(), 3);
        assert!(map.is_attacked(Square::new(2, 2)));

        map.unregister(knight, targets);
        assert_eq!(map, AttackMap::new());
    }

    #[test]
    fn test_multiple_attackers_on_one_square() {
        let mut map = AttackMap::new();
        let target = Square::new(4, 4);
        map.register(Square::new(0, 0), SquareSet::from_square(target));
        map.register(Square::new(7, 4), SquareSet::from_square(target));
        assert_eq!(map.attack_count(target), 2);

        map.unregister(Square::new(0, 0), SquareSet::from_square(target));
        assert_eq!(map.attackers_of(target), SquareSet::from_square(Square::new(7, 4)));
    }
}
