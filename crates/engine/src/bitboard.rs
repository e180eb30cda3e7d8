use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::types::Square;

/// Set of squares packed into a 64-bit board, bit `n` = `Square(n)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(pub u64);

// Rank masks
pub const RANK_1: SquareSet = SquareSet(0x0000_0000_0000_00FF);
pub const RANK_8: SquareSet = SquareSet(0xFF00_0000_0000_0000);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    pub const fn from_square(square: Square) -> Self {
        SquareSet(1u64 << square.0)
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.0;
    }

    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square.0);
    }

    pub const fn contains(self, square: Square) -> bool {
        (self.0 & (1u64 << square.0)) != 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> SquareIter {
        SquareIter { bits: self.0 }
    }
}

impl BitOr for SquareSet {
    type Output = SquareSet;

    fn bitor(self, rhs: SquareSet) -> SquareSet {
        SquareSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SquareSet {
    type Output = SquareSet;

    fn bitand(self, rhs: SquareSet) -> SquareSet {
        SquareSet(self.0 & rhs.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for square in iter {
            set.insert(square);
        }
        set
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareIter;

    fn into_iter(self) -> SquareIter {
        self.iter()
    }
}

// Pop LSB (remove and return the least significant bit)
fn pop_lsb(bits: &mut u64) -> Option<u8> {
    if *bits == 0 {
        None
    } else {
        let lsb = bits.trailing_zeros() as u8;
        *bits &= *bits - 1;
        Some(lsb)
    }
}

/// Ascending iteration over the squares of a set.
pub struct SquareIter {
    bits: u64,
}

impl Iterator for SquareIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        pop_lsb(&mut self.bits).map(Square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_contains() {
        let e4 = Square::new(3, 4);
        let mut set = SquareSet::EMPTY;
        set.insert(e4);
        assert!(set.contains(e4));
        assert_eq!(set.len(), 1);

        set.remove(e4);
        assert!(set.is_empty());
    }

    #[test]
    fn test_iteration_is_ascending() {
        let squares = [Square(63), Square(0), Square(28), Square(7)];
        let set: SquareSet = squares.iter().copied().collect();
        let collected: Vec<Square> = set.iter().collect();
        assert_eq!(collected, vec![Square(0), Square(7), Square(28), Square(63)]);
    }

    #[test]
    fn test_rank_masks() {
        assert_eq!(RANK_1.len(), 8);
        assert!(RANK_1.contains(Square::new(0, 0)));
        assert!(RANK_8.contains(Square::new(7, 7)));
        assert!((RANK_1 & RANK_8).is_empty());
        assert_eq!((RANK_1 | RANK_8).len(), 16);
    }
}
