use std::fmt;

use engine::Move;

/// Search result containing best move and evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Score of the chosen line from White's point of view.
    pub evaluation: i32,
    pub depth: u32,
    pub nodes_searched: u64,
}

/// Evaluation constants
pub const MATE_SCORE: i32 = 100_000;
pub const DRAW_SCORE: i32 = 0;
/// Window bound strictly outside any reachable score.
pub const INFINITY: i32 = MATE_SCORE + 1;

/// Maximum search depth
pub const MAX_DEPTH: u32 = 6;
pub const DEFAULT_DEPTH: u32 = 3;

/// Weight of the attacked-squares balance
pub const MOBILITY_WEIGHT: i32 = 3;
/// Weight of the enemy-attacks-around-the-king balance
pub const KING_SAFETY_WEIGHT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Random,
    Minimax,
    #[default]
    AlphaBeta,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Random => "Random",
            Strategy::Minimax => "Minimax",
            Strategy::AlphaBeta => "Alpha-beta",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub depth: u32,
    pub mobility_weight: i32,
    pub king_safety_weight: i32,
    /// Fixed seed for the random strategy; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl SearchConfig {
    pub fn new(strategy: Strategy, depth: u32) -> Self {
        Self {
            strategy,
            depth,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Depth actually searched: at least one ply, at most [`MAX_DEPTH`].
    pub fn effective_depth(&self) -> u32 {
        self.depth.clamp(1, MAX_DEPTH)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::AlphaBeta,
            depth: DEFAULT_DEPTH,
            mobility_weight: MOBILITY_WEIGHT,
            king_safety_weight: KING_SAFETY_WEIGHT,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, Strategy::AlphaBeta);
        assert_eq!(config.depth, 3);
        assert_eq!(config.mobility_weight, 3);
        assert_eq!(config.king_safety_weight, 10);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_depth_is_clamped() {
        assert_eq!(SearchConfig::new(Strategy::Minimax, 0).effective_depth(), 1);
        assert_eq!(SearchConfig::new(Strategy::Minimax, 4).effective_depth(), 4);
        assert_eq!(SearchConfig::new(Strategy::AlphaBeta, 40).effective_depth(), MAX_DEPTH);
    }
}
