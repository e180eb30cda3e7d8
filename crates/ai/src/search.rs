use engine::{Board, ChessLogger, Move};
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{evaluation::*, types::*};

/// Fixed-depth adversarial search over a board used as a scratchpad.
///
/// Every strategy walks the tree with `make_move` / `undo_move` in strict LIFO
/// order, so the board is back where it started when a search returns.
pub struct SearchEngine {
    pub nodes_searched: u64,
    config: SearchConfig,
    rng: StdRng,
    logger: ChessLogger,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            nodes_searched: 0,
            config,
            rng,
            logger: ChessLogger::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    /// Log used when searching without an external logger.
    pub fn logger(&self) -> &ChessLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut ChessLogger {
        &mut self.logger
    }

    /// Picks a move for the side to move without changing the board.
    pub fn search(&mut self, board: &mut Board) -> SearchResult {
        let mut logger = std::mem::take(&mut self.logger);
        let result = self.search_with_logger(board, &mut logger);
        self.logger = logger;
        result
    }

    pub fn search_with_logger(&mut self, board: &mut Board, logger: &mut ChessLogger) -> SearchResult {
        self.nodes_searched = 0;
        let depth = self.config.effective_depth();
        let strategy = self.config.strategy;
        logger.log_search_start(&strategy.to_string(), depth, board.valid_moves().len());

        let (best_move, score) = match strategy {
            Strategy::Random => self.random_root(board),
            Strategy::Minimax => self.minimax_root(board, depth, logger),
            Strategy::AlphaBeta => self.alphabeta_root(board, depth, logger),
        };

        logger.log_search_complete(best_move, score, self.nodes_searched);
        SearchResult {
            best_move,
            evaluation: board.turn().sign() * score,
            depth,
            nodes_searched: self.nodes_searched,
        }
    }

    /// Searches and applies the chosen move. `None` when there is no legal move.
    pub fn play(&mut self, board: &mut Board) -> Option<SearchResult> {
        let result = self.search(board);
        let mv = result.best_move?;
        board.make_move(mv.from, mv.to).ok()?;
        Some(result)
    }

    fn random_root(&mut self, board: &Board) -> (Option<Move>, i32) {
        let best_move = board.valid_moves().choose(&mut self.rng).copied();
        (best_move, evaluate_relative(board, &self.config))
    }

    fn minimax_root(&mut self, board: &mut Board, depth: u32, logger: &mut ChessLogger) -> (Option<Move>, i32) {
        let moves = board.valid_moves().to_vec();
        if moves.is_empty() {
            return (None, self.terminal(board, logger));
        }

        let mut best_score = -INFINITY;
        let mut best_move = None;

        for (index, &mv) in moves.iter().enumerate() {
            if board.make_move(mv.from, mv.to).is_ok() {
                let score = -self.minimax(board, depth - 1, logger);
                board.undo_move();

                logger.log_move_analysis(mv, index + 1, moves.len(), score);
                if score > best_score {
                    logger.log_alpha_change(best_score, score, mv);
                    best_score = score;
                    best_move = Some(mv);
                }
            }
        }

        (best_move, best_score)
    }

    fn minimax(&mut self, board: &mut Board, depth: u32, logger: &mut ChessLogger) -> i32 {
        self.nodes_searched += 1;

        if board.valid_moves().is_empty() {
            return self.terminal(board, logger);
        }
        if depth == 0 {
            return evaluate_relative(board, &self.config);
        }

        let mut best_score = -INFINITY;
        for mv in board.valid_moves().to_vec() {
            if board.make_move(mv.from, mv.to).is_ok() {
                let score = -self.minimax(board, depth - 1, logger);
                board.undo_move();
                best_score = best_score.max(score);
            }
        }
        best_score
    }

    fn alphabeta_root(&mut self, board: &mut Board, depth: u32, logger: &mut ChessLogger) -> (Option<Move>, i32) {
        let mut moves = board.valid_moves().to_vec();
        if moves.is_empty() {
            return (None, self.terminal(board, logger));
        }
        order_moves(board, &mut moves);

        let mut best_score = -INFINITY;
        let mut best_move = None;
        let mut alpha = -INFINITY;
        let beta = INFINITY;

        for (index, &mv) in moves.iter().enumerate() {
            if board.make_move(mv.from, mv.to).is_ok() {
                let score = -self.alphabeta(board, depth - 1, -beta, -alpha, logger);
                board.undo_move();

                logger.log_move_analysis(mv, index + 1, moves.len(), score);
                if score > best_score {
                    logger.log_alpha_change(best_score, score, mv);
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            }
        }

        (best_move, best_score)
    }

    /// Fail-soft alpha-beta in negamax form.
    fn alphabeta(&mut self, board: &mut Board, depth: u32, mut alpha: i32, beta: i32, logger: &mut ChessLogger) -> i32 {
        self.nodes_searched += 1;

        if board.valid_moves().is_empty() {
            return self.terminal(board, logger);
        }
        if depth == 0 {
            return evaluate_relative(board, &self.config);
        }

        let mut moves = board.valid_moves().to_vec();
        order_moves(board, &mut moves);

        let mut best_score = -INFINITY;
        for mv in moves {
            if board.make_move(mv.from, mv.to).is_ok() {
                let score = -self.alphabeta(board, depth - 1, -beta, -alpha, logger);
                board.undo_move();

                best_score = best_score.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    logger.log_beta_cutoff(beta, score, mv);
                    break;
                }
            }
        }
        best_score
    }

    fn terminal(&self, board: &Board, logger: &mut ChessLogger) -> i32 {
        let eval = evaluate_relative(board, &self.config);
        logger.log_terminal_node(eval, board.is_in_check(board.turn()));
        eval
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Captures first, by captured value minus own value, best trade first. The
/// sort is stable, so ties and quiet moves keep generation order.
pub fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|mv| match mv.captured {
        Some(victim) => {
            let gain = board.piece(victim).kind.value() - board.piece(mv.piece).kind.value();
            (0, -gain)
        }
        None => (1, 0),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Square;

    fn square(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_order_moves_puts_best_trade_first() {
        // Pawn and queen can both take the knight on d5; the pawn trade sorts first.
        let board = Board::from_fen("4k3/8/8/3n4/4P3/8/8/3QK3 w - -").unwrap();
        let mut moves = board.valid_moves().to_vec();
        order_moves(&board, &mut moves);

        assert!(moves[0].is_capture());
        assert_eq!(moves[0].to, square("d5"));
        assert!(moves[2..].iter().all(|mv| !mv.is_capture()));
        assert_eq!(moves[0].from, square("e4"));
        assert_eq!(moves[1].from, square("d1"));
    }

    #[test]
    fn test_alphabeta_takes_hanging_queen() {
        let mut board = Board::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - -").unwrap();
        let mut engine = SearchEngine::with_config(SearchConfig::new(Strategy::AlphaBeta, 2));
        let result = engine.search(&mut board);
        let best = result.best_move.unwrap();
        assert_eq!((best.from, best.to), (square("d2"), square("d5")));
        assert!(result.evaluation > 0);
        assert!(result.nodes_searched > 0);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let mut board = Board::new();
        let fen = board.to_fen();
        let mut engine = SearchEngine::with_config(SearchConfig::new(Strategy::Minimax, 2));
        engine.search(&mut board);
        assert_eq!(board.to_fen(), fen);
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_no_legal_moves_is_noop() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - -").unwrap();
        let mut engine = SearchEngine::new();
        assert_eq!(engine.play(&mut board), None);
        assert_eq!(board.moves_made().len(), 0);
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Back-rank mate with Ra8.
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - -").unwrap();
        for strategy in [Strategy::Minimax, Strategy::AlphaBeta] {
            let mut engine = SearchEngine::with_config(SearchConfig::new(strategy, 1));
            let result = engine.search(&mut board);
            let best = result.best_move.unwrap();
            assert_eq!((best.from, best.to), (square("a1"), square("a8")), "{}", strategy);
            assert_eq!(result.evaluation, MATE_SCORE);
        }
    }

    #[test]
    fn test_advanced_logging_records_cutoffs() {
        let mut board = Board::new();
        let mut engine = SearchEngine::with_config(SearchConfig::new(Strategy::AlphaBeta, 3));
        engine.logger_mut().enable_advanced_logging();
        engine.search(&mut board);
        let log = &engine.logger().log_buffer;
        assert!(log.contains("Alpha-beta search depth 3"));
        assert!(log.contains("BETA CUTOFF"));
        assert!(log.contains("Search complete"));
    }
}
