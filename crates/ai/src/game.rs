//! A single game: one board, one search engine and the game log, exposed
//! through the operations a front end needs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use engine::{Board, BoardResult, ChessLogger, GameStatus, Move, Square};

use crate::search::SearchEngine;
use crate::types::{SearchConfig, SearchResult, Strategy};

pub struct Game {
    board: Board,
    engine: SearchEngine,
    logger: ChessLogger,
}

impl Game {
    pub fn new() -> Self {
        Self::with_board(Board::new(), SearchConfig::default())
    }

    pub fn from_fen(fen: &str) -> BoardResult<Self> {
        Ok(Self::with_board(Board::from_fen(fen)?, SearchConfig::default()))
    }

    pub fn with_board(board: Board, config: SearchConfig) -> Self {
        Self {
            board,
            engine: SearchEngine::with_config(config),
            logger: ChessLogger::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn logger(&self) -> &ChessLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut ChessLogger {
        &mut self.logger
    }

    pub fn legal_destinations(&self, row: i8, column: i8) -> BoardResult<Vec<Square>> {
        self.board.legal_destinations(row, column)
    }

    /// Applies a player's move given as `(row, column)` pairs.
    pub fn submit_move(&mut self, from: (i8, i8), to: (i8, i8)) -> BoardResult<Move> {
        let from = Square::try_new(from.0, from.1)?;
        let to = Square::try_new(to.0, to.1)?;

        let start = Instant::now();
        let record = self.board.make_move(from, to)?;
        self.logger.log_human_move(record, start.elapsed().as_millis() as u64);
        self.logger.log_game_end(self.board.status());
        Ok(record)
    }

    /// Searches for and plays the engine's reply. `None` when the side to move
    /// has no legal move.
    pub fn engine_reply(&mut self, strategy: Strategy, depth: u32) -> Option<SearchResult> {
        self.engine.set_strategy(strategy);
        self.engine.set_depth(depth);

        let start = Instant::now();
        // Search a listener-free copy so observers only see the move actually played.
        let mut scratch = self.board.detached();
        let result = self.engine.search_with_logger(&mut scratch, &mut self.logger);
        let mv = result.best_move?;
        let record = self.board.make_move(mv.from, mv.to).ok()?;

        self.logger
            .log_ai_move(record, start.elapsed().as_millis() as u64, result.evaluation);
        self.logger.log_game_end(self.board.status());
        Some(result)
    }

    pub fn undo(&mut self) -> Option<Move> {
        let record = self.board.undo_move()?;
        self.logger.log_undo(record);
        Some(record)
    }

    pub fn evaluation(&self) -> i32 {
        self.board.evaluation()
    }

    pub fn add_evaluation_listener<F>(&mut self, listener: F)
    where
        F: FnMut(i32) + 'static,
    {
        self.board.add_evaluation_listener(listener);
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn save_log(&mut self, dir: impl AsRef<Path>, reason: &str) -> io::Result<PathBuf> {
        self.logger.save_to_file(dir, reason)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::BoardError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_submit_move_validates_coordinates() {
        let mut game = Game::new();
        assert_eq!(
            game.submit_move((1, 4), (8, 4)),
            Err(BoardError::OutOfBounds { row: 8, column: 4 })
        );
        assert!(matches!(
            game.submit_move((1, 4), (4, 4)),
            Err(BoardError::IllegalMove { .. })
        ));
        assert!(game.board().moves_made().is_empty());

        let record = game.submit_move((1, 4), (3, 4)).unwrap();
        assert_eq!(record.to_string(), "e2e4");
        assert!(game.logger().log_buffer.contains("1. e2e4 (Human move"));
    }

    #[test]
    fn test_engine_reply_plays_for_side_to_move() {
        let mut game = Game::new();
        game.submit_move((1, 4), (3, 4)).unwrap();
        let result = game.engine_reply(Strategy::AlphaBeta, 2).unwrap();

        assert_eq!(game.board().moves_made().len(), 2);
        let chosen = result.best_move.unwrap();
        let played = game.board().moves_made()[1];
        assert_eq!((played.from, played.to), (chosen.from, chosen.to));
        assert_eq!(game.board().turn(), engine::Color::White);
        assert!(game.logger().log_buffer.contains("(AI move"));
    }

    #[test]
    fn test_listener_sees_only_played_moves() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut game = Game::new();
        game.add_evaluation_listener(move |_| *counter.borrow_mut() += 1);

        game.engine_reply(Strategy::Minimax, 2);
        assert!(*calls.borrow() <= 1);
    }

    #[test]
    fn test_undo_and_checkmate_status() {
        let mut game = Game::new();
        for (from, to) in [((1, 5), (2, 5)), ((6, 4), (4, 4)), ((1, 6), (3, 6)), ((7, 3), (3, 7))] {
            game.submit_move(from, to).unwrap();
        }
        assert_eq!(game.status(), GameStatus::Checkmate(engine::Color::White));
        assert!(game.logger().log_buffer.contains("Checkmate - Black wins"));
        assert_eq!(game.engine_reply(Strategy::Random, 1), None);

        let undone = game.undo().unwrap();
        assert_eq!(undone.to_string(), "d8h4");
        assert_eq!(game.status(), GameStatus::InProgress);
    }
}
