use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{GameStatus, Move};

/// Append-only game log kept in memory and written out on demand.
///
/// Basic mode records moves, undos and the game result. Advanced mode also
/// traces the search: root candidates, new best moves, cutoffs and terminal
/// nodes.
#[derive(Debug)]
pub struct ChessLogger {
    pub log_buffer: String,
    pub advanced_logging: bool,
    move_count: u32,
    indent_level: usize,
}

impl ChessLogger {
    pub fn new() -> Self {
        let mut logger = Self {
            log_buffer: String::with_capacity(64 * 1024),
            advanced_logging: false,
            move_count: 0,
            indent_level: 0,
        };

        logger.log("🎯 === Chess Engine Game Log Started ===");
        logger.log(&format!("📅 Date: {}", chrono::Local::now().format("%m/%d/%Y %H:%M:%S")));
        logger
    }

    pub fn should_log_advanced(&self) -> bool {
        self.advanced_logging
    }

    pub fn enable_advanced_logging(&mut self) {
        self.advanced_logging = true;
        self.log("🔬 Advanced logging enabled - search traces active");
    }

    pub fn disable_advanced_logging(&mut self) {
        self.advanced_logging = false;
        self.log("📊 Advanced logging disabled - basic mode active");
    }

    pub fn log(&mut self, message: &str) {
        self.log_buffer.push_str(message);
        self.log_buffer.push('\n');
    }

    pub fn log_with_indent(&mut self, message: &str) {
        let indent = "  ".repeat(self.indent_level);
        self.log_buffer.push_str(&format!("{}{}\n", indent, message));
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    // 🎯 MOVE LOGGING
    pub fn log_human_move(&mut self, mv: Move, time_ms: u64) {
        self.move_count += 1;
        self.log(&format!("{}. {} (Human move - {}ms)", self.move_count, mv, time_ms));
    }

    pub fn log_ai_move(&mut self, mv: Move, time_ms: u64, eval: i32) {
        self.move_count += 1;
        self.log(&format!(
            "{}. {} (AI move - {}ms) Eval: {} {}",
            self.move_count,
            mv,
            time_ms,
            eval,
            if eval > 0 { "📈" } else { "📉" }
        ));
    }

    pub fn log_undo(&mut self, mv: Move) {
        self.move_count = self.move_count.saturating_sub(1);
        self.log(&format!("↩️ UNDO: {}", mv));
    }

    pub fn log_game_end(&mut self, status: GameStatus) {
        match status {
            GameStatus::Checkmate(loser) => {
                self.log(&format!("🏁 Checkmate - {} wins", loser.opposite()))
            }
            GameStatus::Stalemate => self.log("🏁 Stalemate - draw"),
            GameStatus::Check(_) | GameStatus::InProgress => {}
        }
    }

    // 🎯 SEARCH TRACING
    pub fn log_search_start(&mut self, strategy: &str, depth: u32, move_count: usize) {
        if self.should_log_advanced() {
            self.log_with_indent(&format!(
                "🔍 {} search depth {} | Analyzing {} moves",
                strategy, depth, move_count
            ));
            self.increase_indent();
        }
    }

    pub fn log_move_analysis(&mut self, mv: Move, move_num: usize, total_moves: usize, score: i32) {
        if self.should_log_advanced() {
            self.log_with_indent(&format!(
                "🔄 Move {}/{}: {} → Score: {}",
                move_num, total_moves, mv, score
            ));
        }
    }

    pub fn log_alpha_change(&mut self, old_alpha: i32, new_alpha: i32, mv: Move) {
        if self.should_log_advanced() {
            self.log_with_indent(&format!(
                "🎯 NEW BEST MOVE: {} | Alpha: {} → {}",
                mv, old_alpha, new_alpha
            ));
        }
    }

    pub fn log_beta_cutoff(&mut self, beta: i32, score: i32, mv: Move) {
        if self.should_log_advanced() {
            self.log_with_indent(&format!(
                "✂️ BETA CUTOFF! Score {} ≥ Beta {} - pruning after move {}",
                score, beta, mv
            ));
        }
    }

    pub fn log_terminal_node(&mut self, eval: i32, in_check: bool) {
        if self.should_log_advanced() {
            let reason = if in_check { "CHECKMATE" } else { "STALEMATE" };
            self.log_with_indent(&format!("🏁 Terminal node: {} ({})", eval, reason));
        }
    }

    pub fn log_search_complete(&mut self, best_move: Option<Move>, best_score: i32, nodes: u64) {
        if self.should_log_advanced() {
            self.decrease_indent();
            match best_move {
                Some(mv) => self.log_with_indent(&format!(
                    "✅ Search complete: {} (Score: {}) | Nodes: {}",
                    mv, best_score, nodes
                )),
                None => self.log_with_indent("❌ No legal moves found"),
            }
        }
    }

    /// Writes the buffer to `<dir>/<MM_DD_YYYY_HH_MM_SS>.txt`, creating `dir` if needed.
    pub fn save_to_file(&mut self, dir: impl AsRef<Path>, reason: &str) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let now = chrono::Local::now();
        let path = dir.join(format!("{}.txt", now.format("%m_%d_%Y_%H_%M_%S")));

        self.log(&format!("💾 Game ended: {} - Saving log", reason));

        let mut file = File::create(&path)?;
        file.write_all(self.log_buffer.as_bytes())?;
        Ok(path)
    }
}

impl Default for ChessLogger {
    fn default() -> Self {
        Self::new()
    }
}
