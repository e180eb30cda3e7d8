pub mod attack_map;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod logger;
pub mod perft;
pub mod piece;
pub mod tables;
pub mod types;

pub use attack_map::AttackMap;
pub use bitboard::*;
pub use board::Board;
pub use error::{BoardError, BoardResult};
pub use logger::ChessLogger;
pub use perft::*;
pub use piece::Piece;
pub use types::*;
