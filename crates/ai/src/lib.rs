pub mod evaluation;
pub mod game;
pub mod search;
pub mod types;

pub use evaluation::*;
pub use game::Game;
pub use search::*;
pub use types::*;
