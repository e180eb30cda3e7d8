use engine::{Board, Color, GameStatus, QUEEN_DIRECTIONS};

use crate::types::*;

/// Static evaluation from White's point of view.
///
/// Material and positional terms come from the board's incrementally kept
/// evaluation; mobility and king safety are read from the attack maps.
pub fn evaluate_position(board: &Board, config: &SearchConfig) -> i32 {
    match board.status() {
        GameStatus::Checkmate(loser) => -loser.sign() * MATE_SCORE,
        GameStatus::Stalemate => DRAW_SCORE,
        GameStatus::Check(_) | GameStatus::InProgress => {
            board.evaluation()
                + config.mobility_weight * mobility(board)
                + config.king_safety_weight * king_safety(board)
        }
    }
}

/// Static evaluation from the side to move's point of view, as negamax wants it.
pub fn evaluate_relative(board: &Board, config: &SearchConfig) -> i32 {
    board.turn().sign() * evaluate_position(board, config)
}

/// White's total attack-map entries minus Black's.
pub fn mobility(board: &Board) -> i32 {
    board.attack_map(Color::White).total_influence() as i32
        - board.attack_map(Color::Black).total_influence() as i32
}

/// Enemy attacks on the squares around each king, signed against the king's owner.
pub fn king_safety(board: &Board) -> i32 {
    let mut safety = 0;
    for color in Color::ALL {
        let king = board.king_square(color);
        let enemy = board.attack_map(color.opposite());
        for direction in QUEEN_DIRECTIONS {
            if let Some(square) = king.offset(direction, 1) {
                safety -= color.sign() * enemy.attack_count(square) as i32;
            }
        }
    }
    safety
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Square;

    #[test]
    fn test_starting_position_is_balanced() {
        let board = Board::new();
        let config = SearchConfig::default();
        assert_eq!(mobility(&board), 0);
        assert_eq!(king_safety(&board), 0);
        assert_eq!(evaluate_position(&board, &config), 0);
    }

    #[test]
    fn test_checkmate_scores_against_the_mated_side() {
        let mut board = Board::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            board
                .make_move(
                    Square::from_algebraic(from).unwrap(),
                    Square::from_algebraic(to).unwrap(),
                )
                .unwrap();
        }
        let config = SearchConfig::default();
        assert_eq!(evaluate_position(&board, &config), -MATE_SCORE);
        assert_eq!(evaluate_relative(&board, &config), -MATE_SCORE);
    }

    #[test]
    fn test_stalemate_is_a_draw() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - -").unwrap();
        assert_eq!(evaluate_position(&board, &SearchConfig::default()), DRAW_SCORE);
    }

    #[test]
    fn test_king_safety_counts_attacks_near_king() {
        // The queen's check runs through f2, the only attacked square next to the white king.
        let board = Board::from_fen("4k3/8/8/8/7q/8/8/4K3 w - -").unwrap();
        assert_eq!(king_safety(&board), -1);
    }

    #[test]
    fn test_weights_are_applied() {
        let board = Board::from_fen("4k3/8/8/8/7q/8/8/4K3 w - -").unwrap();
        let plain = SearchConfig {
            mobility_weight: 0,
            king_safety_weight: 0,
            ..SearchConfig::default()
        };
        assert_eq!(evaluate_position(&board, &plain), board.evaluation());

        let weighted = SearchConfig::default();
        assert_eq!(
            evaluate_position(&board, &weighted),
            board.evaluation() + 3 * mobility(&board) + 10 * king_safety(&board)
        );
    }
}
