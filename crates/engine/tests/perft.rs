use engine::perft::{perft, PERFT_POSITIONS};
use engine::Board;

fn check_position(name: &str, max_depth: u32) {
    let case = PERFT_POSITIONS
        .iter()
        .find(|case| case.name == name)
        .unwrap_or_else(|| panic!("no perft position named {}", name));
    let mut board = Board::from_fen(case.fen).unwrap();
    let fen = board.to_fen();

    for &(depth, expected) in case.expected_results {
        if depth > max_depth {
            break;
        }
        assert_eq!(perft(&mut board, depth), expected, "{} depth {}", name, depth);
    }
    // The walk must leave the board exactly where it started.
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.history_len(), 0);
}

#[test]
fn test_perft_starting_position() {
    check_position("Starting Position", 3);
}

#[test]
fn test_perft_kiwipete() {
    check_position("Kiwipete", 2);
}

#[test]
fn test_perft_position_3() {
    check_position("Position 3", 4);
}

#[test]
fn test_perft_position_6() {
    check_position("Position 6", 2);
}

#[test]
fn test_mover_is_never_left_in_check() {
    let mut board = Board::from_fen(PERFT_POSITIONS[1].fen).unwrap();
    for first in board.valid_moves().to_vec() {
        board.make_move(first.from, first.to).unwrap();
        assert!(!board.is_in_check(board.turn().opposite()), "after {}", first);

        for second in board.valid_moves().to_vec() {
            board.make_move(second.from, second.to).unwrap();
            assert!(
                !board.is_in_check(board.turn().opposite()),
                "after {} {}",
                first,
                second
            );
            board.undo_move();
        }
        board.undo_move();
    }
}
