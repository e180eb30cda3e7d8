use ai::{SearchConfig, SearchEngine, Strategy};
use engine::Board;

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq -",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
    "3r3k/4P3/8/8/8/8/8/4K3 w - -",
    "r3k2r/8/8/8/8/8/8/R3K2R b KQkq -",
];

fn search(fen: &str, strategy: Strategy, depth: u32) -> ai::SearchResult {
    let mut board = Board::from_fen(fen).unwrap();
    let mut engine = SearchEngine::with_config(SearchConfig::new(strategy, depth));
    let result = engine.search(&mut board);
    assert_eq!(board.to_fen(), Board::from_fen(fen).unwrap().to_fen());
    result
}

#[test]
fn test_minimax_and_alphabeta_agree_on_value() {
    for fen in POSITIONS {
        for depth in 1..=2 {
            let minimax = search(fen, Strategy::Minimax, depth);
            let alphabeta = search(fen, Strategy::AlphaBeta, depth);
            assert_eq!(minimax.evaluation, alphabeta.evaluation, "{} depth {}", fen, depth);
            assert!(alphabeta.nodes_searched <= minimax.nodes_searched);
        }
    }
}

#[test]
fn test_minimax_and_alphabeta_agree_at_depth_three() {
    let fen = POSITIONS[2];
    let minimax = search(fen, Strategy::Minimax, 3);
    let alphabeta = search(fen, Strategy::AlphaBeta, 3);
    assert_eq!(minimax.evaluation, alphabeta.evaluation);
    assert!(alphabeta.nodes_searched < minimax.nodes_searched);
}

#[test]
fn test_random_strategy_is_reproducible_with_seed() {
    let pick = |seed: u64| {
        let mut board = Board::new();
        let config = SearchConfig::new(Strategy::Random, 1).with_seed(seed);
        SearchEngine::with_config(config).search(&mut board).best_move
    };

    let first = pick(42).unwrap();
    assert_eq!(pick(42), Some(first));
    assert!(Board::new().valid_moves().contains(&first));
}

#[test]
fn test_play_applies_the_chosen_move() {
    let mut board = Board::new();
    let mut engine = SearchEngine::with_config(SearchConfig::new(Strategy::AlphaBeta, 2));
    let result = engine.play(&mut board).unwrap();
    let chosen = result.best_move.unwrap();
    let played = board.moves_made()[0];
    assert_eq!((played.from, played.to), (chosen.from, chosen.to));
    assert_eq!(board.turn(), engine::Color::Black);
}
