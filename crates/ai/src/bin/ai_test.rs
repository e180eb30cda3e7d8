use ai::{Game, SearchConfig, SearchEngine, Strategy};
use engine::{Board, GameStatus};

fn main() {
    println!("🤖 Testing Search Strategies");
    println!("{}", "=".repeat(50));

    // Test with a simple tactical position
    let tactical_fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 4 4";
    for strategy in [Strategy::Random, Strategy::Minimax, Strategy::AlphaBeta] {
        let mut board = match Board::from_fen(tactical_fen) {
            Ok(board) => board,
            Err(error) => {
                eprintln!("❌ {}", error);
                return;
            }
        };
        let config = SearchConfig::new(strategy, 3).with_seed(7);
        let mut search_engine = SearchEngine::with_config(config);

        let start_time = std::time::Instant::now();
        let result = search_engine.search(&mut board);
        match result.best_move {
            Some(mv) => {
                println!("✅ {}: {} ({}ms)", strategy, mv, start_time.elapsed().as_millis());
                println!("   📊 Evaluation: {}", result.evaluation);
                println!("   🔍 Nodes searched: {}", result.nodes_searched);
            }
            None => println!("❌ {}: no move found!", strategy),
        }
    }

    println!("\n🎯 Engine self-play (alpha-beta, depth 2)");
    let mut game = Game::new();
    game.add_evaluation_listener(|eval| println!("   📈 evaluation {}", eval));
    for _ in 0..20 {
        let Some(result) = game.engine_reply(Strategy::AlphaBeta, 2) else {
            break;
        };
        if let Some(mv) = result.best_move {
            println!("{} plays {}", game.board().turn().opposite(), mv);
        }
        if matches!(game.status(), GameStatus::Checkmate(_) | GameStatus::Stalemate) {
            break;
        }
    }
    println!("{}", game.board());
    println!("Status: {:?}", game.status());

    match game.save_log("logs", "ai_test finished") {
        Ok(path) => println!("💾 Log saved to {}", path.display()),
        Err(error) => eprintln!("❌ Failed to save log: {}", error),
    }
}
