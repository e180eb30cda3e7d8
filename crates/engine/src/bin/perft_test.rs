use engine::perft::*;
use engine::Board;

// Usage: perft_test [max_depth] [fen]
fn main() {
    let mut args = std::env::args().skip(1);
    let max_depth = args.next().and_then(|arg| arg.parse::<u32>().ok());
    let fen: Vec<String> = args.collect();

    if fen.is_empty() {
        let passed = run_all_tests(max_depth.or(Some(4)));
        std::process::exit(if passed { 0 } else { 1 });
    }

    let fen = fen.join(" ");
    let mut board = match Board::from_fen(&fen) {
        Ok(board) => board,
        Err(error) => {
            eprintln!("❌ {}", error);
            std::process::exit(2);
        }
    };
    println!("{}\n", board);

    let depth = max_depth.unwrap_or(3);
    let result = perft_detailed(&mut board, depth);
    println!("🎯 Perft depth {}: {} nodes in {}ms", depth, result.nodes, result.time_ms);
    println!(
        "├─ Captures: {} | En passant: {} | Castles: {} | Promotions: {}",
        result.captures, result.en_passant, result.castles, result.promotions
    );
    println!("└─ Checks: {} | Checkmates: {}", result.checks, result.checkmates);
    println!("⚡ {} nodes/sec", result.nodes_per_second());
}
