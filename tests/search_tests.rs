//! Search tests verifying the engine finds legal, sensible moves.

use chess_engine::board::search::{SearchLimits, ThreadPool};
use chess_engine::board::BitPosition;

fn best_move_at_depth(fen: &str, depth: u32) -> (BitPosition, chess_engine::board::Move) {
    let position = BitPosition::from_fen(fen);
    let pool = ThreadPool::new(1, 1);
    let limits = SearchLimits { depth: Some(depth), ..Default::default() };
    let report = pool.start_thinking(&position, limits);
    (position, report.best_move)
}

#[test]
fn finds_mate_in_one_back_rank() {
    let (mut position, mv) = best_move_at_depth("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 4);
    position.make_move(mv);
    assert!(position.is_checkmate(), "should have found the back-rank mate");
}

#[test]
fn finds_mate_in_one_queen() {
    let (mut position, mv) =
        best_move_at_depth("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4", 4);
    position.make_move(mv);
    assert!(position.is_checkmate(), "should have found Qxf7#");
}

#[test]
fn avoids_hanging_queen() {
    let (_, mv) = best_move_at_depth("r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3", 4);
    assert_ne!(chess_engine::uci::format_uci_move(&mv), "f3c6", "should not hang the queen on c6");
}

#[test]
fn captures_free_piece() {
    let (_, mv) = best_move_at_depth("rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4", 4);
    let uci = chess_engine::uci::format_uci_move(&mv);
    assert!(
        uci == "c4f7" || uci.ends_with("c6"),
        "should capture the free bishop on c6 or find a stronger tactic, got {uci}"
    );
}

#[test]
fn iterative_deepening_stays_within_legal_moves() {
    let position = BitPosition::new();
    let pool = ThreadPool::new(1, 1);
    let legal = position.generate_legal_moves();

    for depth in [2, 4] {
        let limits = SearchLimits { depth: Some(depth), ..Default::default() };
        let report = pool.start_thinking(&position, limits);
        assert!(legal.iter().any(|m| *m == report.best_move), "depth {depth} move should be legal");
    }
}

#[test]
fn single_legal_move_is_found() {
    let (_, mv) = best_move_at_depth("8/8/8/8/8/8/8/K6rk w - - 0 1", 4);
    assert_eq!(chess_engine::uci::format_uci_move(&mv), "a1a2", "only legal move should be Ka2");
}

#[test]
fn identifies_checkmate_and_stalemate() {
    let checkmate = BitPosition::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1");
    assert!(checkmate.is_checkmate());

    let stalemate = BitPosition::from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1");
    assert!(stalemate.is_stalemate());
    assert!(!stalemate.is_checkmate());
}

#[test]
fn fifty_move_rule() {
    let position = BitPosition::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    assert!(position.is_draw());
}

#[test]
fn search_completes_at_depth_6_in_reasonable_time() {
    use std::time::Instant;

    let position = BitPosition::new();
    let pool = ThreadPool::new(1, 1);
    let limits = SearchLimits { depth: Some(6), ..Default::default() };

    let start = Instant::now();
    let report = pool.start_thinking(&position, limits);
    let elapsed = start.elapsed();

    let legal = position.generate_legal_moves();
    assert!(legal.iter().any(|m| *m == report.best_move));
    assert!(elapsed.as_secs() < 60, "search at depth 6 took too long: {elapsed:?}");
}
