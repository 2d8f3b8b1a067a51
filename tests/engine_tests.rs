use std::time::Duration;

use chess_engine::board::search::{SearchLimits, ThreadPool};
use chess_engine::board::BitPosition;

#[test]
fn engine_depth_search_returns_legal_move() {
    let pool = ThreadPool::new(1, 1);
    let position = BitPosition::new();
    let limits = SearchLimits { depth: Some(3), ..Default::default() };

    let report = pool.start_thinking(&position, limits);

    let legal = position.generate_legal_moves();
    assert!(legal.iter().any(|m| *m == report.best_move), "bestmove should be a legal root move");
}

#[test]
fn engine_time_limited_search_returns_within_time() {
    let pool = ThreadPool::new(1, 1);
    let position = BitPosition::new();
    let limits = SearchLimits { movetime: Some(Duration::from_millis(50)), ..Default::default() };

    let start = std::time::Instant::now();
    let _report = pool.start_thinking(&position, limits);
    assert!(start.elapsed() < Duration::from_secs(5), "movetime search overran its budget");
}

#[test]
fn lazy_smp_pool_agrees_on_a_legal_move() {
    let pool = ThreadPool::new(2, 1);
    let position = BitPosition::new();
    let limits = SearchLimits { depth: Some(3), ..Default::default() };

    let report = pool.start_thinking(&position, limits);

    let legal = position.generate_legal_moves();
    assert!(legal.iter().any(|m| *m == report.best_move));
}
