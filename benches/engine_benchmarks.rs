//! Benchmarks for chess engine performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_engine::board::nnue::Network;
use chess_engine::board::search::{SearchLimits, ThreadPool};
use chess_engine::board::{BitPosition, Color, DEFAULT_TT_MB};

fn perft(position: &mut BitPosition, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves.iter() {
        let undo = position.make_move(*mv);
        nodes += perft(position, depth - 1);
        position.unmake_move(*mv, undo);
    }
    nodes
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = BitPosition::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(&mut startpos, black_box(depth)))
        });
    }

    let mut kiwipete = BitPosition::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(&mut kiwipete, black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = BitPosition::new();
    group.bench_function("startpos", |b| b.iter(|| black_box(startpos.generate_legal_moves())));

    let middlegame = BitPosition::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
    group.bench_function("middlegame", |b| b.iter(|| black_box(middlegame.generate_legal_moves())));

    let kiwipete = BitPosition::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    group.bench_function("kiwipete", |b| b.iter(|| black_box(kiwipete.generate_legal_moves())));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let position = BitPosition::new();
                let pool = ThreadPool::new(1, DEFAULT_TT_MB);
                let limits = SearchLimits { depth: Some(depth), ..Default::default() };
                pool.start_thinking(&position, limits)
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let position = BitPosition::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
                let pool = ThreadPool::new(1, DEFAULT_TT_MB);
                let limits = SearchLimits { depth: Some(depth), ..Default::default() };
                pool.start_thinking(&position, limits)
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    for (name, fen) in positions {
        let mut position = BitPosition::from_fen(fen);
        group.bench_with_input(BenchmarkId::new("position", name), &fen, |b, _| {
            b.iter(|| black_box(Network::evaluate(&mut position, Color::White)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
