use std::time::Instant;

use chess_engine::board::BitPosition;

fn perft(position: &mut BitPosition, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in &moves {
        let undo = position.make_move(*mv);
        nodes += perft(position, depth - 1);
        position.unmake_move(*mv, undo);
    }
    nodes
}

fn main() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut position = BitPosition::from_fen(fen);
    let depth = 3;
    println!("Perft divide for Kiwipete depth {depth}");
    let start = Instant::now();

    let mut root_moves: Vec<_> = position.generate_legal_moves().iter().copied().collect();
    root_moves.sort_by_key(|m| m.as_u16());

    let mut total = 0u64;
    for mv in &root_moves {
        let undo = position.make_move(*mv);
        let count = perft(&mut position, depth - 1);
        position.unmake_move(*mv, undo);
        println!("  {mv}: {count}");
        total += count;
    }

    let elapsed = start.elapsed();
    println!("Total: {total} in {elapsed:?}");
}
