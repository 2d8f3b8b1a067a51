use std::env;

use chess_engine::board::BitPosition;
use chess_engine::uci::{format_uci_move, parse_position_command};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        eprintln!("usage: check_mate_status <move1> <move2> ...");
        return;
    }

    let mut position = BitPosition::new();
    let mut parts: Vec<&str> = vec!["position", "startpos", "moves"];
    for mv in args.iter().skip(1) {
        parts.push(mv.as_str());
    }

    parse_position_command(&mut position, &parts);

    let legal_moves = position.generate_legal_moves();
    let in_checkmate = position.is_checkmate();
    let in_stalemate = position.is_stalemate();
    println!("side_to_move: {}", if position.side_to_move() == chess_engine::board::Color::White { "white" } else { "black" });
    println!("legal_moves: {}", legal_moves.len());
    println!("checkmate: {in_checkmate}");
    println!("stalemate: {in_stalemate}");
    for mv in &legal_moves {
        println!("{}", format_uci_move(mv));
    }
}
