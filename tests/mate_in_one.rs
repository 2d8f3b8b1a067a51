use chess_engine::board::BitPosition;
use chess_engine::uci::parse_position_command;

struct MateInOne {
    fen: &'static str,
    mv: &'static str,
}

const PROBLEMS: &[MateInOne] = &[
    MateInOne { fen: "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", mv: "e1e8" },
    MateInOne { fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4", mv: "h5f7" },
    MateInOne { fen: "6k1/8/8/r7/8/8/5PPP/6K1 b - - 0 1", mv: "a5a1" },
];

#[test]
fn mate_in_one_suite() {
    for problem in PROBLEMS {
        let mut position = BitPosition::from_fen(problem.fen);
        let mv = chess_engine::uci::parse_uci_move(&position, problem.mv)
            .unwrap_or_else(|| panic!("{} is not a legal move in {}", problem.mv, problem.fen));
        position.make_move(mv);

        assert!(position.is_checkmate(), "{} should be mate in one after {}", problem.fen, problem.mv);
    }
}

#[test]
fn position_command_replays_moves_up_to_the_mate() {
    let mut position = BitPosition::new();
    let parts = [
        "position", "fen", "rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR", "w", "KQkq", "-", "0", "1",
    ];
    parse_position_command(&mut position, &parts);
    assert!(position.is_checkmate());
}
