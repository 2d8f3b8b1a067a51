use std::io::Write;
use std::process::{Command, Stdio};

use chess_engine::board::BitPosition;
use chess_engine::uci::{parse_position_command, parse_uci_move};

#[test]
fn uci_smoke_test_returns_legal_move() {
    let exe = env!("CARGO_BIN_EXE_chess_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"uci\nisready\nposition startpos moves e2e4\ngo movetime 50\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("uciok"));
    assert!(stdout.contains("readyok"));

    let bestmove = stdout
        .lines()
        .filter(|line| line.starts_with("bestmove"))
        .last()
        .expect("no bestmove found");
    let parts: Vec<&str> = bestmove.split_whitespace().collect();
    assert!(parts.len() >= 2, "bestmove missing move: {bestmove}");
    let mv = parts[1];
    assert_ne!(mv, "0000", "engine returned null move");

    let mut position = BitPosition::new();
    let setup = ["position", "startpos", "moves", "e2e4"];
    parse_position_command(&mut position, &setup);

    let legal = parse_uci_move(&position, mv).is_some();
    assert!(legal, "bestmove not legal in position: {mv}");
}

#[test]
fn setoption_hash_and_threads_are_accepted() {
    let exe = env!("CARGO_BIN_EXE_chess_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"uci\nsetoption name Hash value 32\nsetoption name Threads value 2\nisready\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("readyok"), "engine should still answer isready after setoption: {stdout}");
}
