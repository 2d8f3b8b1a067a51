use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chess_engine::board::nnue;
use chess_engine::board::search::{SearchLogger, StdoutLogger};
use chess_engine::board::DEFAULT_TT_MB;
use chess_engine::engine::{limits_from_go_params, EngineController};
use chess_engine::uci::options::{parse_setoption, UciOptionAction, UciOptions};
use chess_engine::uci::{self, UciCommand};

fn main() {
    let mut controller = EngineController::new(DEFAULT_TT_MB);
    let mut options = UciOptions::new(DEFAULT_TT_MB);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(command) = uci::parse_uci_command(&line) else { continue };

        match command {
            UciCommand::Uci => {
                options.print();
                let _ = io::stdout().flush();
            }
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => controller.new_game(),
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let mut position = controller.position().clone();
                uci::parse_position_command(&mut position, &parts);
                controller.set_position(position);
            }
            UciCommand::Go(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let params = uci::parse_go_params(&parts);
                let limits = limits_from_go_params(&params);
                let logger: Arc<dyn SearchLogger> = Arc::new(StdoutLogger);
                controller.start_search(limits, Some(logger), |report| {
                    let best = uci::format_uci_move(&report.best_move);
                    match report.ponder_move {
                        Some(ponder) => println!("bestmove {best} ponder {}", uci::format_uci_move(&ponder)),
                        None => println!("bestmove {best}"),
                    }
                    let _ = io::stdout().flush();
                });
            }
            UciCommand::Stop => controller.signal_stop(),
            UciCommand::PonderHit => {}
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Some((name, value)) = parse_setoption(&parts) {
                    if let Some(action) = options.apply_setoption(&name, value.as_deref()) {
                        apply_option_action(action, &mut controller);
                    }
                }
            }
            UciCommand::Debug(_) | UciCommand::Perft(_) | UciCommand::Unknown(_) => {}
            UciCommand::Quit => {
                controller.stop_search();
                break;
            }
        }
    }
}

fn apply_option_action(action: UciOptionAction, controller: &mut EngineController) {
    match action {
        UciOptionAction::ReinitHash(mb) => controller.resize_hash(mb),
        UciOptionAction::SetThreads(n) => controller.set_threads(n),
        UciOptionAction::LoadEvalFile(path) => {
            if let Err(e) = nnue::load_from_dir(std::path::Path::new(&path)) {
                report_eval_load_failure(&path, &e);
            }
        }
    }
}

#[cfg(feature = "logging")]
fn report_eval_load_failure(path: &str, err: &nnue::NnueLoadError) {
    log::error!("failed to load EvalFile {path}: {err}");
    println!("info string failed to load EvalFile {path}: {err}");
}

#[cfg(not(feature = "logging"))]
fn report_eval_load_failure(path: &str, err: &nnue::NnueLoadError) {
    eprintln!("info string failed to load EvalFile {path}: {err}");
}
