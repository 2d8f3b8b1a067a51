//! UCI `option` declarations and `setoption` handling.

use crate::board::DEFAULT_TT_MB;

/// Upper bound on the UCI `Hash` option, in megabytes (32 TiB).
const MAX_HASH_MB: usize = 33_554_432;

/// Print a UCI spin option.
fn print_spin(name: &str, default: impl std::fmt::Display, min: impl std::fmt::Display, max: impl std::fmt::Display) {
    println!("option name {name} type spin default {default} min {min} max {max}");
}

fn print_string(name: &str, default: &str) {
    println!("option name {name} type string default {default}");
}

/// An effect `apply_setoption` couldn't carry out itself because it needs
/// access to the thread pool / NNUE loader owned by the engine controller.
pub enum UciOptionAction {
    ReinitHash(usize),
    SetThreads(usize),
    LoadEvalFile(String),
}

pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
}

impl UciOptions {
    #[must_use]
    pub fn new(hash_mb: usize) -> Self {
        UciOptions { hash_mb, threads: 1 }
    }

    pub fn print(&self) {
        println!("id name chess_engine");
        println!("id author Dean Menezes");

        print_spin("Hash", self.hash_mb, 1, MAX_HASH_MB);
        print_spin("Threads", self.threads, 1, 64);
        print_string("EvalFile", "<empty>");

        println!("uciok");
    }

    #[must_use]
    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>) -> Option<UciOptionAction> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hash" => {
                let mb = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(DEFAULT_TT_MB).clamp(1, MAX_HASH_MB);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return Some(UciOptionAction::ReinitHash(mb));
                }
            }
            "threads" => {
                let max_threads = std::thread::available_parallelism().map_or(64, |n| (4 * n.get()).min(64));
                let threads = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(1).clamp(1, max_threads);
                if threads != self.threads {
                    self.threads = threads;
                    return Some(UciOptionAction::SetThreads(threads));
                }
            }
            "evalfile" => {
                if let Some(path) = value {
                    return Some(UciOptionAction::LoadEvalFile(path.to_string()));
                }
            }
            _ => {}
        }
        None
    }
}

#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() { None } else { Some(value_parts.join(" ")) };

    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_value() {
        let parts = ["setoption", "name", "Hash", "value", "128"];
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Hash");
        assert_eq!(value.as_deref(), Some("128"));
    }

    #[test]
    fn parses_multi_word_name_with_no_value() {
        let parts = ["setoption", "name", "Eval", "File"];
        let (name, value) = parse_setoption(&parts).unwrap();
        assert_eq!(name, "Eval File");
        assert_eq!(value, None);
    }

    #[test]
    fn reinit_hash_fires_only_on_change() {
        let mut opts = UciOptions::new(64);
        assert!(opts.apply_setoption("Hash", Some("64")).is_none());
        assert!(matches!(opts.apply_setoption("Hash", Some("128")), Some(UciOptionAction::ReinitHash(128))));
    }
}
