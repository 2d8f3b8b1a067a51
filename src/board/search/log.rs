//! UCI `info` line reporting, decoupled from stdout so tests and the
//! engine glue can both drive it.

use super::alpha_beta::mate_distance;

pub struct SearchInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u128,
    pub pv: String,
}

impl SearchInfo {
    /// Render the UCI `score` token: `cp <n>` for a material score,
    /// `mate <n>` (plies, halved and rounded toward the mating side) for a
    /// mate score.
    #[must_use]
    pub fn score_token(&self) -> String {
        match mate_distance(self.score) {
            Some(plies) if self.score > 0 => format!("mate {}", (plies + 1) / 2),
            Some(plies) => format!("mate {}", -((plies + 1) / 2)),
            None => format!("cp {}", self.score),
        }
    }
}

pub trait SearchLogger: Send + Sync {
    fn info(&self, info: &SearchInfo);
}

pub struct StdoutLogger;

impl SearchLogger for StdoutLogger {
    fn info(&self, info: &SearchInfo) {
        println!(
            "info depth {} seldepth {} score {} nodes {} nps {} time {} pv {}",
            info.depth,
            info.seldepth,
            info.score_token(),
            info.nodes,
            info.nps,
            info.time_ms,
            info.pv
        );
    }
}
