//! Iterative-deepening alpha-beta search: one `Worker` per search thread,
//! all sharing a transposition table and a stop flag. See [`pool`] for the
//! Lazy-SMP thread pool that owns a set of workers.

mod alpha_beta;
mod constants;
mod log;
mod move_order;
mod pool;
mod quiescence;
mod time;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::board::position::BitPosition;
use crate::board::tt::TranspositionTable;
use crate::board::types::{Color, Move};

pub use alpha_beta::{is_mate_score, mate_distance};
pub use constants::{
    ENDGAME_PIECE_COUNT, STABILITY_DEPTH_ENDGAME, STABILITY_DEPTH_MIDGAME, STABILITY_STREAK_ENDGAME,
    STABILITY_STREAK_MIDGAME,
};
pub use log::{SearchInfo, SearchLogger, StdoutLogger};
pub use move_order::{HistoryTable, KillerTable};
pub use pool::ThreadPool;
pub use time::{SearchLimits, TimeManager};

/// Outcome of one `Worker::think` call: the move to play, an optional
/// ponder move, and the diagnostics the UCI layer reports as `info`.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best_move: Move,
    pub ponder_move: Option<Move>,
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: std::time::Duration,
}

/// Per-thread iterative-deepening search driver: a cloned root position,
/// a reference to the shared transposition table, move-ordering tables
/// private to this thread, and the shared stop flag every worker polls.
pub struct Worker {
    id: usize,
    position: BitPosition,
    tt: Arc<TranspositionTable>,
    stop: Arc<AtomicBool>,
    history: HistoryTable,
    killers: KillerTable,
    nodes: u64,
    seldepth: u32,
    time_manager: TimeManager,
}

const MAX_SEARCH_PLY: usize = 128;

impl Worker {
    #[must_use]
    pub fn new(id: usize, position: BitPosition, tt: Arc<TranspositionTable>, stop: Arc<AtomicBool>) -> Self {
        Worker {
            id,
            position,
            tt,
            stop,
            history: HistoryTable::new(),
            killers: KillerTable::new(MAX_SEARCH_PLY),
            nodes: 0,
            seldepth: 0,
            time_manager: TimeManager::new(None),
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(super) fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || self.time_manager.expired()
    }

    /// Pieces on the board excluding kings and pawns; below
    /// [`ENDGAME_PIECE_COUNT`] the looser endgame stability thresholds apply.
    fn minor_and_major_piece_count(&self) -> u32 {
        use crate::board::types::Piece;
        let mut count = 0u32;
        for color in [Color::White, Color::Black] {
            for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                count += self.position.pieces[color.index()][piece.index()].popcount();
            }
        }
        count
    }

    /// Drive iterative deepening from depth 1 until a stopping condition
    /// from §4.8.1 fires: the clock runs out, the best move's stability
    /// streak and depth both clear their threshold with a non-decreasing
    /// score history, or the requested depth limit is hit.
    pub fn think(&mut self, limits: &SearchLimits) -> SearchReport {
        self.think_with_logger(limits, None)
    }

    /// Same as [`Worker::think`], emitting a `SearchInfo` to `logger` after
    /// every completed iteration. The thread pool only passes a logger to
    /// its thread-0 worker, matching the "main thread reports" UCI rule.
    pub fn think_with_logger(&mut self, limits: &SearchLimits, logger: Option<&dyn SearchLogger>) -> SearchReport {
        self.nodes = 0;
        self.seldepth = 0;
        self.history.decay();
        let search_started = Instant::now();

        let budget = limits.budget_for(self.position.side_to_move());
        self.time_manager = TimeManager::new(budget);

        let root_move_list = self.position.generate_legal_moves();
        let root_moves: Vec<Move> = root_move_list.iter().copied().collect();
        if root_moves.is_empty() {
            return SearchReport {
                best_move: Move::null(),
                ponder_move: None,
                depth: 0,
                score: 0,
                nodes: 0,
                elapsed: search_started.elapsed(),
            };
        }

        let mut prev_scores = vec![0i32; root_moves.len()];
        let mut best_move = root_moves[0];
        let mut best_score = 0;
        let mut stability = 0u32;
        let mut last_best: Option<Move> = None;
        let mut score_history: Vec<i32> = Vec::new();

        let max_depth = limits.depth.unwrap_or(64).min(MAX_SEARCH_PLY as u32 - 1);
        let endgame = self.minor_and_major_piece_count() <= ENDGAME_PIECE_COUNT;
        let (streak_threshold, depth_threshold) = if endgame {
            (STABILITY_STREAK_ENDGAME, STABILITY_DEPTH_ENDGAME)
        } else {
            (STABILITY_STREAK_MIDGAME, STABILITY_DEPTH_MIDGAME)
        };

        let mut depth = 1;
        while depth <= max_depth {
            if depth > 1 && self.time_manager.should_stop_before_next_iteration() {
                break;
            }

            let iteration_started = Instant::now();
            let (mv, score) = self.root_search(depth, &root_moves, &mut prev_scores);
            self.time_manager.record_iteration(iteration_started.elapsed());

            if self.stop.load(Ordering::Relaxed) && depth > 1 {
                break;
            }

            best_move = mv;
            best_score = score;
            score_history.push(score);

            if let Some(logger) = logger {
                let elapsed = search_started.elapsed();
                let time_ms = elapsed.as_millis();
                let nps = if time_ms > 0 { (self.nodes as u128 * 1000 / time_ms) as u64 } else { 0 };
                logger.info(&SearchInfo {
                    depth,
                    seldepth: self.seldepth,
                    score: best_score,
                    nodes: self.nodes,
                    nps,
                    time_ms,
                    pv: best_move.to_string(),
                });
            }

            if Some(mv) == last_best {
                stability += 1;
            } else {
                stability = 0;
                last_best = Some(mv);
            }

            let non_decreasing = score_history.windows(2).all(|w| w[1] >= w[0]);
            if stability >= streak_threshold && depth >= depth_threshold && non_decreasing {
                break;
            }
            if self.time_manager.expired() {
                break;
            }
            depth += 1;
        }

        let ponder_move = self.extract_ponder_move(best_move);

        SearchReport {
            best_move,
            ponder_move,
            depth: depth.min(max_depth),
            score: best_score,
            nodes: self.nodes,
            elapsed: search_started.elapsed(),
        }
    }

    fn extract_ponder_move(&mut self, best_move: Move) -> Option<Move> {
        if best_move == Move::null() {
            return None;
        }
        let undo = self.position.make_move(best_move);
        let reply = self.tt.probe(self.position.hash()).and_then(|entry| {
            let legal = self.position.generate_legal_moves();
            legal.iter().find(|m| **m == entry.best_move).copied()
        });
        self.position.unmake_move(best_move, undo);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tt::DEFAULT_TT_MB;

    #[test]
    fn worker_finds_a_move_in_the_starting_position() {
        let tt = Arc::new(TranspositionTable::new(DEFAULT_TT_MB));
        let stop = Arc::new(AtomicBool::new(false));
        let mut worker = Worker::new(0, BitPosition::new(), tt, stop);
        let limits = SearchLimits { depth: Some(3), ..Default::default() };
        let report = worker.think(&limits);
        assert_ne!(report.best_move, Move::null());
        assert!(report.nodes > 0);
    }

    #[test]
    fn worker_finds_mate_in_one() {
        let tt = Arc::new(TranspositionTable::new(DEFAULT_TT_MB));
        let stop = Arc::new(AtomicBool::new(false));
        let pos = BitPosition::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let mut worker = Worker::new(0, pos, tt, stop);
        let limits = SearchLimits { depth: Some(3), ..Default::default() };
        let report = worker.think(&limits);
        assert_eq!(report.best_move.to_string(), "a1a8");
    }
}
