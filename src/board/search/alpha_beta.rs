//! Internal alpha-beta search: the workhorse `alphaBetaSearch` node, and
//! the root layer (`firstMoveSearch`) that the iterative-deepening loop
//! drives one depth at a time.

use crate::board::nnue::Network;
use crate::board::tt::{Bound, TtEntry};
use crate::board::types::{Move, ScoredMoveList, Square};

use super::constants::{DRAW_SCORE, MATE_BASE, MATE_THRESHOLD, ROOT_REDUCTION_SCORE_GAP};
use super::move_order;
use super::Worker;

impl Worker {
    /// Search every root move at `depth`, applying the one-ply reduction
    /// heuristic from the previous iteration's per-move scores, and return
    /// the best (move, score) pair. `prev_scores` is read for ordering and
    /// reduction decisions and overwritten with this iteration's scores.
    pub(super) fn root_search(&mut self, depth: u32, root_moves: &[Move], prev_scores: &mut [i32]) -> (Move, i32) {
        let mut best_move = root_moves[0];
        let mut best_score = -super::constants::SCORE_INFINITE;
        let mut alpha = -super::constants::SCORE_INFINITE;
        let beta = super::constants::SCORE_INFINITE;

        let best_prev = prev_scores.iter().copied().max().unwrap_or(0);

        let mut order: Vec<usize> = (0..root_moves.len()).collect();
        order.sort_by_key(|&i| -prev_scores[i]);

        for &i in &order {
            if self.should_stop() {
                break;
            }
            let mv = root_moves[i];
            let undo = self.position.make_move(mv);

            let reduced = depth > 1 && best_prev - prev_scores[i] > ROOT_REDUCTION_SCORE_GAP;
            let search_depth = if reduced { depth.saturating_sub(2) } else { depth.saturating_sub(1) };

            let mut score = -self.alpha_beta(search_depth as i32, 1, -beta, -alpha, Some(mv.to()));
            if reduced && score > alpha {
                score = -self.alpha_beta((depth - 1) as i32, 1, -beta, -alpha, Some(mv.to()));
            }

            self.position.unmake_move(mv, undo);

            prev_scores[i] = score;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }

            if self.time_manager.expired() {
                break;
            }
        }

        (best_move, best_score)
    }

    pub(super) fn alpha_beta(&mut self, depth: i32, ply: i32, mut alpha: i32, beta: i32, last_move_to: Option<Square>) -> i32 {
        self.nodes += 1;

        if depth <= 0 {
            return self.quiescence(alpha, beta, ply);
        }
        if self.position.is_theoretical_draw() {
            return DRAW_SCORE;
        }
        if self.should_stop() {
            return alpha;
        }

        let is_pv = beta - alpha > 1;
        let key = self.position.hash();
        let tt_entry = self.tt.probe(key);

        if let Some(entry) = tt_entry {
            if entry.depth >= depth && !is_pv {
                match entry.bound {
                    Bound::Exact => return entry.value,
                    Bound::LowerBound if entry.value >= beta => return entry.value,
                    Bound::UpperBound if entry.value <= alpha => return entry.value,
                    _ => {}
                }
            }
        }
        let tt_move = tt_entry.map(|e| e.best_move).filter(|m| *m != Move::null());

        let mut best_move = Move::null();
        let mut best_score = -super::constants::SCORE_INFINITE;
        let original_alpha = alpha;
        let mut tt_move_tried = false;

        // Try the hash move first, without paying for full move generation,
        // validating it cheaply against the current position so a stale
        // entry from a different position sharing this key can't be played.
        if let Some(mv) = tt_move {
            if self.position.is_pseudo_legal_and_legal(mv) {
                tt_move_tried = true;
                let undo = self.position.make_move(mv);
                let score = -self.alpha_beta(depth - 1, ply + 1, -beta, -alpha, Some(mv.to()));
                self.position.unmake_move(mv, undo);

                best_score = score;
                best_move = mv;
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    if !mv.is_capture() {
                        self.killers.record(ply as usize, mv);
                        self.history.record_cutoff(mv, depth);
                    }
                    self.tt
                        .save(key, TtEntry { depth, value: best_score, best_move, bound: Bound::LowerBound });
                    return best_score;
                }
            }
        }

        if self.should_stop() {
            return if tt_move_tried { best_score } else { alpha };
        }

        let legal = self.position.generate_legal_moves();
        if legal.is_empty() {
            // The hash move being legal guarantees `legal` is non-empty, so
            // this path only fires when no hash move was tried.
            return if self.position.is_in_check() { -(MATE_BASE - ply) } else { DRAW_SCORE };
        }

        let mut candidates = ScoredMoveList::new();
        for mv in &legal {
            if tt_move_tried && Some(*mv) == tt_move {
                continue;
            }
            let score =
                move_order::score_move(&self.position, *mv, tt_move, ply as usize, &self.killers, &self.history, last_move_to);
            candidates.push(*mv, score);
        }

        if !tt_move_tried {
            best_move = legal.first().unwrap_or(Move::null());
        }

        let mut idx = 0;
        while let Some(entry) = candidates.pick_best(idx) {
            let mv = entry.mv;
            idx += 1;

            let undo = self.position.make_move(mv);
            let score = -self.alpha_beta(depth - 1, ply + 1, -beta, -alpha, Some(mv.to()));
            self.position.unmake_move(mv, undo);

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if !mv.is_capture() {
                    self.killers.record(ply as usize, mv);
                    self.history.record_cutoff(mv, depth);
                }
                break;
            }

            if self.should_stop() {
                break;
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::UpperBound
        } else if best_score >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        self.tt.save(key, TtEntry { depth, value: best_score, best_move, bound });

        best_score
    }
}

/// Is `score` a mate score (as opposed to a material evaluation)?
#[must_use]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// Plies to mate, if `score` is a mate score; positive means this side
/// delivers mate, negative means this side is mated.
#[must_use]
pub fn mate_distance(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    if score > 0 {
        Some(MATE_BASE - score)
    } else {
        Some(-(MATE_BASE + score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_mate_score_reports_positive_distance() {
        assert_eq!(mate_distance(MATE_BASE - 3), Some(3));
    }

    #[test]
    fn material_score_is_not_a_mate_score() {
        assert!(!is_mate_score(250));
    }
}
