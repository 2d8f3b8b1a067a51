//! Move-ordering scores. Staged generation in the strict spec sense
//! (separate iterators per stage: refutations, good captures, safe quiet
//! moves, rest) is collapsed into a single score-and-sort per node, which
//! produces the same relative order cheaper at this engine's scale; see
//! `DESIGN.md`. The score tiers below are chosen so that sorting by score
//! descending reproduces that stage order: TT move, then refutations
//! (recaptures on the opponent's last destination square, worst attacker
//! first), then good captures (victim strictly more valuable than
//! attacker) by MVV-LVA, then killer/history quiets and equal-value
//! captures (with an `unsafe_squares` penalty/bonus folded in), then bad
//! captures last.

use crate::board::position::BitPosition;
use crate::board::types::{Move, Piece, Square};

pub const TT_MOVE_SCORE: i32 = 1 << 20;
pub const REFUTATION_BASE_SCORE: i32 = 900_000;
pub const CAPTURE_BASE_SCORE: i32 = 100_000;
pub const KILLER1_SCORE: i32 = 20_000;
pub const KILLER2_SCORE: i32 = 10_000;
pub const COUNTER_SCORE: i32 = 5_000;
pub const BAD_CAPTURE_SCORE: i32 = -200_000;

/// Penalty/bonus for moving a quiet (or equal-value capture) into, or out
/// of, a square attacked by the opponent. The original engine tunes these
/// empirically; its exact magnitudes live in a translation unit not kept
/// in this repo's source pack, so these are picked small relative to the
/// MVV-LVA swing between tiers and documented as a judgment call in
/// `DESIGN.md` rather than copied verbatim.
pub const UNSAFE_SQUARE_PENALTY: i32 = 50;
pub const UNSAFE_SQUARE_ESCAPE_BONUS: i32 = 30;

/// The captured piece for a capture move, or `None` for a non-capture.
#[must_use]
fn capture_victim(pos: &BitPosition, mv: Move) -> Option<Piece> {
    if !mv.is_capture() {
        return None;
    }
    if mv.is_en_passant() {
        return Some(Piece::Pawn);
    }
    pos.piece_at(mv.to()).map(|(_, piece)| piece)
}

/// MVV-LVA score for a capture: victim value dominates, attacker value
/// breaks ties so cheaper attackers are preferred against equal victims.
#[must_use]
pub fn mvv_lva_score(pos: &BitPosition, mv: Move) -> i32 {
    let Some(victim) = capture_victim(pos, mv) else {
        return 0;
    };
    let attacker = pos.piece_on(mv.from()).unwrap_or(Piece::Pawn);
    victim.value() * 16 - attacker.value()
}

/// Penalty for landing on an `unsafe_squares` square, or bonus for
/// vacating one, applied to quiet moves and equal-value captures.
#[must_use]
fn unsafe_square_term(pos: &BitPosition, mv: Move) -> i32 {
    let unsafe_squares = pos.unsafe_squares();
    if unsafe_squares.contains(mv.to()) {
        -UNSAFE_SQUARE_PENALTY
    } else if unsafe_squares.contains(mv.from()) {
        UNSAFE_SQUARE_ESCAPE_BONUS
    } else {
        0
    }
}

/// Flat index into a 64x64 history/killer table.
#[must_use]
pub fn history_index(mv: Move) -> usize {
    mv.from().as_index() * 64 + mv.to().as_index()
}

/// A from/to indexed quiet-move history table, decayed between searches
/// rather than cleared, so useful ordering survives a `go` boundary.
pub struct HistoryTable {
    scores: Vec<i32>,
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable { scores: vec![0; 64 * 64] }
    }

    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        self.scores[history_index(mv)]
    }

    pub fn record_cutoff(&mut self, mv: Move, depth: i32) {
        let idx = history_index(mv);
        let bonus = depth.saturating_mul(depth).min(400);
        self.scores[idx] = self.scores[idx].saturating_add(bonus);
    }

    pub fn decay(&mut self) {
        for entry in &mut self.scores {
            *entry /= 4;
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable::new()
    }
}

/// Two killer-quiet slots per ply: quiet moves that caused a beta cutoff
/// without being captures, tried early at siblings of the same ply.
pub struct KillerTable {
    killers: Vec<[Move; 2]>,
}

impl KillerTable {
    #[must_use]
    pub fn new(max_ply: usize) -> Self {
        KillerTable { killers: vec![[Move::null(); 2]; max_ply] }
    }

    #[must_use]
    pub fn get(&self, ply: usize) -> [Move; 2] {
        self.killers.get(ply).copied().unwrap_or([Move::null(); 2])
    }

    pub fn record(&mut self, ply: usize, mv: Move) {
        if ply >= self.killers.len() {
            return;
        }
        if self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }
    }
}

/// Score every legal move at `ply` for ordering: TT move, then
/// refutations, then good captures, then killer/history quiets and
/// equal-value captures (unsafe-squares adjusted), then bad captures.
#[must_use]
pub fn score_move(
    pos: &BitPosition,
    mv: Move,
    tt_move: Option<Move>,
    ply: usize,
    killers: &KillerTable,
    history: &HistoryTable,
    last_move_to: Option<Square>,
) -> i32 {
    if tt_move == Some(mv) {
        return TT_MOVE_SCORE;
    }
    if is_refutation(mv, last_move_to) {
        let attacker = pos.piece_on(mv.from()).unwrap_or(Piece::Pawn);
        // Worst-attacker-first: a weaker attacker scores higher.
        return REFUTATION_BASE_SCORE - attacker.value();
    }
    if let Some(victim) = capture_victim(pos, mv) {
        let attacker = pos.piece_on(mv.from()).unwrap_or(Piece::Pawn);
        if mv.is_promotion() || victim.value() > attacker.value() {
            return CAPTURE_BASE_SCORE + mvv_lva_score(pos, mv);
        }
        if victim.value() == attacker.value() {
            return history.score(mv).min(COUNTER_SCORE - 1) + unsafe_square_term(pos, mv);
        }
        return BAD_CAPTURE_SCORE + mvv_lva_score(pos, mv);
    }
    let killer_slots = killers.get(ply);
    if killer_slots[0] == mv {
        return KILLER1_SCORE + unsafe_square_term(pos, mv);
    }
    if killer_slots[1] == mv {
        return KILLER2_SCORE + unsafe_square_term(pos, mv);
    }
    history.score(mv).min(COUNTER_SCORE - 1) + unsafe_square_term(pos, mv)
}

/// A legal capture of the square the opponent's last move landed on: the
/// spec's own refutation stage, emitted ahead of other captures.
#[must_use]
pub fn is_refutation(mv: Move, last_move_to: Option<Square>) -> bool {
    mv.is_capture() && last_move_to == Some(mv.to())
}
