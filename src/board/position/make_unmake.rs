//! Move application: make/unmake for real moves, plus the null move used
//! by the search's null-move-free... actually used by quiescence/SEE
//! probing and the time manager's "pass" when no move is found yet.

use super::BitPosition;
use crate::board::nnue::NnueChange;
use crate::board::types::{CastlingRights, Color, Move, Piece, Square};
use crate::board::zobrist;

/// Everything needed to undo a `make_move`. Produced by `make_move` and
/// consumed, in LIFO order, by `unmake_move`.
pub struct UndoState {
    captured: Option<(Color, Piece)>,
    previous_en_passant: Option<Square>,
    previous_castling: CastlingRights,
    previous_hash: u64,
    previous_halfmove_clock: u32,
    made_hash: u64,
    previous_repetition_count: u32,
}

/// Everything needed to undo a `make_null_move`.
pub struct NullUndoState {
    previous_en_passant: Option<Square>,
    previous_hash: u64,
}

impl BitPosition {
    fn rook_castle_squares(to: Square) -> (Square, Square) {
        let rank = to.rank();
        if to.file() == 6 {
            (Square::new(rank, 7), Square::new(rank, 5))
        } else {
            (Square::new(rank, 0), Square::new(rank, 3))
        }
    }

    /// Remove the captured piece (including en passant's off-destination
    /// victim) for `m`, returning what was captured and the NNUE change
    /// touch, if any.
    fn take_captured(&mut self, m: Move, us: Color) -> Option<(Color, Piece, Square)> {
        if m.is_en_passant() {
            let capture_sq = Square::new(m.from().rank(), m.to().file());
            let (color, piece) = self.piece_at(capture_sq).expect("en passant capture square is empty");
            self.remove_piece(capture_sq, color, piece);
            return Some((color, piece, capture_sq));
        }
        if m.is_castling() {
            return None;
        }
        if let Some((color, piece)) = self.piece_at(m.to()) {
            self.remove_piece(m.to(), color, piece);
            return Some((color, piece, m.to()));
        }
        let _ = us;
        None
    }

    fn update_castling_rights_for_move(&mut self, m: Move, moving_piece: Piece, us: Color, captured: Option<(Color, Piece, Square)>) {
        if moving_piece == Piece::King {
            self.castling.remove(us, true);
            self.castling.remove(us, false);
        } else if moving_piece == Piece::Rook {
            let start_rank = if us == Color::White { 0 } else { 7 };
            if m.from() == Square::new(start_rank, 0) {
                self.castling.remove(us, false);
            } else if m.from() == Square::new(start_rank, 7) {
                self.castling.remove(us, true);
            }
        }
        if let Some((color, Piece::Rook, sq)) = captured {
            let start_rank = if color == Color::White { 0 } else { 7 };
            if sq == Square::new(start_rank, 0) {
                self.castling.remove(color, false);
            } else if sq == Square::new(start_rank, 7) {
                self.castling.remove(color, true);
            }
        }
    }

    /// Apply `m` to the position, updating piece placement, hash,
    /// castling/en-passant state, the halfmove clock, the repetition
    /// table, and the NNUE accumulator stack. Call `unmake_move` with the
    /// returned [`UndoState`], in LIFO order, to reverse it.
    pub(crate) fn make_move(&mut self, m: Move) -> UndoState {
        let previous_hash = self.hash;
        let previous_en_passant = self.en_passant;
        let previous_castling = self.castling;
        let previous_halfmove_clock = self.halfmove_clock;

        let us = self.side_to_move;
        let them = us.opponent();
        let (us_color, moving_piece) = self.piece_at(m.from()).expect("make_move: origin square is empty");
        debug_assert_eq!(us_color, us);

        let mut hash = self.hash;
        hash ^= zobrist::side_to_move_key();
        if let Some(ep) = previous_en_passant {
            hash ^= zobrist::en_passant_key(ep.file());
        }

        let captured = self.take_captured(m, us);
        if let Some((color, piece, sq)) = captured {
            hash ^= zobrist::piece_square_key(color, piece, sq);
        }

        self.remove_piece(m.from(), us, moving_piece);
        hash ^= zobrist::piece_square_key(us, moving_piece, m.from());

        let nnue_change;

        if m.is_castling() {
            self.set_piece(m.to(), us, Piece::King);
            hash ^= zobrist::piece_square_key(us, Piece::King, m.to());
            let (rook_from, rook_to) = Self::rook_castle_squares(m.to());
            self.remove_piece(rook_from, us, Piece::Rook);
            self.set_piece(rook_to, us, Piece::Rook);
            hash ^= zobrist::piece_square_key(us, Piece::Rook, rook_from);
            hash ^= zobrist::piece_square_key(us, Piece::Rook, rook_to);
            // The king itself carries no input feature, so only the rook's
            // move needs to reach the accumulator.
            nnue_change = NnueChange::for_move(us, Piece::Rook, rook_from, Piece::Rook, rook_to, None);
        } else {
            let placed = m.promotion().unwrap_or(moving_piece);
            self.set_piece(m.to(), us, placed);
            hash ^= zobrist::piece_square_key(us, placed, m.to());
            nnue_change = NnueChange::for_move(us, moving_piece, m.from(), placed, m.to(), captured);
        }

        self.en_passant = None;
        if m.is_double_pawn_push() {
            let ep_rank = (m.from().rank() + m.to().rank()) / 2;
            let ep_sq = Square::new(ep_rank, m.from().file());
            self.en_passant = Some(ep_sq);
            hash ^= zobrist::en_passant_key(ep_sq.file());
        }

        self.halfmove_clock = if moving_piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        self.update_castling_rights_for_move(m, moving_piece, us, captured);
        if self.castling != previous_castling {
            hash ^= zobrist::castling_key(previous_castling);
            hash ^= zobrist::castling_key(self.castling);
        }

        self.side_to_move = them;
        self.ply += 1;
        self.hash = hash;

        let made_hash = hash;
        let previous_repetition_count = self.repetitions.get(made_hash);
        if self.halfmove_clock == 0 {
            self.repetitions.set(made_hash, 1);
        } else {
            self.repetitions.increment(made_hash);
        }

        self.nnue.push(nnue_change);
        self.recompute_checkers_and_pins();

        UndoState {
            captured: captured.map(|(c, p, _)| (c, p)),
            previous_en_passant,
            previous_castling,
            previous_hash,
            previous_halfmove_clock,
            made_hash,
            previous_repetition_count,
        }
    }

    /// Reverse the effects of `make_move(m)`. `state` must be the value it
    /// returned.
    pub(crate) fn unmake_move(&mut self, m: Move, state: UndoState) {
        self.repetitions.set(state.made_hash, state.previous_repetition_count);
        self.ply -= 1;
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant = state.previous_en_passant;
        self.castling = state.previous_castling;
        self.hash = state.previous_hash;
        self.halfmove_clock = state.previous_halfmove_clock;
        self.nnue.pop();

        let us = self.side_to_move;

        if m.is_castling() {
            self.remove_piece(m.to(), us, Piece::King);
            self.set_piece(m.from(), us, Piece::King);
            let (rook_from, rook_to) = Self::rook_castle_squares(m.to());
            self.remove_piece(rook_to, us, Piece::Rook);
            self.set_piece(rook_from, us, Piece::Rook);
            self.recompute_checkers_and_pins();
            return;
        }

        let (placed_color, placed_piece) = self.piece_at(m.to()).expect("unmake_move: destination square is empty");
        self.remove_piece(m.to(), placed_color, placed_piece);
        let origin_piece = if m.promotion().is_some() { Piece::Pawn } else { placed_piece };
        self.set_piece(m.from(), us, origin_piece);

        if m.is_en_passant() {
            if let Some((color, piece)) = state.captured {
                let capture_sq = Square::new(m.from().rank(), m.to().file());
                self.set_piece(capture_sq, color, piece);
            }
        } else if let Some((color, piece)) = state.captured {
            self.set_piece(m.to(), color, piece);
        }

        self.recompute_checkers_and_pins();
    }

    /// Flip the side to move without touching the board, for null-move
    /// pruning and SEE probing. The NNUE accumulator is untouched: a null
    /// move changes no piece-square feature.
    pub(crate) fn make_null_move(&mut self) -> NullUndoState {
        let previous_hash = self.hash;
        let previous_en_passant = self.en_passant;
        let mut hash = self.hash;
        hash ^= zobrist::side_to_move_key();
        if let Some(ep) = previous_en_passant {
            hash ^= zobrist::en_passant_key(ep.file());
        }
        self.en_passant = None;
        self.side_to_move = self.side_to_move.opponent();
        self.hash = hash;
        self.ply += 1;
        self.recompute_checkers_and_pins();
        NullUndoState { previous_en_passant, previous_hash }
    }

    pub(crate) fn unmake_null_move(&mut self, state: NullUndoState) {
        self.ply -= 1;
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant = state.previous_en_passant;
        self.hash = state.previous_hash;
        self.recompute_checkers_and_pins();
    }
}
