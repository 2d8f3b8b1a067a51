//! Static Exchange Evaluation: simulate the full capture sequence on a
//! single square, least-valuable-attacker first, to judge whether a
//! capture (or a capture that could follow a quiet move) is worth at
//! least a given threshold without playing it out in the search tree.

use super::BitPosition;
use crate::board::types::{Bitboard, Color, Move, Piece, Square};

const MAX_DEPTH: usize = 32;

impl BitPosition {
    /// Is the exchange on `m`'s destination square worth at least
    /// `threshold` centipawns for the side making `m`? Used to prune
    /// bad captures in quiescence and move ordering.
    #[must_use]
    pub fn see_ge(&self, m: Move, threshold: i32) -> bool {
        self.see(m) >= threshold
    }

    /// Material balance of the full capture sequence on `m`'s destination
    /// square, from the perspective of the side making `m`. Zero for a
    /// non-capturing move (no exchange to simulate).
    #[must_use]
    pub fn see(&self, m: Move) -> i32 {
        let Some((_, attacker)) = self.piece_at(m.from()) else {
            return 0;
        };
        let victim = if m.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_at(m.to()) {
                Some((_, piece)) => piece,
                None => return 0,
            }
        };

        let mut gain = [0i32; MAX_DEPTH];
        let mut depth = 0;
        gain[0] = victim.value();

        let mut side_to_move = self.side_to_move.opponent();
        let to = m.to();
        let mut occupied = self.all_occupied;
        occupied.0 &= !(1u64 << m.from().as_index());
        let mut attackers = self.attackers_to(to, occupied);

        let mut current_attacker_value = attacker.value();

        loop {
            let side_attackers = Bitboard(attackers.0 & self.occupied[side_to_move.index()].0);
            if side_attackers.is_empty() || depth + 1 >= MAX_DEPTH {
                break;
            }
            depth += 1;
            gain[depth] = current_attacker_value - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            let (piece, from_bb) = Self::least_valuable_attacker(side_attackers, side_to_move, self);
            occupied.0 &= !from_bb.0;
            // Recompute from scratch on the shrunk occupancy: removing a
            // slider can reveal another slider behind it on the same ray.
            attackers = self.attackers_to(to, occupied);

            current_attacker_value = piece.value();
            side_to_move = side_to_move.opponent();
        }

        while depth > 0 {
            depth -= 1;
            gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
        }
        gain[0]
    }

    fn least_valuable_attacker(attackers: Bitboard, color: Color, pos: &BitPosition) -> (Piece, Bitboard) {
        for piece in [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let of_type = Bitboard(attackers.0 & pos.pieces[color.index()][piece.index()].0);
            if !of_type.is_empty() {
                let lsb = of_type.0 & of_type.0.wrapping_neg();
                return (piece, Bitboard(lsb));
            }
        }
        (Piece::Pawn, Bitboard::EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winning_pawn_takes_rook_is_positive() {
        let mut pos = BitPosition::empty();
        pos.set_piece(Square::new(0, 4), Color::White, Piece::King);
        pos.set_piece(Square::new(7, 4), Color::Black, Piece::King);
        pos.set_piece(Square::new(4, 4), Color::White, Piece::Pawn);
        pos.set_piece(Square::new(5, 5), Color::Black, Piece::Rook);
        let m = Move::capture(Square::new(4, 4), Square::new(5, 5));
        assert!(pos.see(m) > 0);
    }

    #[test]
    fn losing_queen_takes_defended_pawn_is_negative() {
        let mut pos = BitPosition::empty();
        pos.set_piece(Square::new(0, 4), Color::White, Piece::King);
        pos.set_piece(Square::new(7, 4), Color::Black, Piece::King);
        pos.set_piece(Square::new(0, 0), Color::White, Piece::Queen);
        pos.set_piece(Square::new(3, 3), Color::Black, Piece::Pawn);
        pos.set_piece(Square::new(4, 2), Color::Black, Piece::Pawn);
        let m = Move::capture(Square::new(0, 0), Square::new(3, 3));
        assert!(pos.see(m) < 0);
    }

    #[test]
    fn quiet_move_has_zero_see() {
        let pos = BitPosition::new();
        let m = Move::quiet(Square::new(1, 4), Square::new(2, 4));
        assert_eq!(pos.see(m), 0);
    }

    #[test]
    fn see_ge_matches_see_against_threshold() {
        let mut pos = BitPosition::empty();
        pos.set_piece(Square::new(0, 4), Color::White, Piece::King);
        pos.set_piece(Square::new(7, 4), Color::Black, Piece::King);
        pos.set_piece(Square::new(4, 4), Color::White, Piece::Pawn);
        pos.set_piece(Square::new(5, 5), Color::Black, Piece::Rook);
        let m = Move::capture(Square::new(4, 4), Square::new(5, 5));
        let value = pos.see(m);
        assert!(pos.see_ge(m, value));
        assert!(!pos.see_ge(m, value + 1));
    }
}
