//! Precomputed attack tables: magic bitboards for sliders, direct lookup
//! tables for leapers, and line/ray masks used by pin and check detection.

mod leapers;
mod magic;

use std::sync::LazyLock;

use super::types::{Bitboard, Color, Square};

#[inline]
#[must_use]
pub(crate) fn knight_attacks(square: Square) -> Bitboard {
    Bitboard(leapers::KNIGHT_ATTACKS[square.as_index()])
}

#[inline]
#[must_use]
pub(crate) fn king_attacks(square: Square) -> Bitboard {
    Bitboard(leapers::KING_ATTACKS[square.as_index()])
}

#[inline]
#[must_use]
pub(crate) fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    Bitboard(leapers::PAWN_ATTACKS[color.index()][square.as_index()])
}

#[inline]
#[must_use]
pub(crate) fn bishop_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(magic::MAGICS.bishop_attacks(square.as_index(), occupied.0))
}

#[inline]
#[must_use]
pub(crate) fn rook_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(magic::MAGICS.rook_attacks(square.as_index(), occupied.0))
}

#[inline]
#[must_use]
pub(crate) fn queen_attacks(square: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(
        magic::MAGICS.rook_attacks(square.as_index(), occupied.0)
            | magic::MAGICS.bishop_attacks(square.as_index(), occupied.0),
    )
}

/// For each pair of squares that share a rank, file or diagonal: the
/// bitboard of squares strictly between them (exclusive). Zero if the
/// squares are not aligned. Used to find pin rays and check-blocking
/// squares without re-deriving geometry on every call.
struct OnLineBitboards {
    between: Box<[[u64; 64]; 64]>,
}

impl OnLineBitboards {
    fn generate() -> Self {
        let mut between = Box::new([[0u64; 64]; 64]);
        for a in 0..64 {
            let occ_a = Bitboard(1u64 << a);
            for b in 0..64 {
                if a == b {
                    continue;
                }
                let sq_a = Square::from_index(a);
                let sq_b = Square::from_index(b);
                let ray = if on_rook_line(sq_a, sq_b) {
                    rook_attacks(sq_a, Bitboard(1u64 << b)) .0
                        & rook_attacks(sq_b, occ_a).0
                } else if on_bishop_line(sq_a, sq_b) {
                    bishop_attacks(sq_a, Bitboard(1u64 << b)).0
                        & bishop_attacks(sq_b, occ_a).0
                } else {
                    0
                };
                between[a][b] = ray;
            }
        }
        OnLineBitboards { between }
    }
}

fn on_rook_line(a: Square, b: Square) -> bool {
    a.rank() == b.rank() || a.file() == b.file()
}

fn on_bishop_line(a: Square, b: Square) -> bool {
    let (ar, af) = (a.rank() as i32, a.file() as i32);
    let (br, bf) = (b.rank() as i32, b.file() as i32);
    (ar - br).abs() == (af - bf).abs()
}

static ON_LINE: LazyLock<OnLineBitboards> = LazyLock::new(OnLineBitboards::generate);

/// Squares strictly between `a` and `b` if they share a rank, file or
/// diagonal; empty otherwise.
#[inline]
#[must_use]
pub(crate) fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(ON_LINE.between[a.as_index()][b.as_index()])
}

/// True if `a`, `b` and `c` are collinear (share a rank, file, or diagonal
/// with `b` and `c` both reachable from `a` along the same ray family).
#[must_use]
pub(crate) fn aligned(a: Square, b: Square, c: Square) -> bool {
    (on_rook_line(a, b) && on_rook_line(a, c) && on_rook_line(b, c))
        || (on_bishop_line(a, b) && on_bishop_line(a, c) && on_bishop_line(b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_same_rank() {
        let a1 = Square::from_index(0);
        let h1 = Square::from_index(7);
        let b = between(a1, h1);
        assert_eq!(b.popcount(), 6);
    }

    #[test]
    fn between_unaligned_is_empty() {
        let a1 = Square::from_index(0);
        let b3 = Square::from_index(17);
        assert!(between(a1, b3).is_empty());
    }

    #[test]
    fn between_diagonal() {
        let a1 = Square::from_index(0);
        let d4 = Square::from_index(27);
        let b = between(a1, d4);
        assert_eq!(b.popcount(), 2);
    }

    #[test]
    fn aligned_detects_rook_and_bishop_lines() {
        let a1 = Square::from_index(0);
        let d1 = Square::from_index(3);
        let h1 = Square::from_index(7);
        assert!(aligned(a1, d1, h1));

        let d4 = Square::from_index(27);
        let g7 = Square::from_index(54);
        assert!(aligned(a1, d4, g7));
    }

    #[test]
    fn queen_attacks_is_union_of_rook_and_bishop() {
        let d4 = Square::from_index(27);
        let occ = Bitboard(0);
        let q = queen_attacks(d4, occ);
        let r = rook_attacks(d4, occ);
        let b = bishop_attacks(d4, occ);
        assert_eq!(q, Bitboard(r.0 | b.0));
    }
}
