//! Magic-bitboard sliding attack tables for rooks and bishops.
//!
//! Magic numbers are searched for once at process start (sparse random
//! candidates, collision-checked against a scanned reference), matching the
//! approach used by other bitboard engines in this family rather than
//! shipping a baked table of pre-found constants.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashMap;

use super::leapers::{file_of, rank_of};

const ROOK_DELTAS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DELTAS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Fixed seed so magic numbers (and therefore table contents) are
/// reproducible across builds.
const MAGIC_SEARCH_SEED: u64 = 0x4D41_4749_4331_3233;

const MAX_MAGIC_ATTEMPTS: u32 = 1_000_000;

pub(crate) struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    table: Box<[u64]>,
}

impl MagicEntry {
    #[inline]
    fn index(&self, occupied: u64) -> usize {
        (((occupied & self.mask).wrapping_mul(self.magic)) >> self.shift) as usize
    }

    #[inline]
    pub(crate) fn attacks(&self, occupied: u64) -> u64 {
        self.table[self.index(occupied)]
    }
}

fn sliding_attacks(square: usize, occupied: u64, deltas: &[(i32, i32); 4], edge_to_edge: bool) -> u64 {
    let r0 = rank_of(square) as i32;
    let f0 = file_of(square) as i32;
    let mut attacks = 0u64;
    for &(dr, df) in deltas {
        let mut r = r0 + dr;
        let mut f = f0 + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let sq = (r * 8 + f) as usize;
            attacks |= 1u64 << sq;
            if !edge_to_edge && occupied & (1u64 << sq) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Relevant-occupancy mask: every square a blocker could sit on, excluding
/// the board edge in each ray direction (edge occupancy never changes the
/// attack set since the ray always terminates there regardless).
fn relevant_mask(square: usize, deltas: &[(i32, i32); 4]) -> u64 {
    let r0 = rank_of(square) as i32;
    let f0 = file_of(square) as i32;
    let mut mask = 0u64;
    for &(dr, df) in deltas {
        let mut r = r0 + dr;
        let mut f = f0 + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            let sq = (r * 8 + f) as usize;
            mask |= 1u64 << sq;
            r += dr;
            f += df;
        }
    }
    mask
}

/// Enumerate every occupancy subset of `mask` (the carry-rippler trick).
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn random_sparse_u64(rng: &mut StdRng) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

fn find_magic_for_square(
    square: usize,
    mask: u64,
    reference: &HashMap<u64, u64>,
    subsets: &[u64],
    rng: &mut StdRng,
) -> u64 {
    let shift = 64 - mask.count_ones();
    'attempt: for _ in 0..MAX_MAGIC_ATTEMPTS {
        let candidate = random_sparse_u64(rng);
        if (candidate.wrapping_mul(mask)) >> 56 < 6 {
            continue;
        }
        let mut seen = HashMap::with_capacity(subsets.len());
        for &occ in subsets {
            let idx = ((occ & mask).wrapping_mul(candidate)) >> shift;
            let attack = reference[&occ];
            match seen.get(&idx) {
                Some(&prev) if prev != attack => continue 'attempt,
                _ => {
                    seen.insert(idx, attack);
                }
            }
        }
        return candidate;
    }
    panic!("failed to find magic number for square {square} after {MAX_MAGIC_ATTEMPTS} attempts");
}

fn build_table(deltas: &[(i32, i32); 4], rng: &mut StdRng) -> Vec<MagicEntry> {
    (0..64)
        .map(|square| {
            let mask = relevant_mask(square, deltas);
            let subsets = subsets_of(mask);
            let mut reference = HashMap::with_capacity(subsets.len());
            for &occ in &subsets {
                reference.insert(occ, sliding_attacks(square, occ, deltas, false));
            }
            let magic = find_magic_for_square(square, mask, &reference, &subsets, rng);
            let shift = 64 - mask.count_ones();
            let mut table = vec![0u64; 1 << mask.count_ones()];
            for &occ in &subsets {
                let idx = ((occ & mask).wrapping_mul(magic)) >> shift;
                table[idx as usize] = reference[&occ];
            }
            MagicEntry {
                mask,
                magic,
                shift,
                table: table.into_boxed_slice(),
            }
        })
        .collect()
}

pub(crate) struct MagicTables {
    rook: Vec<MagicEntry>,
    bishop: Vec<MagicEntry>,
}

impl MagicTables {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(MAGIC_SEARCH_SEED);
        let rook = build_table(&ROOK_DELTAS, &mut rng);
        let bishop = build_table(&BISHOP_DELTAS, &mut rng);
        MagicTables { rook, bishop }
    }

    #[inline]
    pub(crate) fn rook_attacks(&self, square: usize, occupied: u64) -> u64 {
        self.rook[square].attacks(occupied)
    }

    #[inline]
    pub(crate) fn bishop_attacks(&self, square: usize, occupied: u64) -> u64 {
        self.bishop[square].attacks(occupied)
    }
}

pub(crate) static MAGICS: LazyLock<MagicTables> = LazyLock::new(MagicTables::generate);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_attacks_empty_board_center() {
        let occ = 0u64;
        let attacks = MAGICS.rook_attacks(27, occ); // d4 if a1=0
        let expected = sliding_attacks(27, occ, &ROOK_DELTAS, false);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn bishop_attacks_with_blockers() {
        let occ = 1u64 << 18; // c3
        let attacks = MAGICS.bishop_attacks(27, occ);
        let expected = sliding_attacks(27, occ, &BISHOP_DELTAS, false);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn rook_attacks_corner() {
        let occ = 0u64;
        let attacks = MAGICS.rook_attacks(0, occ);
        let expected = sliding_attacks(0, occ, &ROOK_DELTAS, false);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn subsets_of_mask_covers_all_combinations() {
        let mask = 0b1011;
        let subsets = subsets_of(mask);
        assert_eq!(subsets.len(), 1 << mask.count_ones());
        let unique: std::collections::HashSet<_> = subsets.iter().copied().collect();
        assert_eq!(unique.len(), subsets.len());
    }
}
