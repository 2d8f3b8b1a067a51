//! Deterministic Zobrist hash keys.
//!
//! Keys are generated once, at process start, from a fixed seed so that
//! hashes are reproducible across builds and machines.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::types::{CastlingRights, Color, Piece, Square};

/// Fixed seed for deterministic key generation.
const ZOBRIST_SEED: u64 = 1_234_567_890;

pub(crate) struct ZobristKeys {
    piece_keys: [[[u64; 64]; 6]; 2],
    black_to_move_key: u64,
    castling_keys: [u64; 16],
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_keys = [[[0u64; 64]; 6]; 2];
        for color in piece_keys.iter_mut() {
            for piece in color.iter_mut() {
                for square in piece.iter_mut() {
                    *square = rng.next_u64();
                }
            }
        }

        let black_to_move_key = rng.next_u64();

        let mut castling_keys = [0u64; 16];
        for key in castling_keys.iter_mut() {
            *key = rng.next_u64();
        }

        let mut en_passant_keys = [0u64; 8];
        for key in en_passant_keys.iter_mut() {
            *key = rng.next_u64();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

pub(crate) static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::generate);

#[inline]
pub(crate) fn piece_square_key(color: Color, piece: Piece, square: Square) -> u64 {
    ZOBRIST.piece_keys[color.index()][piece.index()][square.as_index()]
}

#[inline]
pub(crate) fn side_to_move_key() -> u64 {
    ZOBRIST.black_to_move_key
}

#[inline]
pub(crate) fn castling_key(rights: CastlingRights) -> u64 {
    ZOBRIST.castling_keys[rights.as_u8() as usize & 0xF]
}

#[inline]
pub(crate) fn en_passant_key(file: usize) -> u64 {
    ZOBRIST.en_passant_keys[file]
}
