//! Chess board representation and game logic.
//!
//! Bitboard piece placement with incremental Zobrist hashing, a staged
//! pin- and check-aware legal move generator on magic-bitboard attack
//! tables, an incrementally-updated NNUE evaluator, and the search that
//! ties them together.
//!
//! # Example
//! ```
//! use chess_engine::board::BitPosition;
//!
//! let pos = BitPosition::new();
//! let moves = pos.generate_legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attack_tables;
pub mod error;
mod history;
pub mod nnue;
pub mod position;
pub mod prelude;
pub mod search;
pub mod tt;
mod types;
pub mod zobrist;

pub use error::{FenError, MoveParseError};
pub use position::{BitPosition, UndoState};
pub use types::{Bitboard, CastlingRights, Color, Move, MoveList, MoveListIntoIter, Piece, Square};

pub use search::{SearchLimits, SearchReport, ThreadPool, Worker};
pub use tt::{TranspositionTable, DEFAULT_TT_MB};
