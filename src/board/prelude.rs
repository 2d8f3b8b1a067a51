//! Prelude module for convenient imports.
//!
//! # Example
//! ```
//! use chess_engine::board::prelude::*;
//! ```

pub use super::{
    BitPosition, CastlingRights, Color, FenError, Move, MoveList, MoveParseError, Piece, Square,
};
pub use super::search::{SearchLimits, SearchReport, ThreadPool, Worker};
