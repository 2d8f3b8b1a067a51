//! Engine controller gluing the UCI protocol layer to `board::search`.
//!
//! Owns the position and the Lazy-SMP thread pool, and runs searches on a
//! background control thread so `go`/`stop`/`ponderhit` can be handled
//! without blocking the UCI input loop.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob};
pub use time::limits_from_go_params;
