//! UCI `go` parameters to a [`SearchLimits`](crate::board::search::SearchLimits).
//!
//! All the actual time budgeting (clock + increment into a wall-clock
//! budget, iteration-prediction stopping) lives in `board::search::time`;
//! this module only has to translate what the GUI sent.

use std::time::Duration;

use crate::board::search::SearchLimits;
use crate::uci::GoParams;

#[must_use]
pub fn limits_from_go_params(params: &GoParams) -> SearchLimits {
    SearchLimits {
        white_time: params.wtime.map(Duration::from_millis),
        black_time: params.btime.map(Duration::from_millis),
        white_inc: params.winc.map(Duration::from_millis).unwrap_or(Duration::ZERO),
        black_inc: params.binc.map(Duration::from_millis).unwrap_or(Duration::ZERO),
        movetime: params.movetime.map(Duration::from_millis),
        depth: params.depth,
        nodes: params.nodes,
        infinite: params.infinite || params.ponder,
    }
}
