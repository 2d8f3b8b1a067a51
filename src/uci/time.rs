//! UCI time management.
//!
//! Re-exports the `go`-params-to-`SearchLimits` translation from the engine
//! module for backward compatibility.

pub use crate::engine::time::limits_from_go_params;
