//! Transformer: the first-layer feature weights plus the king-bucketed
//! second-layer weight blocks, bundled as a single immutable snapshot of
//! the currently-loaded network.

use std::sync::Arc;

use super::weights::{self, NnueWeights};
use super::{simd, FIRST_OUT, SECOND_HEAD_OUT};
use crate::board::types::Square;

/// `firstW2[add][remove][i] = firstW[add][i] - firstW[remove][i]`,
/// saturated to `i16`. Fuses the common "a piece leaves one square and
/// (the same or a promoted) piece arrives at another" pattern, which is
/// every non-capture, non-king-move accumulator update, into one vector
/// add instead of a subtract pass followed by an add pass.
///
/// Built once per loaded network and shared via the same `Arc` as the
/// weights it's derived from; 640*640*8 `i16` entries (~6.5 MiB).
pub(crate) struct DeltaTable {
    /// Indexed `[add][remove][i]`; a boxed slice rather than a nested
    /// fixed-size array so the ~6.5 MiB table is heap-allocated directly
    /// instead of built on the stack first.
    table: Box<[[[i16; FIRST_OUT]; super::FEATURE_COUNT]]>,
}

impl DeltaTable {
    pub(crate) fn build(weights: &NnueWeights) -> Self {
        let mut table = vec![[[0i16; FIRST_OUT]; super::FEATURE_COUNT]; super::FEATURE_COUNT].into_boxed_slice();
        for (add, add_row) in weights.first_layer_weights.iter().enumerate() {
            for (remove, remove_row) in weights.first_layer_weights.iter().enumerate() {
                for i in 0..FIRST_OUT {
                    table[add][remove][i] = add_row[i].saturating_sub(remove_row[i]);
                }
            }
        }
        DeltaTable { table }
    }

    #[inline]
    fn delta(&self, add: usize, remove: usize) -> &[i16; FIRST_OUT] {
        &self.table[add][remove]
    }
}

/// A snapshot of the currently-active network's first- and second-layer
/// weights, plus the fused add/remove delta table derived from them.
/// Cheap to obtain (an `Arc` clone) and safe to hold across a single
/// accumulator update or evaluation; a concurrent `EvalFile` reload will
/// not mutate a snapshot already in hand.
pub struct Transformer {
    weights: Arc<NnueWeights>,
    deltas: Arc<DeltaTable>,
}

impl Transformer {
    /// Snapshot of the network currently installed (the placeholder
    /// network until an `EvalFile` has been loaded).
    #[must_use]
    pub fn current() -> Transformer {
        Transformer { weights: weights::current(), deltas: weights::current_deltas() }
    }

    #[must_use]
    pub(crate) fn bias(&self) -> [i16; FIRST_OUT] {
        self.weights.first_layer_bias
    }

    pub(crate) fn add_feature(&self, values: &mut [i16; FIRST_OUT], feature: usize) {
        let row = &self.weights.first_layer_weights[feature];
        for i in 0..FIRST_OUT {
            values[i] = values[i].saturating_add(row[i]);
        }
    }

    pub(crate) fn remove_feature(&self, values: &mut [i16; FIRST_OUT], feature: usize) {
        let row = &self.weights.first_layer_weights[feature];
        for i in 0..FIRST_OUT {
            values[i] = values[i].saturating_sub(row[i]);
        }
    }

    /// Apply `firstW[add] - firstW[remove]` in a single pass, for the
    /// common case of a piece leaving one square and a piece arriving at
    /// another in the same update.
    pub(crate) fn add_and_remove_feature(&self, values: &mut [i16; FIRST_OUT], add: usize, remove: usize) {
        let delta = self.deltas.delta(add, remove);
        for i in 0..FIRST_OUT {
            values[i] = values[i].saturating_add(delta[i]);
        }
    }

    /// Run the turn-perspective second-layer head, bucketed by `king_square`.
    #[must_use]
    pub(crate) fn turn_head(&self, accumulator: &[i16; FIRST_OUT], king_square: Square) -> [i16; SECOND_HEAD_OUT] {
        let bucket = &self.weights.second_layer_turn[king_square.as_index()];
        simd::linear_layer(accumulator, bucket, &self.weights.second_layer_turn_bias)
    }

    /// Run the not-turn-perspective second-layer head, bucketed by `king_square`.
    #[must_use]
    pub(crate) fn not_turn_head(&self, accumulator: &[i16; FIRST_OUT], king_square: Square) -> [i16; SECOND_HEAD_OUT] {
        let bucket = &self.weights.second_layer_not_turn[king_square.as_index()];
        simd::linear_layer(accumulator, bucket, &self.weights.second_layer_not_turn_bias)
    }
}
