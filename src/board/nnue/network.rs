//! The NNUEU multilayer perceptron: two king-bucketed second-layer heads,
//! a third linear layer, and a final scalar output layer.

use super::{simd, weights, Transformer, NNUE_SCALE, SECOND_HEAD_OUT, SECOND_OUT, THIRD_OUT};
use crate::board::position::BitPosition;
use crate::board::types::Color;

/// Marker type for the NNUEU evaluation function; carries no state of
/// its own, since the accumulator lives on `BitPosition` and the weights
/// live in the process-wide, swappable [`weights`] store.
pub struct Network;

impl Network {
    /// Evaluate `position` from `perspective`'s point of view.
    ///
    /// Brings both accumulator perspectives up to date (lazily, from the
    /// last computed ancestor), runs the turn / not-turn second-layer
    /// heads bucketed by each side's king square, concatenates them
    /// through the third and final layers, and negates the side-to-move
    /// relative output if `perspective` is not the side to move.
    #[must_use]
    pub fn evaluate(position: &mut BitPosition, perspective: Color) -> i16 {
        let side_to_move = position.side_to_move();
        position.nnue.ensure_computed(Color::White);
        position.nnue.ensure_computed(Color::Black);

        let transformer = Transformer::current();
        let top = position.nnue.top();

        let turn_king = position.king_square(side_to_move);
        let not_turn_king = position.king_square(side_to_move.opponent());

        let turn_vector = top.perspective(side_to_move);
        let not_turn_vector = top.perspective(side_to_move.opponent());

        let turn_head = transformer.turn_head(turn_vector, turn_king);
        let not_turn_head = transformer.not_turn_head(not_turn_vector, not_turn_king);

        let mut concatenated = [0i16; SECOND_OUT];
        concatenated[..SECOND_HEAD_OUT].copy_from_slice(&turn_head);
        concatenated[SECOND_HEAD_OUT..].copy_from_slice(&not_turn_head);

        let nnue_weights = weights::current();
        let third = simd::linear_layer::<SECOND_OUT, THIRD_OUT>(
            &concatenated,
            &nnue_weights.third_layer_weights,
            &nnue_weights.third_layer_biases,
        );
        let output = simd::linear_layer::<THIRD_OUT, 1>(
            &third,
            &nnue_weights.final_layer_weights,
            &nnue_weights.final_layer_biases,
        );
        let raw = output[0];

        if perspective == side_to_move {
            raw
        } else {
            NNUE_SCALE - raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_is_self_consistent_under_perspective_flip() {
        let mut position = BitPosition::new();
        let side_to_move = position.side_to_move();
        let white = Network::evaluate(&mut position, side_to_move);
        let black = Network::evaluate(&mut position, side_to_move.opponent());
        assert_eq!(white, NNUE_SCALE - black);
    }

    #[test]
    fn evaluate_stays_in_roughly_expected_range() {
        let mut position = BitPosition::new();
        let side_to_move = position.side_to_move();
        let value = Network::evaluate(&mut position, side_to_move);
        assert!(value >= 0);
    }
}
