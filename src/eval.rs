//! Static evaluation of positions at the alpha-beta horizon.
//!
//! Evaluators are heuristics with no claim to game-theoretic accuracy.
//! Scores are always from the point of view of `perspective`.

use clap::ValueEnum;

use crate::board::{Board, Player};
use crate::constants::PITS;

/// Built-in evaluators, selectable from the command line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EvaluatorKind {
    /// Store difference only.
    #[default]
    StoreDifference,
    /// Store difference plus weighted stones in one's own pits.
    PitWeighted,
}

impl EvaluatorKind {
    pub fn boxed(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::StoreDifference => Box::new(StoreDifference),
            EvaluatorKind::PitWeighted => Box::new(PitWeighted::default()),
        }
    }
}

/// A static evaluation function.
pub trait Evaluator {
    /// Score `board` for `perspective`; larger is better for that player.
    fn evaluate(&self, board: &Board, perspective: Player) -> i32;
}

/// Own store minus the opponent's store.
#[derive(Copy, Clone, Debug, Default)]
pub struct StoreDifference;

impl Evaluator for StoreDifference {
    fn evaluate(&self, board: &Board, perspective: Player) -> i32 {
        store_difference(board, perspective)
    }
}

/// Store difference plus a bonus for stones still held in one's own pits.
///
/// Pits nearer the own store can be weighted more heavily; the bonus is
/// `sum(weights[i] * pit[i]) / divisor`. The weights are empirical.
#[derive(Copy, Clone, Debug)]
pub struct PitWeighted {
    pub weights: [i32; PITS],
    pub divisor: i32,
}

impl Default for PitWeighted {
    fn default() -> Self {
        Self {
            weights: [1, 1, 1, 1, 1, 2],
            divisor: 3,
        }
    }
}

impl Evaluator for PitWeighted {
    fn evaluate(&self, board: &Board, perspective: Player) -> i32 {
        let held: i32 = board
            .side(perspective)
            .iter()
            .zip(self.weights)
            .map(|(&stones, w)| stones as i32 * w)
            .sum();
        store_difference(board, perspective) + held / self.divisor.max(1)
    }
}

#[inline]
fn store_difference(board: &Board, perspective: Player) -> i32 {
    board.store(perspective) as i32 - board.store(perspective.opponent()) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_difference() {
        let board = Board::from_sides([1; PITS], 10, [2; PITS], 4);
        assert_eq!(StoreDifference.evaluate(&board, Player::North), 6);
        assert_eq!(StoreDifference.evaluate(&board, Player::South), -6);
    }

    #[test]
    fn test_pit_weighted_prefers_stones_near_store() {
        let near = Board::from_sides([0, 0, 0, 0, 0, 3], 5, [1; PITS], 5);
        let far = Board::from_sides([3, 0, 0, 0, 0, 0], 5, [1; PITS], 5);
        let eval = PitWeighted::default();

        assert_eq!(eval.evaluate(&near, Player::North), 2);
        assert_eq!(eval.evaluate(&far, Player::North), 1);
        // South holds 6 stones at weight 7 in total: 7 / 3 = 2.
        assert_eq!(eval.evaluate(&near, Player::South), 2);
    }

    #[test]
    fn test_kind_builds_matching_evaluator() {
        let board = Board::from_sides([0, 0, 0, 0, 0, 3], 5, [1; PITS], 2);
        assert_eq!(EvaluatorKind::StoreDifference.boxed().evaluate(&board, Player::North), 3);
        assert_eq!(EvaluatorKind::PitWeighted.boxed().evaluate(&board, Player::North), 5);
    }
}
