//! Depth-limited minimax search with alpha-beta pruning.
//!
//! Scores are from the searching player's point of view. The horizon is
//! counted in plies, two per requested move depth. A bonus move keeps the
//! same player on turn and does not use up a ply, so bonus-move chains are
//! searched to their end.
//!
//! Finished games score `WIN - ply` or `LOSS + ply`, so a faster win is
//! preferred over a slower one and a slower loss over a faster one.
//!
//! # Example
//!
//! ```
//! use kalah_rust::alphabeta::choose_move_alphabeta;
//! use kalah_rust::board::{new_board, Player};
//! use kalah_rust::eval::StoreDifference;
//!
//! let board = new_board(4);
//! let result = choose_move_alphabeta(&board, Player::North, 3, &StoreDifference);
//! assert!(result.pit < 6);
//! ```

use log::debug;

use crate::board::{Board, GameResult, Player, apply_move, check_end, legal_moves};
use crate::constants::{INF, LOSS, PITS, WIN};
use crate::engine::{Engine, SearchResult};
use crate::eval::{Evaluator, StoreDifference};

/// Alpha-beta engine: a search depth plus an evaluator for the horizon.
pub struct AlphaBeta {
    depth: usize,
    evaluator: Box<dyn Evaluator>,
}

impl AlphaBeta {
    /// Search `depth` moves for each side, scoring the horizon by store difference.
    pub fn new(depth: usize) -> Self {
        Self::with_evaluator(depth, Box::new(StoreDifference))
    }

    pub fn with_evaluator(depth: usize, evaluator: Box<dyn Evaluator>) -> Self {
        Self { depth, evaluator }
    }
}

impl Engine for AlphaBeta {
    fn name(&self) -> &str {
        "A/B"
    }

    fn choose_move(&mut self, board: &Board, player: Player, _played: &[usize]) -> SearchResult {
        choose_move_alphabeta(board, player, self.depth, self.evaluator.as_ref())
    }
}

/// Pick the best pit for `player`, looking `depth` moves ahead for each side.
///
/// Among pits of equal value the lowest index is kept.
///
/// # Panics
///
/// Panics if `player` has no legal move.
pub fn choose_move_alphabeta(
    board: &Board,
    player: Player,
    depth: usize,
    evaluator: &dyn Evaluator,
) -> SearchResult {
    let mut search = Search {
        player,
        max_ply: 2 * depth,
        evaluator,
        nodes: 0,
    };
    let result = search.root(board);
    debug!(
        "alpha-beta {player}: pit {} value {} ({} nodes, depth {depth})",
        result.pit, result.value, result.nodes
    );
    result
}

/// State for one search call.
struct Search<'a> {
    player: Player,
    max_ply: usize,
    evaluator: &'a dyn Evaluator,
    nodes: u64,
}

impl Search<'_> {
    /// Try each of the player's pits and keep the first one with the best value.
    fn root(&mut self, board: &Board) -> SearchResult {
        let moves = legal_moves(board, self.player);
        assert!(!moves.is_empty(), "{} has no legal move:\n{board}", self.player);

        let mut best_pit = moves[0];
        let mut best_value = -INF;

        for pit in moves {
            let mut child = *board;
            let outcome = apply_move(&mut child, pit, self.player);
            let ply = if outcome.bonus { 0 } else { 1 };
            let value = self.value(child, ply, outcome.next, best_value, INF);
            if value > best_value {
                best_value = value;
                best_pit = pit;
            }
        }

        SearchResult {
            pit: best_pit,
            value: best_value,
            nodes: self.nodes,
        }
    }

    /// Minimax value of `board` with `ply` plies already consumed.
    fn value(&mut self, mut board: Board, ply: usize, to_move: Player, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        if let Some(result) = check_end(&mut board) {
            return self.terminal(result, ply);
        }
        if ply >= self.max_ply {
            return self.evaluator.evaluate(&board, self.player);
        }

        let maximizing = to_move == self.player;
        let mut best = if maximizing { -INF } else { INF };

        for pit in 0..PITS {
            if board.side(to_move)[pit] == 0 {
                continue;
            }
            let mut child = board;
            let outcome = apply_move(&mut child, pit, to_move);
            let next_ply = if outcome.bonus { ply } else { ply + 1 };
            let value = self.value(child, next_ply, outcome.next, alpha, beta);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }

    fn terminal(&self, result: GameResult, ply: usize) -> i32 {
        let ply = ply as i32;
        match result.winner() {
            Some(winner) if winner == self.player => WIN - ply,
            Some(_) => LOSS + ply,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::new_board;
    use crate::eval::PitWeighted;

    #[test]
    fn test_takes_immediate_winning_capture() {
        // North pit 0 lands in empty pit 1 and captures the 10 stones across.
        let board = Board::from_sides([1, 0, 0, 0, 0, 4], 14, [1, 1, 1, 1, 10, 1], 14);
        let result = choose_move_alphabeta(&board, Player::North, 3, &StoreDifference);
        assert_eq!(result.pit, 0);
        assert_eq!(result.value, WIN - 1);
    }

    #[test]
    fn test_bonus_move_keeps_turn_within_ply() {
        // The capture alone reaches exactly half the stones. Playing pit 5 first
        // banks a bonus stone, and the capture that follows then wins.
        let board = Board::from_sides([1, 0, 0, 0, 0, 1], 10, [1, 1, 1, 1, 10, 1], 15);
        let result = choose_move_alphabeta(&board, Player::North, 2, &StoreDifference);
        assert_eq!(result.pit, 5);
        assert_eq!(result.value, WIN - 1);
    }

    #[test]
    fn test_loss_scores_below_zero() {
        // South already holds more than half the stones, so North's only move loses.
        let board = Board::from_sides([0, 0, 0, 0, 0, 2], 14, [1, 0, 0, 0, 0, 0], 20);
        let result = choose_move_alphabeta(&board, Player::North, 2, &StoreDifference);
        assert_eq!(result.pit, 5);
        assert_eq!(result.value, LOSS + 1);
        assert!(result.value < 0, "expected a losing score, got {}", result.value);
    }

    #[test]
    fn test_deterministic() {
        let board = new_board(4);
        let first = choose_move_alphabeta(&board, Player::South, 4, &StoreDifference);
        let second = choose_move_alphabeta(&board, Player::South, 4, &StoreDifference);
        assert_eq!(first, second);
    }

    #[test]
    fn test_engine_uses_evaluator() {
        let board = new_board(4);
        let mut engine = AlphaBeta::with_evaluator(2, Box::new(PitWeighted::default()));
        let result = engine.choose_move(&board, Player::North, &[]);
        let direct = choose_move_alphabeta(&board, Player::North, 2, &PitWeighted::default());
        assert_eq!(result, direct);
        assert_eq!(engine.name(), "A/B");
    }

    #[test]
    fn test_long_bonus_chain_terminates() {
        // Every North pit holds exactly enough stones to reach the store.
        let board = Board::from_sides([6, 5, 4, 3, 2, 1], 0, [1; PITS], 0);
        let result = choose_move_alphabeta(&board, Player::North, 1, &StoreDifference);
        assert!(result.pit < PITS);
        assert!(result.nodes > 0);
    }

    #[test]
    #[should_panic(expected = "no legal move")]
    fn test_no_moves_panics() {
        let board = Board::from_sides([0; PITS], 10, [1; PITS], 10);
        choose_move_alphabeta(&board, Player::North, 1, &StoreDifference);
    }
}
