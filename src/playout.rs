//! Light Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves for whichever side is on
//! turn until the game ends. Bonus moves follow the normal rules: the same
//! side picks the next random move.

use fastrand::Rng;

use crate::board::{Board, GameResult, Player, apply_move, check_end};
use crate::constants::PITS;

/// Play random moves from `board` with `to_move` on turn until the game ends.
///
/// The board is left in its final, swept state.
pub fn playout(board: &mut Board, mut to_move: Player, rng: &mut Rng) -> GameResult {
    loop {
        if let Some(result) = check_end(board) {
            return result;
        }
        let pit = random_move(board, to_move, rng);
        to_move = apply_move(board, pit, to_move).next;
    }
}

/// Pick one of `player`'s non-empty pits uniformly at random.
///
/// # Panics
///
/// Panics if `player` has no legal move.
pub fn random_move(board: &Board, player: Player, rng: &mut Rng) -> usize {
    assert!(board.has_moves(player), "{player} has no legal move:\n{board}");
    let side = board.side(player);
    loop {
        let pit = rng.usize(..PITS);
        if side[pit] > 0 {
            return pit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::new_board;

    #[test]
    fn test_playout_finishes_and_conserves() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..100 {
            let mut board = new_board(4);
            let result = playout(&mut board, Player::South, &mut rng);

            assert_eq!(board.total_stones(), 48);
            let mut again = board;
            assert_eq!(check_end(&mut again), Some(result));
        }
    }

    #[test]
    fn test_random_move_only_picks_legal_pits() {
        let board = Board::from_sides([0, 0, 3, 0, 0, 1], 0, [1; PITS], 0);
        let mut rng = Rng::with_seed(1);
        for _ in 0..200 {
            let pit = random_move(&board, Player::North, &mut rng);
            assert!(pit == 2 || pit == 5, "picked empty pit {pit}");
        }
    }

    #[test]
    fn test_seeded_playouts_repeat() {
        let mut a = new_board(4);
        let mut b = new_board(4);
        let ra = playout(&mut a, Player::North, &mut Rng::with_seed(99));
        let rb = playout(&mut b, Player::North, &mut Rng::with_seed(99));
        assert_eq!(ra, rb);
        assert_eq!(a, b);
    }
}
