//! Kalah board representation and move execution.
//!
//! This module provides the rules engine:
//! - Sowing stones counter-clockwise, skipping the opponent's store
//! - The capture rule for a last stone landing in an empty own pit
//! - The bonus-move rule for a last stone landing in the own store
//! - End-of-game detection with the final sweep
//!
//! Moves are always pit indices relative to the moving player's own side.
//! Own pit `i` faces opponent pit `PITS - 1 - i`.

use std::cmp::Ordering;
use std::fmt;

use crate::constants::{LAP, PITS, STORE};

/// One of the two sides of the board.
///
/// `North` is drawn along the top row and is the engine's side in an
/// interactive game; `South` is drawn along the bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    North,
    South,
}

impl Player {
    /// Both players, North first.
    pub const BOTH: [Player; 2] = [Player::North, Player::South];

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::North => Player::South,
            Player::South => Player::North,
        }
    }

    /// Row of this player's pits and store in [`Board`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::North => 0,
            Player::South => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::North => write!(f, "north"),
            Player::South => write!(f, "south"),
        }
    }
}

/// Final result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Win(Player),
    Tie,
}

impl GameResult {
    /// The winning player, or `None` for a tie.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(p) => Some(p),
            GameResult::Tie => None,
        }
    }
}

/// What happened after sowing one pit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Player to move next.
    pub next: Player,
    /// The last stone landed in the mover's store, so the mover goes again.
    pub bonus: bool,
}

/// A Kalah board: six pits and one store per side.
///
/// The board is a small `Copy` value so that search can clone it freely.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Pit counts, indexed by [`Player::index`] then pit.
    pub pits: [[u32; PITS]; 2],
    /// Store counts, indexed by [`Player::index`].
    pub stores: [u32; 2],
    /// Player whose move produced this configuration (`None` before the first move).
    pub mover: Option<Player>,
}

impl Default for Board {
    fn default() -> Self {
        new_board(crate::constants::DEFAULT_STONES)
    }
}

impl Board {
    /// Build an arbitrary position from each side's pits and store.
    pub fn from_sides(
        north_pits: [u32; PITS],
        north_store: u32,
        south_pits: [u32; PITS],
        south_store: u32,
    ) -> Self {
        Board {
            pits: [north_pits, south_pits],
            stores: [north_store, south_store],
            mover: None,
        }
    }

    /// The pits on `player`'s side.
    #[inline]
    pub fn side(&self, player: Player) -> &[u32; PITS] {
        &self.pits[player.index()]
    }

    #[inline]
    pub fn store(&self, player: Player) -> u32 {
        self.stores[player.index()]
    }

    /// Stones still in play on `player`'s side (store excluded).
    #[inline]
    pub fn side_stones(&self, player: Player) -> u32 {
        self.side(player).iter().sum()
    }

    /// Every stone on the board, stores included. Constant over a game.
    pub fn total_stones(&self) -> u32 {
        self.stores.iter().sum::<u32>() + self.pits.iter().flatten().sum::<u32>()
    }

    /// True if `player` has at least one non-empty pit.
    #[inline]
    pub fn has_moves(&self, player: Player) -> bool {
        self.side(player).iter().any(|&s| s > 0)
    }

    /// A view of the board with South drawn on top.
    pub fn reversed(&self) -> Reversed<'_> {
        Reversed(self)
    }
}

/// Create the starting position with `stones_per_pit` stones in every pit.
pub fn new_board(stones_per_pit: u32) -> Board {
    Board {
        pits: [[stones_per_pit; PITS]; 2],
        stores: [0; 2],
        mover: None,
    }
}

/// Non-empty pits on `player`'s side, lowest index first.
pub fn legal_moves(board: &Board, player: Player) -> Vec<usize> {
    board
        .side(player)
        .iter()
        .enumerate()
        .filter(|&(_, &stones)| stones > 0)
        .map(|(pit, _)| pit)
        .collect()
}

/// Sow the stones from `mover`'s `pit`.
///
/// Handles the capture and bonus-move rules, which only look at where the
/// final stone lands.
///
/// # Panics
///
/// Panics if `pit` is out of range or empty. Callers only offer moves taken
/// from [`legal_moves`] or validated at the input boundary.
pub fn apply_move(board: &mut Board, pit: usize, mover: Player) -> MoveOutcome {
    assert!(pit < PITS, "{mover} played pit {pit}, expected 0..{PITS}");

    let own = mover.index();
    let opp = mover.opponent().index();

    let mut hand = board.pits[own][pit];
    assert!(hand > 0, "{mover} played empty pit {pit}:\n{board}");
    board.pits[own][pit] = 0;

    let mut pos = pit;
    while hand > 0 {
        pos = (pos + 1) % LAP;
        hand -= 1;
        match pos {
            p if p < PITS => board.pits[own][p] += 1,
            STORE => board.stores[own] += 1,
            p => board.pits[opp][p - STORE - 1] += 1,
        }
    }
    board.mover = Some(mover);

    if pos == STORE {
        return MoveOutcome {
            next: mover,
            bonus: true,
        };
    }

    // A count of one means the pit was empty before the last stone.
    if pos < PITS && board.pits[own][pos] == 1 {
        let across = PITS - 1 - pos;
        let captured = board.pits[opp][across];
        if captured > 0 {
            board.pits[own][pos] = 0;
            board.pits[opp][across] = 0;
            board.stores[own] += captured + 1;
        }
    }

    MoveOutcome {
        next: mover.opponent(),
        bonus: false,
    }
}

/// Check whether the game is over, sweeping the remaining stones if so.
///
/// A store holding more than half of all stones ends the game at once.
/// Otherwise the game ends when either side runs out of stones: each side
/// moves its remaining pit stones into its own store and the stores decide.
///
/// The sweep mutates the board. Checking a swept board again returns the
/// same result and changes nothing.
pub fn check_end(board: &mut Board) -> Option<GameResult> {
    let total = board.total_stones();
    for player in Player::BOTH {
        if 2 * board.store(player) > total {
            return Some(GameResult::Win(player));
        }
    }

    if Player::BOTH.iter().all(|&p| board.has_moves(p)) {
        return None;
    }

    for player in Player::BOTH {
        let swept = board.side_stones(player);
        board.pits[player.index()] = [0; PITS];
        board.stores[player.index()] += swept;
    }

    Some(match board.stores[0].cmp(&board.stores[1]) {
        Ordering::Greater => GameResult::Win(Player::North),
        Ordering::Less => GameResult::Win(Player::South),
        Ordering::Equal => GameResult::Tie,
    })
}

/// Draw `board` with `top`'s pits along the first line, right to left.
fn write_board(f: &mut fmt::Formatter<'_>, board: &Board, top: Player) -> fmt::Result {
    let bottom = top.opponent();

    write!(f, "  ")?;
    for stones in board.side(top).iter().rev() {
        write!(f, " {stones:2}")?;
    }
    writeln!(f)?;

    writeln!(f, "{:2}                   {:2}", board.store(top), board.store(bottom))?;

    write!(f, "  ")?;
    for stones in board.side(bottom) {
        write!(f, " {stones:2}")?;
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_board(f, self, Player::North)
    }
}

/// Board view drawn upside down, see [`Board::reversed`].
pub struct Reversed<'a>(&'a Board);

impl fmt::Display for Reversed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_board(f, self.0, Player::South)
    }
}
