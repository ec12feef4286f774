//! Common interface for move-choosing engines.
//!
//! Drivers hold a `Box<dyn Engine>` and do not care which search is behind it.

use clap::ValueEnum;

use crate::alphabeta::AlphaBeta;
use crate::board::{Board, Player};
use crate::constants::{DEFAULT_DEPTH, DEFAULT_EXPLORATION, DEFAULT_ITERATIONS};
use crate::eval::EvaluatorKind;
use crate::mcts::Mcts;

/// The move an engine picked and how it rates it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Pit to play, relative to the searching player's side.
    pub pit: usize,
    /// Engine-specific score: minimax value for alpha-beta, win percentage for MCTS.
    pub value: i32,
    /// Positions (alpha-beta) or iterations (MCTS) examined.
    pub nodes: u64,
}

/// A move-choosing strategy.
pub trait Engine {
    /// Short name for game reports.
    fn name(&self) -> &str;

    /// Pick a move for `player`, who must have a legal move on `board`.
    ///
    /// `played` lists every move made on the real board since this engine's
    /// previous search, starting with the move that search returned. It is
    /// empty on the first call. Engines without memory ignore it.
    fn choose_move(&mut self, board: &Board, player: Player, played: &[usize]) -> SearchResult;
}

/// Available search algorithms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Monte Carlo Tree Search with UCB1.
    Mcts,
    /// Alpha-beta minimax.
    AlphaBeta,
}

/// Search parameters shared by every engine a driver creates.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Alpha-beta lookahead in moves for each side.
    pub depth: usize,
    /// MCTS iterations per move.
    pub iterations: usize,
    /// UCB1 exploration constant, strictly positive.
    pub exploration: f64,
    /// Alpha-beta horizon evaluator.
    pub evaluator: EvaluatorKind,
    /// Fixed MCTS seed; `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            iterations: DEFAULT_ITERATIONS,
            exploration: DEFAULT_EXPLORATION,
            evaluator: EvaluatorKind::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Build an engine of the given kind.
    ///
    /// `salt` is added to a fixed seed so two seeded engines in one game
    /// do not share a random stream.
    pub fn build(&self, kind: EngineKind, salt: u64) -> Box<dyn Engine> {
        match kind {
            EngineKind::AlphaBeta => {
                Box::new(AlphaBeta::with_evaluator(self.depth, self.evaluator.boxed()))
            }
            EngineKind::Mcts => match self.seed {
                Some(seed) => Box::new(Mcts::with_seed(
                    self.iterations,
                    self.exploration,
                    seed.wrapping_add(salt),
                )),
                None => Box::new(Mcts::new(self.iterations, self.exploration)),
            },
        }
    }
}
