//! Kalah-Rust: a Kalah (mancala) engine with alpha-beta and MCTS players.
//!
//! The board has six pits and one store per side. Moves sow stones
//! counter-clockwise, with captures and bonus moves.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, search sentinels and defaults
//! - [`board`] - Game rules (sowing, captures, bonus moves, game end)
//! - [`eval`] - Static evaluation at the alpha-beta horizon
//! - [`alphabeta`] - Depth-limited alpha-beta minimax
//! - [`playout`] - Random game simulation for MCTS
//! - [`mcts`] - Monte Carlo Tree Search with UCB1 and tree reuse
//! - [`engine`] - The `Engine` trait shared by both searches
//! - [`play`] - Interactive and engine-vs-engine game drivers
//!
//! ## Example
//!
//! ```
//! use kalah_rust::board::{apply_move, check_end, new_board, Player};
//! use kalah_rust::mcts::Mcts;
//!
//! let mut board = new_board(4);
//!
//! // Pit 2 holds four stones; the last one lands in South's store.
//! let outcome = apply_move(&mut board, 2, Player::South);
//! assert!(outcome.bonus);
//! assert!(check_end(&mut board).is_none());
//!
//! // Let MCTS pick South's extra move.
//! let mut mcts = Mcts::with_seed(200, 1.414, 1);
//! let best = mcts.search(&board, Player::South, &[]);
//! println!("Best move: {}", best.pit);
//! ```

pub mod alphabeta;
pub mod board;
pub mod constants;
pub mod engine;
pub mod eval;
pub mod mcts;
pub mod play;
pub mod playout;
