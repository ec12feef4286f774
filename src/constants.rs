//! Board geometry, search sentinels and default engine parameters.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of pits on each side of the board.
pub const PITS: usize = 6;

/// Length of one lap of the sowing path: own pits, own store, opponent pits.
/// The opponent's store is never part of the path.
pub const LAP: usize = 2 * PITS + 1;

/// Position of the mover's own store on the sowing path.
pub const STORE: usize = PITS;

/// Default number of stones placed in each pit at the start of a game.
pub const DEFAULT_STONES: u32 = 4;

// =============================================================================
// Alpha-Beta Parameters
// =============================================================================

/// Score of a won position before the ply adjustment.
pub const WIN: i32 = 10_000;

/// Score of a lost position before the ply adjustment.
pub const LOSS: i32 = -10_000;

/// Bound wider than any reachable score.
pub const INF: i32 = 2 * WIN;

/// Default lookahead, in moves for each side.
pub const DEFAULT_DEPTH: usize = 6;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of iterations per move.
pub const DEFAULT_ITERATIONS: usize = 500_000;

/// Default UCB1 exploration constant (roughly sqrt(2)).
pub const DEFAULT_EXPLORATION: f64 = 1.414;

/// Stand-in for a zero visit count in the UCB1 denominator.
pub const VISIT_FLOOR: f64 = 1e-6;
