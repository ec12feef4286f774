//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each iteration runs the four classic phases:
//! - Selection: descend through fully expanded nodes by UCB1
//! - Expansion: add one child for a random untried move
//! - Simulation: a light random playout to the end of the game
//! - Backpropagation: update visits and wins along the descent path
//!
//! Children are owned by their parent. The way back up is the path of child
//! indices recorded during selection, so no node holds a parent pointer.
//!
//! The tree survives between turns. On the next search it is walked forward
//! by the moves played on the real board, and the node reached becomes the
//! new root. Any mismatch falls back to a fresh tree.

use fastrand::Rng;
use log::{debug, trace};

use crate::board::{Board, GameResult, Player, apply_move, check_end, legal_moves};
use crate::constants::VISIT_FLOOR;
use crate::engine::{Engine, SearchResult};
use crate::playout::playout;

/// A node in the MCTS search tree.
pub struct TreeNode {
    /// Pit played to reach this node (`None` for a fresh root).
    pub mv: Option<usize>,
    /// Player who played `mv`; wins are counted for this player.
    pub player: Player,
    /// Legal moves from this position that have no child yet.
    pub untried: Vec<usize>,
    /// Expanded children, in expansion order.
    pub children: Vec<TreeNode>,
    /// Number of iterations through this node.
    pub visits: u32,
    /// Wins for `player`, with ties counting one half.
    pub wins: f64,
}

impl TreeNode {
    /// A fresh root for `board` with `to_move` on turn.
    pub fn root(board: &Board, to_move: Player) -> Self {
        Self {
            mv: None,
            player: to_move.opponent(),
            untried: legal_moves(board, to_move),
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }

    fn child(mv: usize, player: Player, untried: Vec<usize>) -> Self {
        Self {
            mv: Some(mv),
            player,
            untried,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }

    /// Fraction of playouts through this node won by its player.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins / f64::from(self.visits)
        } else {
            0.0
        }
    }

    /// Index of the child reached by playing `mv`, if it was expanded.
    pub fn child_index(&self, mv: usize) -> Option<usize> {
        self.children.iter().position(|c| c.mv == Some(mv))
    }

    /// UCB1 score of this node as seen from a parent with `parent_visits`.
    fn ucb1(&self, parent_visits: u32, exploration: f64) -> f64 {
        let v = f64::from(self.visits).max(VISIT_FLOOR);
        let n = f64::from(parent_visits).max(1.0);
        self.wins / v + exploration * (n.ln() / v).sqrt()
    }

    fn update(&mut self, result: GameResult) {
        self.visits += 1;
        match result {
            GameResult::Win(winner) if winner == self.player => self.wins += 1.0,
            GameResult::Tie => self.wins += 0.5,
            GameResult::Win(_) => {}
        }
    }
}

/// The retained tree plus the position its root stands for.
struct SearchTree {
    root: TreeNode,
    board: Board,
    to_move: Player,
}

/// MCTS engine: iteration budget, exploration constant, RNG and retained tree.
pub struct Mcts {
    iterations: usize,
    exploration: f64,
    rng: Rng,
    tree: Option<SearchTree>,
}

impl Mcts {
    /// Create an engine seeded from system entropy.
    ///
    /// # Panics
    ///
    /// Panics unless `exploration` is strictly positive.
    pub fn new(iterations: usize, exploration: f64) -> Self {
        Self::with_rng(iterations, exploration, Rng::new())
    }

    /// Create an engine with a fixed seed, for reproducible searches.
    pub fn with_seed(iterations: usize, exploration: f64, seed: u64) -> Self {
        Self::with_rng(iterations, exploration, Rng::with_seed(seed))
    }

    fn with_rng(iterations: usize, exploration: f64, rng: Rng) -> Self {
        assert!(
            exploration > 0.0,
            "exploration constant must be positive, got {exploration}"
        );
        Self {
            iterations,
            exploration,
            rng,
            tree: None,
        }
    }

    /// Root of the tree kept from the last search.
    pub fn tree_root(&self) -> Option<&TreeNode> {
        self.tree.as_ref().map(|t| &t.root)
    }

    /// Drop the retained tree so the next search starts from scratch.
    pub fn reset(&mut self) {
        self.tree = None;
    }

    /// Run the iteration budget for `player` on `board` and pick the most visited move.
    ///
    /// `played` is the list of moves made since the previous search, starting
    /// with the move it returned; it lets the old tree be reused. Pass an
    /// empty slice to force a fresh tree.
    ///
    /// # Panics
    ///
    /// Panics if `player` has no legal move.
    pub fn search(&mut self, board: &Board, player: Player, played: &[usize]) -> SearchResult {
        assert!(board.has_moves(player), "{player} has no legal move:\n{board}");

        let mut root = match self.reuse(board, player, played) {
            Some(root) => {
                debug!("mcts: reusing tree, root has {} visits", root.visits);
                root
            }
            None => TreeNode::root(board, player),
        };

        for i in 0..self.iterations {
            iterate(&mut root, board, player, self.exploration, &mut self.rng);
            trace!("mcts: iteration {i}, root visits {}", root.visits);
        }

        let result = match best_child(&root) {
            Some((pit, child)) => SearchResult {
                pit,
                value: (child.winrate() * 100.0) as i32,
                nodes: self.iterations as u64,
            },
            // Only reachable with an empty budget on a fresh root.
            None => SearchResult {
                pit: root.untried.iter().copied().min().unwrap_or_default(),
                value: 0,
                nodes: 0,
            },
        };

        dump_children(&root);
        debug!(
            "mcts {player}: pit {} win {}% ({} iterations)",
            result.pit, result.value, self.iterations
        );

        self.tree = Some(SearchTree {
            root,
            board: *board,
            to_move: player,
        });
        result
    }

    /// Walk the retained tree forward by `played`, checking it lands on `board`.
    fn reuse(&mut self, board: &Board, player: Player, played: &[usize]) -> Option<TreeNode> {
        let SearchTree {
            mut root,
            board: mut replay,
            mut to_move,
        } = self.tree.take()?;

        if played.is_empty() {
            return None;
        }

        for &mv in played {
            if replay.side(to_move).get(mv).copied().unwrap_or(0) == 0 {
                debug!("mcts: history move {mv} is not legal for {to_move}, starting fresh");
                return None;
            }
            let Some(idx) = root.child_index(mv) else {
                debug!("mcts: move {mv} was never expanded, starting fresh");
                return None;
            };
            to_move = apply_move(&mut replay, mv, to_move).next;
            root = root.children.swap_remove(idx);
        }

        let same_position = replay.pits == board.pits && replay.stores == board.stores;
        if !same_position || to_move != player {
            debug!("mcts: history does not reach the current position, starting fresh");
            return None;
        }
        Some(root)
    }
}

impl Engine for Mcts {
    fn name(&self) -> &str {
        "MCTS"
    }

    fn choose_move(&mut self, board: &Board, player: Player, played: &[usize]) -> SearchResult {
        self.search(board, player, played)
    }
}

/// One selection, expansion, simulation and backpropagation pass.
fn iterate(root: &mut TreeNode, board: &Board, player: Player, exploration: f64, rng: &mut Rng) {
    let mut scratch = *board;
    let mut to_move = player;
    let mut path = Vec::new();

    // Selection
    let mut node = &mut *root;
    while node.untried.is_empty() && !node.children.is_empty() {
        let idx = select_child(node, exploration);
        let child = &node.children[idx];
        if let Some(mv) = child.mv {
            to_move = apply_move(&mut scratch, mv, child.player).next;
        }
        path.push(idx);
        node = &mut node.children[idx];
    }

    let mut result = check_end(&mut scratch);

    // Expansion
    if result.is_none() && !node.untried.is_empty() {
        let pick = rng.usize(..node.untried.len());
        let mv = node.untried.swap_remove(pick);
        let outcome = apply_move(&mut scratch, mv, to_move);
        result = check_end(&mut scratch);
        let untried = match result {
            Some(_) => Vec::new(),
            None => legal_moves(&scratch, outcome.next),
        };
        node.children.push(TreeNode::child(mv, to_move, untried));
        path.push(node.children.len() - 1);
        to_move = outcome.next;
    }

    // Simulation
    let result = match result {
        Some(result) => result,
        None => playout(&mut scratch, to_move, rng),
    };

    backpropagate(root, &path, result);
}

/// Child with the highest UCB1 score; the earliest child wins ties.
fn select_child(node: &TreeNode, exploration: f64) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, child) in node.children.iter().enumerate() {
        let score = child.ucb1(node.visits, exploration);
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

/// Update the root and every node on `path` with the playout result.
fn backpropagate(root: &mut TreeNode, path: &[usize], result: GameResult) {
    root.update(result);
    let mut node = root;
    for &idx in path {
        node = &mut node.children[idx];
        node.update(result);
    }
}

/// Most visited root child, lowest pit first among equals.
fn best_child(root: &TreeNode) -> Option<(usize, &TreeNode)> {
    root.children
        .iter()
        .filter_map(|c| c.mv.map(|pit| (pit, c)))
        .max_by(|(pa, a), (pb, b)| a.visits.cmp(&b.visits).then_with(|| pb.cmp(pa)))
}

/// Log statistics for the root's children.
fn dump_children(root: &TreeNode) {
    for child in &root.children {
        debug!(
            "move {} v={} w={:.1} wr={:.3}",
            child.mv.unwrap_or_default(),
            child.visits,
            child.wins,
            child.winrate()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::new_board;
    use crate::constants::DEFAULT_EXPLORATION;

    #[test]
    fn test_finds_winning_capture() {
        let board = Board::from_sides([1, 0, 0, 0, 0, 4], 14, [1, 1, 1, 1, 10, 1], 14);
        let mut mcts = Mcts::with_seed(5_000, DEFAULT_EXPLORATION, 3);
        let result = mcts.search(&board, Player::North, &[]);
        assert_eq!(result.pit, 0);
        assert_eq!(result.value, 100);
    }

    #[test]
    fn test_equal_visits_pick_lowest_pit() {
        // One iteration per legal move: every child ends with a single visit.
        let board = new_board(4);
        let mut mcts = Mcts::with_seed(6, DEFAULT_EXPLORATION, 11);
        let result = mcts.search(&board, Player::South, &[]);

        let root = mcts.tree_root().expect("tree kept after search");
        assert_eq!(root.children.len(), 6);
        assert!(root.children.iter().all(|c| c.visits == 1));
        assert_eq!(result.pit, 0);
    }

    #[test]
    fn test_visits_add_up() {
        let board = new_board(4);
        let mut mcts = Mcts::with_seed(500, DEFAULT_EXPLORATION, 5);
        mcts.search(&board, Player::North, &[]);

        let root = mcts.tree_root().expect("tree kept after search");
        assert_eq!(root.visits, 500);
        assert_eq!(root.children.iter().map(|c| c.visits).sum::<u32>(), 500);
        for child in &root.children {
            assert!(child.wins <= f64::from(child.visits));
            assert_eq!(child.player, Player::North);
        }
    }

    #[test]
    fn test_seeded_search_repeats() {
        let board = new_board(4);
        let a = Mcts::with_seed(800, DEFAULT_EXPLORATION, 42).search(&board, Player::South, &[]);
        let b = Mcts::with_seed(800, DEFAULT_EXPLORATION, 42).search(&board, Player::South, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tree_reuse_keeps_statistics() {
        let mut board = new_board(4);
        let mut mcts = Mcts::with_seed(2_000, DEFAULT_EXPLORATION, 8);
        let first = mcts.search(&board, Player::South, &[]);

        let mut played = vec![first.pit];
        let mut to_move = apply_move(&mut board, first.pit, Player::South).next;
        let carried = {
            let root = mcts.tree_root().expect("tree kept after search");
            let mut node = &root.children[root.child_index(first.pit).expect("chosen move expanded")];
            while to_move != Player::South {
                let reply = node
                    .children
                    .iter()
                    .max_by_key(|c| c.visits)
                    .expect("reply expanded");
                let mv = reply.mv.expect("child has a move");
                played.push(mv);
                to_move = apply_move(&mut board, mv, to_move).next;
                node = reply;
            }
            node.visits
        };
        assert!(carried > 0);

        mcts.search(&board, Player::South, &played);
        let root = mcts.tree_root().expect("tree kept after search");
        assert_eq!(root.visits, carried + 2_000);
    }

    #[test]
    fn test_mismatched_history_starts_fresh() {
        let board = new_board(4);
        let mut mcts = Mcts::with_seed(300, DEFAULT_EXPLORATION, 9);
        mcts.search(&board, Player::South, &[]);

        // The history claims a move was played, but the board is unchanged.
        mcts.search(&board, Player::South, &[3]);
        assert_eq!(mcts.tree_root().map(|r| r.visits), Some(300));

        mcts.search(&board, Player::South, &[]);
        assert_eq!(mcts.tree_root().map(|r| r.visits), Some(300));
    }

    #[test]
    fn test_terminal_child_has_no_untried_moves() {
        let board = Board::from_sides([1, 0, 0, 0, 0, 4], 14, [1, 1, 1, 1, 10, 1], 14);
        let mut mcts = Mcts::with_seed(50, DEFAULT_EXPLORATION, 1);
        mcts.search(&board, Player::North, &[]);

        let root = mcts.tree_root().expect("tree kept after search");
        let winning = &root.children[root.child_index(0).expect("pit 0 expanded")];
        assert!(winning.untried.is_empty());
        assert!(winning.children.is_empty());
        assert_eq!(winning.wins, f64::from(winning.visits));
    }

    #[test]
    #[should_panic(expected = "exploration constant must be positive")]
    fn test_zero_exploration_rejected() {
        Mcts::with_seed(10, 0.0, 1);
    }
}
