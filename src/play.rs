//! Game drivers: a human against an engine, and engine against engine.
//!
//! Both drivers keep, for each engine, the list of moves played since that
//! engine last searched, so MCTS can carry its tree from turn to turn.
//!
//! ## Example
//!
//! ```
//! use kalah_rust::board::{new_board, Player};
//! use kalah_rust::engine::{EngineConfig, EngineKind};
//! use kalah_rust::play::Playoff;
//!
//! let config = EngineConfig { depth: 1, ..EngineConfig::default() };
//! let mut playoff = Playoff::new(
//!     config.build(EngineKind::AlphaBeta, 0),
//!     config.build(EngineKind::AlphaBeta, 1),
//! );
//! let record = playoff.run(new_board(3), &mut std::io::sink()).unwrap();
//! assert_eq!(record.board.total_stones(), 36);
//! ```

use std::fmt;
use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::board::{Board, GameResult, Player, apply_move, check_end};
use crate::constants::PITS;
use crate::engine::Engine;

/// Why a line of text is not a playable move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    /// Not an integer at all
    NotANumber(String),
    /// Integer outside 0..=5
    OutOfRange(i64),
    /// Pit holds no stones
    EmptyPit(usize),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoveError::NotANumber(text) => write!(f, "Failed to read a pit number from {text:?}"),
            ParseMoveError::OutOfRange(_) => {
                write!(f, "Choose a number between 0 and {}, try again", PITS - 1)
            }
            ParseMoveError::EmptyPit(pit) => write!(f, "Pit {pit} is empty, try again"),
        }
    }
}

impl std::error::Error for ParseMoveError {}

/// Parse a pit number typed by `player` and check it is a legal move.
pub fn parse_move(text: &str, board: &Board, player: Player) -> Result<usize, ParseMoveError> {
    let trimmed = text.trim();
    let n: i64 = trimmed
        .parse()
        .map_err(|_| ParseMoveError::NotANumber(trimmed.to_string()))?;
    let pit = usize::try_from(n)
        .ok()
        .filter(|&p| p < PITS)
        .ok_or(ParseMoveError::OutOfRange(n))?;
    if board.side(player)[pit] == 0 {
        return Err(ParseMoveError::EmptyPit(pit));
    }
    Ok(pit)
}

/// Moves made on the real board, and where each engine last searched.
#[derive(Default)]
struct History {
    moves: Vec<usize>,
    last_search: [Option<usize>; 2],
}

impl History {
    /// Moves since `player`'s previous search, starting with the move it chose.
    fn since_search(&self, player: Player) -> &[usize] {
        match self.last_search[player.index()] {
            Some(start) => &self.moves[start..],
            None => &[],
        }
    }

    fn record(&mut self, pit: usize, searched_by: Option<Player>) {
        if let Some(player) = searched_by {
            self.last_search[player.index()] = Some(self.moves.len());
        }
        self.moves.push(pit);
    }
}

/// An interactive game: a human plays South against an engine playing North.
pub struct Game<R, W> {
    board: Board,
    engine: Box<dyn Engine>,
    input: R,
    output: W,
    computer_first: bool,
    reverse: bool,
}

impl<R: BufRead, W: Write> Game<R, W> {
    pub fn new(board: Board, engine: Box<dyn Engine>, input: R, output: W) -> Self {
        Self {
            board,
            engine,
            input,
            output,
            computer_first: false,
            reverse: false,
        }
    }

    /// Let the engine make the first move.
    pub fn computer_first(mut self, yes: bool) -> Self {
        self.computer_first = yes;
        self
    }

    /// Draw the board with the human's row on top.
    pub fn reverse(mut self, yes: bool) -> Self {
        self.reverse = yes;
        self
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play until the game ends or input runs out.
    ///
    /// Returns `None` if the human's input ended before the game did.
    pub fn run(&mut self) -> Result<Option<GameResult>> {
        let mut to_move = if self.computer_first {
            Player::North
        } else {
            Player::South
        };
        let mut history = History::default();

        loop {
            self.show_board()?;

            let pit = match to_move {
                Player::South => match self.read_move()? {
                    Some(pit) => pit,
                    None => return Ok(None),
                },
                Player::North => {
                    let start = Instant::now();
                    let played = history.since_search(Player::North);
                    let result = self.engine.choose_move(&self.board, Player::North, played);
                    writeln!(
                        self.output,
                        "Computer chooses {} ({}) [{:?}]\n---",
                        result.pit,
                        result.value,
                        start.elapsed()
                    )?;
                    result.pit
                }
            };

            let searched_by = (to_move == Player::North).then_some(Player::North);
            history.record(pit, searched_by);
            to_move = apply_move(&mut self.board, pit, to_move).next;

            if let Some(result) = check_end(&mut self.board) {
                let text = match result {
                    GameResult::Win(Player::North) => "Game over, computer won",
                    GameResult::Win(Player::South) => "Game over, human won",
                    GameResult::Tie => "Game over, tie",
                };
                writeln!(self.output, "{text}")?;
                writeln!(self.output, "Final:")?;
                self.show_board()?;
                return Ok(Some(result));
            }
        }
    }

    fn show_board(&mut self) -> Result<()> {
        if self.reverse {
            writeln!(self.output, "{}", self.board.reversed())?;
        } else {
            writeln!(self.output, "{}", self.board)?;
        }
        Ok(())
    }

    /// Prompt until a legal move is typed. `None` on end of input.
    fn read_move(&mut self) -> Result<Option<usize>> {
        loop {
            write!(self.output, "Your move: ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read move")?;
            if read == 0 {
                return Ok(None);
            }

            match parse_move(&line, &self.board, Player::South) {
                Ok(pit) => return Ok(Some(pit)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }
}

/// Outcome of a finished engine-vs-engine game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Every move in order, with the player who made it.
    pub moves: Vec<(Player, usize)>,
    pub result: GameResult,
    /// Final, swept board.
    pub board: Board,
}

/// Referee for a game between two engines. North moves first.
pub struct Playoff {
    engines: [Box<dyn Engine>; 2],
}

impl Playoff {
    pub fn new(north: Box<dyn Engine>, south: Box<dyn Engine>) -> Self {
        Self {
            engines: [north, south],
        }
    }

    /// Play a full game from `board`, reporting each move to `out`.
    pub fn run(&mut self, mut board: Board, out: &mut impl Write) -> Result<GameRecord> {
        let mut to_move = Player::North;
        let mut history = History::default();
        let mut moves = Vec::new();

        loop {
            writeln!(out, "{board}")?;

            let engine = &mut self.engines[to_move.index()];
            let played = history.since_search(to_move);
            let result = engine.choose_move(&board, to_move, played);
            writeln!(
                out,
                "{} ({to_move}) chooses {} ({})",
                engine.name(),
                result.pit,
                result.value
            )?;

            history.record(result.pit, Some(to_move));
            moves.push((to_move, result.pit));
            to_move = apply_move(&mut board, result.pit, to_move).next;

            if let Some(result) = check_end(&mut board) {
                let text = match result.winner() {
                    Some(Player::North) => format!("Game over, {} (north) won", self.engines[0].name()),
                    Some(Player::South) => format!("Game over, {} (south) won", self.engines[1].name()),
                    None => "Game over, tie".to_string(),
                };
                info!("{text} after {} moves", moves.len());
                writeln!(out, "{text}\nFinal:\n{board}")?;
                return Ok(GameRecord {
                    moves,
                    result,
                    board,
                });
            }
        }
    }
}
