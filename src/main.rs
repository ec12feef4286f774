//! Kalah-Rust: play Kalah against an alpha-beta or MCTS engine.
//!
//! ## Usage
//!
//! - `kalah-rust` - Play against alpha-beta (you move first)
//! - `kalah-rust -M -C` - Play against MCTS, computer moves first
//! - `kalah-rust playoff -1 mcts -2 alpha-beta` - Engine vs engine

use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use kalah_rust::board::{Board, new_board};
use kalah_rust::constants::{DEFAULT_DEPTH, DEFAULT_EXPLORATION, DEFAULT_ITERATIONS, DEFAULT_STONES};
use kalah_rust::engine::{EngineConfig, EngineKind};
use kalah_rust::eval::EvaluatorKind;
use kalah_rust::play::{Game, Playoff};

/// Kalah-Rust: a Kalah engine with alpha-beta and MCTS players
#[derive(Parser)]
#[command(name = "kalah-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,

    #[command(flatten)]
    play: PlayArgs,
}

/// Settings shared by every subcommand.
#[derive(Args)]
struct Options {
    /// Number of stones per pit
    #[arg(short = 'n', long, default_value_t = DEFAULT_STONES,
          value_parser = clap::value_parser!(u32).range(1..), global = true)]
    stones: u32,

    /// Maximum lookahead depth, moves for each side
    #[arg(short, long, default_value_t = DEFAULT_DEPTH, global = true)]
    depth: usize,

    /// Number of iterations for MCTS
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS, global = true)]
    iterations: usize,

    /// UCB1 exploration constant, MCTS only
    #[arg(short = 'U', long, default_value_t = DEFAULT_EXPLORATION,
          value_parser = positive_f64, global = true)]
    exploration: f64,

    /// Static evaluator used at the alpha-beta horizon
    #[arg(long, value_enum, default_value_t = EvaluatorKind::StoreDifference, global = true)]
    evaluator: EvaluatorKind,

    /// Seed MCTS for a reproducible game
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer from the terminal (default)
    Play,
    /// Let two engines play each other
    Playoff(PlayoffArgs),
}

/// Interactive game settings, accepted with or without the `play` subcommand.
#[derive(Args)]
struct PlayArgs {
    /// Computer takes the first move
    #[arg(short = 'C', long, global = true)]
    computer_first: bool,

    /// Use MCTS instead of alpha-beta minimax
    #[arg(short = 'M', long, global = true)]
    mcts: bool,

    /// Reverse the printed board, top to bottom
    #[arg(short = 'R', long, global = true)]
    reverse: bool,
}

#[derive(Args)]
struct PlayoffArgs {
    /// Engine playing north, which moves first
    #[arg(short = '1', long, visible_alias = "north", value_enum,
          default_value_t = EngineKind::Mcts)]
    first: EngineKind,

    /// Engine playing south
    #[arg(short = '2', long, visible_alias = "south", value_enum,
          default_value_t = EngineKind::AlphaBeta)]
    second: EngineKind,
}

fn positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("must be greater than zero, got {value}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.options;

    let level = match options.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = EngineConfig {
        depth: options.depth,
        iterations: options.iterations,
        exploration: options.exploration,
        evaluator: options.evaluator,
        seed: options.seed,
    };
    let board = new_board(options.stones);

    match cli.command {
        Some(Commands::Playoff(args)) => {
            let mut playoff = Playoff::new(config.build(args.first, 0), config.build(args.second, 1));
            playoff.run(board, &mut io::stdout().lock())?;
        }
        Some(Commands::Play) | None => play(&config, board, &cli.play)?,
    }

    Ok(())
}

fn play(config: &EngineConfig, board: Board, args: &PlayArgs) -> Result<()> {
    let kind = if args.mcts {
        EngineKind::Mcts
    } else {
        EngineKind::AlphaBeta
    };
    let mut game = Game::new(board, config.build(kind, 0), io::stdin().lock(), io::stdout())
        .computer_first(args.computer_first)
        .reverse(args.reverse);
    game.run()?;
    Ok(())
}
