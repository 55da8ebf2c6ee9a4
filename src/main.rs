//! Shrinewar CLI - Command-line interface for generating maps and running games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Shrinewar - A deterministic territory strategy engine
#[derive(Parser, Debug)]
#[command(name = "shrinewar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the game setup comes from.
#[derive(clap::Args, Debug, Clone)]
struct SetupArgs {
    /// JSON game setup file (overrides --players)
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Number of AI players (2-4)
    #[arg(short = 'n', long, default_value = "3")]
    players: usize,

    /// Turn limit, 0 for endless games
    #[arg(short, long)]
    turns: Option<u32>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single game between random deciders
    Run {
        #[command(flatten)]
        setup: SetupArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Moves applied before the game is abandoned
        #[arg(long, default_value = "5000")]
        move_cap: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print every move and its hints as JSON lines
        #[arg(long)]
        trace: bool,
    },

    /// Run many games in parallel and aggregate statistics
    Tournament {
        #[command(flatten)]
        setup: SetupArgs,

        /// Number of games to run
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Moves applied before a game is abandoned
        #[arg(long, default_value = "5000")]
        move_cap: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate a map and print it
    Map {
        /// Number of players the map is made for (2-4)
        #[arg(short = 'n', long, default_value = "3")]
        players: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print region ids instead of owners
        #[arg(long)]
        ids: bool,
    },

    /// Apply a file of JSON moves, one per line, to a seeded game
    Apply {
        #[command(flatten)]
        setup: SetupArgs,

        /// Seed the game was started with
        #[arg(short, long)]
        seed: u64,

        /// File with one JSON move per line
        #[arg(required = true)]
        moves: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            setup,
            seed,
            move_cap,
            format,
            trace,
        } => cli::load_setup(setup.setup.as_deref(), setup.players, setup.turns)
            .and_then(|game_setup| cli::run::execute(&game_setup, seed, move_cap, format, trace)),

        Commands::Tournament {
            setup,
            games,
            seed,
            threads,
            move_cap,
            format,
            progress,
        } => cli::load_setup(setup.setup.as_deref(), setup.players, setup.turns).and_then(
            |game_setup| {
                cli::tournament::execute(
                    &game_setup,
                    games,
                    seed,
                    threads,
                    move_cap,
                    format,
                    progress,
                )
            },
        ),

        Commands::Map { players, seed, ids } => cli::map::execute(players, seed, ids),

        Commands::Apply { setup, seed, moves } => {
            cli::load_setup(setup.setup.as_deref(), setup.players, setup.turns)
                .and_then(|game_setup| cli::apply::execute(&game_setup, seed, &moves))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
