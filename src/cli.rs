//! CLI command implementations for Shrinewar.

pub(crate) mod apply;
pub(crate) mod map;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use shrinewar::GameSetup;
use shrinewar::error::{ConfigError, SetupError};
use shrinewar::tournament::TournamentError;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `tournament` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<TournamentError> for CliError {
    fn from(e: TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SetupError> for CliError {
    fn from(e: SetupError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

/// Build the game setup from a file or from `players` AI slots.
///
/// A `turns` of 0 means an endless game.
pub(crate) fn load_setup(
    path: Option<&Path>,
    players: usize,
    turns: Option<u32>,
) -> Result<GameSetup, CliError> {
    let mut setup = match path {
        Some(path) => GameSetup::load(path)?,
        None => GameSetup::all_ai(players),
    };
    if let Some(turns) = turns {
        setup.turn_limit = (turns > 0).then_some(turns);
    }
    setup.validate()?;
    Ok(setup)
}

/// The given seed, or one taken from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        #[allow(clippy::cast_possible_truncation)]
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
