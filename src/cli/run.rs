//! Run command implementation.

use super::output::{JsonGameResult, format_text};
use super::{CliError, OutputFormat, resolve_seed};
use serde::Serialize;
use shrinewar::GameSetup;
use shrinewar::game::{Hint, Move, Transition};
use shrinewar::render::{render_map, render_summary};
use shrinewar::tournament::{Decider, RandomDecider, TournamentConfig, run_game_observed};

/// One line of `--trace` output.
#[derive(Serialize)]
struct TraceLine<'a> {
    #[serde(rename = "move")]
    mv: &'a Move,
    hints: &'a [Hint],
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the game fails to run.
pub(crate) fn execute(
    setup: &GameSetup,
    seed: Option<u64>,
    move_cap: u32,
    format: OutputFormat,
    trace: bool,
) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let config = TournamentConfig {
        games: 1,
        move_cap,
        base_seed: seed,
    };
    let mut deciders: Vec<Box<dyn Decider>> = (0..setup.enabled_players())
        .map(|_| Box::new(RandomDecider::default()) as Box<dyn Decider>)
        .collect();

    let mut trace_error = None;
    let mut observer = |mv: &Move, transition: &Transition| {
        if !trace || trace_error.is_some() {
            return;
        }
        match serde_json::to_string(&TraceLine {
            mv,
            hints: &transition.hints,
        }) {
            Ok(line) => println!("{line}"),
            Err(e) => trace_error = Some(e),
        }
    };
    let report = run_game_observed(setup, &mut deciders, &config, seed, &mut observer)?;
    if let Some(e) = trace_error {
        return Err(CliError::new(format!("JSON serialization failed: {e}")));
    }

    match format {
        OutputFormat::Text => {
            if let Some(map) = render_map(&report.final_state) {
                println!("{map}");
            }
            println!("{}", render_summary(&report.final_state));
            print!("{}", format_text(&report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::from_report(&report))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
