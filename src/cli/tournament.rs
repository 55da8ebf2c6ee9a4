//! Tournament command implementation.

use super::output::{JsonTournamentResult, format_tournament_text};
use super::{CliError, OutputFormat, resolve_seed};
use indicatif::{ProgressBar, ProgressStyle};
use shrinewar::GameSetup;
use shrinewar::tournament::{RandomDecider, TournamentConfig, run_tournament};
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if any game fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    setup: &GameSetup,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    move_cap: u32,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let config = TournamentConfig {
        games,
        move_cap,
        base_seed: resolve_seed(seed),
    };
    let names: Vec<String> = setup.players().into_iter().map(|p| p.name).collect();

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_tournament(
        setup,
        &config,
        |_, _| Box::new(RandomDecider::default()),
        &|_| {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        },
    )?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec), base seed {}",
                duration.as_secs_f64(),
                config.base_seed
            );
        }
        OutputFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
