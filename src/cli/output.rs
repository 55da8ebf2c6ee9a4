//! Output formatting utilities for CLI.

#![allow(clippy::format_push_string, clippy::cast_precision_loss)]

use serde::Serialize;
use shrinewar::EndResult;
use shrinewar::tournament::{GameReport, TournamentStats};

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Random seed used.
    seed: u64,
    /// Winner player id (null if draw or unfinished).
    winner: Option<usize>,
    /// Whether the game ended before the move cap.
    finished: bool,
    /// Turn the game stopped on.
    turns: u32,
    /// Moves applied.
    moves: u32,
    /// Per-player results.
    players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
struct JsonPlayerResult {
    /// Player id.
    id: usize,
    /// Display name.
    name: String,
    /// Regions owned at the end.
    regions: u32,
    /// Whether the player was eliminated.
    eliminated: bool,
}

impl JsonGameResult {
    /// Create from a game report.
    pub(super) fn from_report(report: &GameReport) -> Self {
        let players = report
            .final_state
            .players()
            .iter()
            .map(|p| JsonPlayerResult {
                id: p.id,
                name: p.name.clone(),
                regions: report.standings.get(p.id).copied().unwrap_or(0),
                eliminated: report.eliminated.contains(&p.id),
            })
            .collect();
        Self {
            seed: report.seed,
            winner: report.winner(),
            finished: report.result.is_some(),
            turns: report.turns,
            moves: report.moves,
            players,
        }
    }
}

/// Format a game report as human-readable text.
pub(super) fn format_text(report: &GameReport) -> String {
    let mut output = String::new();
    let names: Vec<&str> = report
        .final_state
        .players()
        .iter()
        .map(|p| p.name.as_str())
        .collect();

    output.push_str(&format!("Game Result (seed: {})\n", report.seed));
    match report.result {
        Some(EndResult::Winner(winner)) => {
            let name = names.get(winner).copied().unwrap_or("Unknown");
            output.push_str(&format!("  Winner: Player {winner} ({name})\n"));
        }
        Some(EndResult::Draw) => output.push_str("  Winner: Draw\n"),
        None => output.push_str("  Unfinished: move cap reached\n"),
    }
    output.push_str(&format!(
        "  Turns: {}  Moves: {}\n\n",
        report.turns, report.moves
    ));

    for (id, name) in names.iter().enumerate() {
        let regions = report.standings.get(id).copied().unwrap_or(0);
        output.push_str(&format!("  Player {id}: {regions} regions ({name})"));
        if let Some(place) = report.eliminated.iter().position(|&p| p == id) {
            output.push_str(&format!(" [eliminated #{}]", place + 1));
        }
        output.push('\n');
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Games stopped by the move cap.
    unfinished: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
struct JsonTournamentPlayer {
    /// Player id.
    player: usize,
    /// Display name.
    name: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
}

impl JsonTournamentResult {
    /// Create from stats and player names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                player: i,
                name: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            unfinished: stats.unfinished,
            avg_turns: stats.average_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();
    let share = |count: u64| {
        if stats.games_played == 0 {
            0.0
        } else {
            count as f64 / stats.games_played as f64 * 100.0
        }
    };

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        output.push_str(&format!(
            "  Player {i} ({name}): {:.1}% ({wins} wins)\n",
            stats.win_rate(i) * 100.0
        ));
    }
    output.push_str(&format!("  Draws: {} ({:.1}%)\n", stats.draws, share(stats.draws)));
    if stats.unfinished > 0 {
        output.push_str(&format!(
            "  Unfinished: {} ({:.1}%)\n",
            stats.unfinished,
            share(stats.unfinished)
        ));
    }

    output.push_str(&format!(
        "\nAverage Game Length: {:.1} turns\n",
        stats.average_turns()
    ));

    output
}
