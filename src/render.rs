//! Plain text views of a game state.
//!
//! Used by the CLI and handy in test failure output. Nothing here feeds
//! back into the rules.

// format! with push_str reads better than write! for a handful of lines
#![allow(clippy::format_push_string)]

use crate::game::{GameState, PlayerId, RegionId};

/// Character for cells that belong to no region.
const EMPTY_CELL: char = ' ';

/// Character for neutral regions.
const NEUTRAL_CELL: char = '.';

/// Character for neutral regions with a temple.
const NEUTRAL_TEMPLE: char = '+';

/// Letter identifying a player on the map: the initial of its name.
///
/// Lowercase for ordinary regions, uppercase for temples.
#[must_use]
pub fn player_letter(state: &GameState, player: PlayerId) -> char {
    state
        .player(player)
        .and_then(|p| p.name.chars().next())
        .map_or('?', |c| c.to_ascii_lowercase())
}

fn region_char(state: &GameState, region: RegionId) -> char {
    let temple = state.temple(region).is_some();
    match state.owner(region) {
        Some(player) if temple => player_letter(state, player).to_ascii_uppercase(),
        Some(player) => player_letter(state, player),
        None if temple => NEUTRAL_TEMPLE,
        None => NEUTRAL_CELL,
    }
}

/// Draw the cell grid, one character per cell.
///
/// Returns `None` for maps built without a grid.
///
/// ```text
///  aaaA..
///  aaa...+
/// ```
#[must_use]
pub fn render_map(state: &GameState) -> Option<String> {
    let grid = state.map().grid()?;
    let mut output = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        let line: String = (0..grid.width())
            .map(|x| grid.get(x, y).map_or(EMPTY_CELL, |r| region_char(state, r)))
            .collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    Some(output)
}

/// Draw the cell grid with region ids modulo 36 instead of owners.
#[must_use]
pub fn render_region_ids(state: &GameState) -> Option<String> {
    let grid = state.map().grid()?;
    let mut output = String::new();
    for y in 0..grid.height() {
        let line: String = (0..grid.width())
            .map(|x| {
                grid.get(x, y).map_or(EMPTY_CELL, |r| {
                    #[allow(clippy::cast_possible_truncation)]
                    char::from_digit((r % 36) as u32, 36).unwrap_or('#')
                })
            })
            .collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    Some(output)
}

/// Summarize the state: turn, players and the regions with armies.
///
/// ```text
/// === TURN 3 / 12 === Amber to move, 2 moves left
///
/// Amber      regions  4  soldiers 11  temples 1  faith  14 (+16/turn)
/// Crimson    regions  2  soldiers  6  temples 1  faith   3 (+13/turn)
/// ```
#[must_use]
pub fn render_summary(state: &GameState) -> String {
    let mut output = String::new();
    let turn = state.turn();
    let limit = state
        .rules()
        .turn_limit
        .map_or_else(|| "-".to_string(), |l| l.to_string());

    output.push_str(&format!("=== TURN {} / {limit} ===", turn.turn_index));
    match state.end_result() {
        Some(result) => output.push_str(&format!(" game over: {result:?}\n\n")),
        None => {
            let name = state.player(turn.player).map_or("?", |p| p.name.as_str());
            output.push_str(&format!(
                " {name} to move, {} moves left\n\n",
                turn.moves_remaining
            ));
        }
    }

    for player in state.players() {
        let regions = state.region_count(player.id);
        if regions == 0 {
            output.push_str(&format!("{:<10} eliminated\n", player.name));
            continue;
        }
        output.push_str(&format!(
            "{:<10} regions {regions:>2}  soldiers {:>2}  temples {}  faith {:>3} (+{}/turn)\n",
            player.name,
            state.total_soldiers(player.id),
            state.temples_of(player.id).count(),
            state.cash(player.id),
            state.income(player.id),
        ));
    }

    output.push_str("\nArmies:\n");
    for region in state.map().regions() {
        let count = state.soldier_count(region.id);
        if count == 0 {
            continue;
        }
        let owner = state
            .owner(region.id)
            .and_then(|p| state.player(p))
            .map_or("neutral", |p| p.name.as_str());
        output.push_str(&format!("  region {:>2}: {count:>2} ({owner})", region.id));
        if let Some(temple) = state.temple(region.id) {
            match temple.upgrade {
                Some(upgrade) => output.push_str(&format!(" temple {upgrade} {}", temple.level + 1)),
                None => output.push_str(" temple"),
            }
        }
        output.push('\n');
    }

    output
}
