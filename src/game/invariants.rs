//! Game invariants - sanity checks that detect engine bugs.
//!
//! These should never trigger for a state produced by the engine from a
//! valid initial state. They are bug detectors, not rules; rule violations
//! are rejected up front as [`crate::error::IllegalMove`].

use std::collections::BTreeSet;
use std::fmt;

use crate::game::GameState;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let region_count = state.map.len();
    let player_count = state.players.len();

    if state.owners.len() != region_count {
        violations.push(violation(format!(
            "Ownership table has {} entries for {} regions",
            state.owners.len(),
            region_count
        )));
    }
    for (region, owner) in state.owners.iter().enumerate() {
        if let Some(owner) = owner.filter(|&o| o >= player_count) {
            violations.push(violation(format!(
                "Region {region} owned by unknown player {owner}"
            )));
        }
    }

    if state.cash.len() != player_count {
        violations.push(violation(format!(
            "Cash table has {} entries for {} players",
            state.cash.len(),
            player_count
        )));
    }

    // Soldier queues: sparse, in range, unique identities below the counter
    let mut seen = BTreeSet::new();
    for (&region, queue) in &state.soldiers {
        if region >= region_count {
            violations.push(violation(format!(
                "Soldier queue on unknown region {region}"
            )));
        }
        if queue.is_empty() {
            violations.push(violation(format!(
                "Empty soldier queue kept for region {region}"
            )));
        }
        for soldier in queue.iter() {
            if !seen.insert(soldier.id) {
                violations.push(violation(format!(
                    "Soldier {} appears more than once",
                    soldier.id
                )));
            }
            if soldier.id >= state.soldier_ids.peek() {
                violations.push(violation(format!(
                    "Soldier {} not issued by the id counter (next {})",
                    soldier.id,
                    state.soldier_ids.peek()
                )));
            }
        }
    }

    // Temples: keyed by their own region, levels within the schedule
    for (&region, temple) in &state.temples {
        if temple.region != region || region >= region_count {
            violations.push(violation(format!(
                "Temple keyed at {region} claims region {}",
                temple.region
            )));
        }
        match temple.upgrade {
            Some(upgrade) if temple.level >= upgrade.max_levels() => {
                violations.push(violation(format!(
                    "Temple at {region} has {upgrade} level {} of {}",
                    temple.level,
                    upgrade.max_levels()
                )));
            }
            None if temple.level != 0 => {
                violations.push(violation(format!(
                    "Temple at {region} has level {} without an upgrade",
                    temple.level
                )));
            }
            _ => {}
        }
    }

    if state.turn.player >= player_count {
        violations.push(violation(format!(
            "Active player {} out of range",
            state.turn.player
        )));
    }
    for &region in &state.turn.conquered {
        if state.owner(region) != Some(state.turn.player) {
            violations.push(violation(format!(
                "Conquered region {region} not owned by active player {}",
                state.turn.player
            )));
        }
    }

    // Nobody may hold regions without soldiers after the post-move check
    for player in 0..player_count {
        if state.region_count(player) > 0 && state.total_soldiers(player) == 0 {
            violations.push(violation(format!(
                "Player {player} owns regions but has no soldiers"
            )));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Soldier, Upgrade};
    use crate::testing::StateBuilder;
    use std::collections::VecDeque;
    use std::sync::Arc;

    fn create_valid_game() -> GameState {
        StateBuilder::line(3)
            .owner(0, 0)
            .temple(0)
            .soldiers(0, 2)
            .owner(2, 1)
            .soldiers(2, 1)
            .build()
    }

    #[test]
    fn test_valid_game_passes() {
        let game = create_valid_game();
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_empty_queue_detected() {
        let mut game = create_valid_game();
        game.soldiers.insert(1, Arc::new(VecDeque::new()));
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Empty soldier queue"));
    }

    #[test]
    fn test_duplicate_soldier_detected() {
        let mut game = create_valid_game();
        let front = game.soldiers(0).next().copied().unwrap();
        game.push_back(2, [Soldier { id: front.id }]);
        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("more than once")));
    }

    #[test]
    fn test_level_beyond_schedule_detected() {
        let mut game = create_valid_game();
        if let Some(temple) = game.temples.get_mut(&0) {
            temple.upgrade = Some(Upgrade::Fire);
            temple.level = 2;
        }
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("level 2 of 2"));
    }

    #[test]
    fn test_level_at_last_index_passes() {
        let mut game = create_valid_game();
        if let Some(temple) = game.temples.get_mut(&0) {
            temple.upgrade = Some(Upgrade::Fire);
            temple.level = 1;
        }
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_foreign_conquered_region_detected() {
        let mut game = create_valid_game();
        game.turn.conquered.insert(2);
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Conquered region 2"));
    }

    #[test]
    fn test_soldierless_owner_detected() {
        let mut game = create_valid_game();
        game.pop_front(2, 1);
        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Player 1"));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut game = create_valid_game();
        game.turn.conquered.insert(2);
        game.pop_front(2, 1);
        assert_eq!(check_invariants(&game).len(), 2);
    }
}
