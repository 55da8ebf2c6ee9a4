//! Hand-built game states for tests and benchmarks.

use std::sync::Arc;

use crate::game::{
    AiLevel, Controller, GameState, Player, PlayerId, RegionGraph, RegionId, Rules, Turn, Upgrade,
};

/// Builds a [`GameState`] piece by piece.
///
/// Starts with two AI players, every region neutral, no temples, no
/// soldiers and player 0 active on turn 1.
///
/// ```
/// use shrinewar::testing::StateBuilder;
///
/// let state = StateBuilder::line(3).owner(0, 0).soldiers(0, 2).build();
/// assert_eq!(state.soldier_count(0), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StateBuilder {
    state: GameState,
}

impl StateBuilder {
    /// Start from an arbitrary region graph.
    #[must_use]
    pub fn new(map: RegionGraph) -> Self {
        let players = (0..2).map(|id| Player::new(id, Controller::Ai)).collect();
        Self {
            state: GameState::new(players, map, Rules::default()),
        }
    }

    /// Start from `count` regions in a row, each bordering the next.
    #[must_use]
    pub fn line(count: usize) -> Self {
        Self::new(RegionGraph::line(count))
    }

    /// Replace the players with `count` AI players.
    #[must_use]
    pub fn players(mut self, count: usize) -> Self {
        let players: Vec<Player> = (0..count).map(|id| Player::new(id, Controller::Ai)).collect();
        self.state.players = players.into();
        self.state.cash = vec![0; count];
        self
    }

    /// Change who controls a player.
    #[must_use]
    pub fn controller(mut self, player: PlayerId, controller: Controller) -> Self {
        let mut players = self.state.players.to_vec();
        if let Some(p) = players.get_mut(player) {
            p.controller = controller;
        }
        self.state.players = Arc::from(players);
        self
    }

    /// Give a region to a player.
    #[must_use]
    pub fn owner(mut self, region: RegionId, player: PlayerId) -> Self {
        self.state.set_owner(region, Some(player));
        self
    }

    /// Station `count` fresh soldiers in a region.
    #[must_use]
    pub fn soldiers(mut self, region: RegionId, count: u32) -> Self {
        self.state.spawn_soldiers(region, count);
        self
    }

    /// Put a bare temple on a region.
    #[must_use]
    pub fn temple(mut self, region: RegionId) -> Self {
        self.state.place_temple(region);
        self
    }

    /// Set a temple's upgrade and level, placing the temple if needed.
    #[must_use]
    pub fn upgrade(mut self, region: RegionId, upgrade: Upgrade, level: u32) -> Self {
        self.state.place_temple(region);
        if let Some(temple) = self.state.temples.get_mut(&region) {
            temple.upgrade = Some(upgrade);
            temple.level = level;
        }
        self
    }

    /// Set a player's faith.
    #[must_use]
    pub fn cash(mut self, player: PlayerId, amount: u32) -> Self {
        if let Some(cash) = self.state.cash.get_mut(player) {
            *cash = amount;
        }
        self
    }

    /// Jump to a turn with the given active player and full moves.
    #[must_use]
    pub fn turn(mut self, turn_index: u32, player: PlayerId) -> Self {
        self.state.turn = Turn::new(turn_index, player, self.state.rules.moves_per_turn);
        self
    }

    /// Set the moves left to the active player.
    #[must_use]
    pub fn moves(mut self, moves_remaining: u32) -> Self {
        self.state.turn.moves_remaining = moves_remaining;
        self
    }

    /// Set the turn limit.
    #[must_use]
    pub fn turn_limit(mut self, limit: Option<u32>) -> Self {
        self.state.rules.turn_limit = limit;
        self
    }

    /// Set the AI difficulty tier.
    #[must_use]
    pub fn ai_level(mut self, level: AiLevel) -> Self {
        self.state.rules.ai_level = level;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> GameState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let state = StateBuilder::line(4)
            .players(3)
            .owner(0, 2)
            .soldiers(0, 3)
            .upgrade(1, Upgrade::Earth, 1)
            .cash(2, 40)
            .turn(5, 2)
            .moves(1)
            .build();

        assert_eq!(state.players().len(), 3);
        assert_eq!(state.owner(0), Some(2));
        assert_eq!(state.soldier_count(0), 3);
        assert_eq!(state.temple(1).map(|t| t.level), Some(1));
        assert_eq!(state.cash(2), 40);
        assert_eq!(state.turn().turn_index, 5);
        assert_eq!(state.active_player(), 2);
        assert_eq!(state.turn().moves_remaining, 1);
        assert!(state.map().are_neighbors(2, 3));
    }

    #[test]
    fn test_controller_override() {
        let state = StateBuilder::line(2).controller(0, Controller::Human).build();
        assert!(!state.players()[0].is_ai());
        assert!(state.players()[1].is_ai());
    }
}
