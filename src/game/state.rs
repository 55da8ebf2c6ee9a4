//! Game state management.
//!
//! A [`GameState`] is one snapshot of a game. States are never mutated
//! after they are handed out: [`crate::game::apply`] clones the mutable
//! parts (ownership, temples, cash, turn) and shares the rest through
//! `Arc`. Soldier queues are shared per region and copied only when a move
//! touches them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use serde::Serialize;

use crate::game::{
    AiLevel, Player, PlayerId, RegionGraph, RegionId, Soldier, SoldierIds, Temple, Upgrade,
};

/// Moves every player gets per turn before upgrades.
pub const MOVES_PER_TURN: u32 = 3;

/// Faith paid to a defending owner for each attacker it kills.
pub const MARTYR_BONUS: u32 = 4;

/// Income multiplier bonus for AI players at the [`AiLevel::Evil`] tier.
const EVIL_INCOME_BONUS: f64 = 0.4;

/// Rule parameters fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rules {
    /// Base moves per turn.
    pub moves_per_turn: u32,
    /// Faith per defender kill.
    pub martyr_bonus: u32,
    /// Last turn played; `None` plays until one player is left.
    pub turn_limit: Option<u32>,
    /// Difficulty tier of AI players.
    pub ai_level: AiLevel,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            moves_per_turn: MOVES_PER_TURN,
            martyr_bonus: MARTYR_BONUS,
            turn_limit: Some(12),
            ai_level: AiLevel::Nice,
        }
    }
}

/// The move in progress: whose turn it is and what they have left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// Turn number, starting at 1.
    pub turn_index: u32,
    /// Active player.
    pub player: PlayerId,
    /// Army moves left this turn.
    pub moves_remaining: u32,
    /// Regions captured this turn; they cannot be move sources until next turn.
    pub conquered: BTreeSet<RegionId>,
    /// Soldiers bought by the active player this turn.
    pub soldiers_bought: u32,
}

impl Turn {
    /// Fresh turn for a player.
    #[must_use]
    pub fn new(turn_index: u32, player: PlayerId, moves_remaining: u32) -> Self {
        Self {
            turn_index,
            player,
            moves_remaining,
            conquered: BTreeSet::new(),
            soldiers_bought: 0,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndResult {
    /// One player holds the most regions.
    Winner(PlayerId),
    /// The top two players hold the same number of regions.
    Draw,
}

impl EndResult {
    /// The winning player, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            EndResult::Winner(player) => Some(player),
            EndResult::Draw => None,
        }
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub(crate) players: Arc<[Player]>,
    pub(crate) map: Arc<RegionGraph>,
    pub(crate) rules: Rules,
    pub(crate) owners: Vec<Option<PlayerId>>,
    pub(crate) temples: BTreeMap<RegionId, Temple>,
    pub(crate) soldiers: BTreeMap<RegionId, Arc<VecDeque<Soldier>>>,
    pub(crate) cash: Vec<u32>,
    pub(crate) turn: Turn,
    pub(crate) end_result: Option<EndResult>,
    pub(crate) simulation: bool,
    pub(crate) soldier_ids: SoldierIds,
}

impl GameState {
    /// Create a state with every region neutral and empty.
    ///
    /// The first player is active on turn 1.
    #[must_use]
    pub fn new(players: Vec<Player>, map: RegionGraph, rules: Rules) -> Self {
        let region_count = map.len();
        let player_count = players.len();
        Self {
            players: players.into(),
            map: Arc::new(map),
            rules,
            owners: vec![None; region_count],
            temples: BTreeMap::new(),
            soldiers: BTreeMap::new(),
            cash: vec![0; player_count],
            turn: Turn::new(1, 0, rules.moves_per_turn),
            end_result: None,
            simulation: false,
            soldier_ids: SoldierIds::new(),
        }
    }

    /// A copy of this state flagged for lookahead.
    ///
    /// Applying moves to it resolves fights with the deterministic formula
    /// and produces no presentation hints.
    #[must_use]
    pub fn for_simulation(&self) -> Self {
        let mut copy = self.clone();
        copy.simulation = true;
        copy
    }

    /// All players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// The region graph.
    #[must_use]
    pub fn map(&self) -> &RegionGraph {
        &self.map
    }

    /// Rule parameters.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The move in progress.
    #[must_use]
    pub const fn turn(&self) -> &Turn {
        &self.turn
    }

    /// The active player.
    #[must_use]
    pub const fn active_player(&self) -> PlayerId {
        self.turn.player
    }

    /// Result of the game, once it is over.
    #[must_use]
    pub const fn end_result(&self) -> Option<EndResult> {
        self.end_result
    }

    /// Whether the game has a result.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.end_result.is_some()
    }

    /// Whether this state belongs to a lookahead branch.
    #[must_use]
    pub const fn is_simulation(&self) -> bool {
        self.simulation
    }

    /// Identity the next spawned soldier will receive.
    #[must_use]
    pub const fn next_soldier_id(&self) -> u64 {
        self.soldier_ids.peek()
    }

    /// Owner of a region, `None` for neutral.
    #[must_use]
    pub fn owner(&self, region: RegionId) -> Option<PlayerId> {
        self.owners.get(region).copied().flatten()
    }

    /// Soldiers stationed in a region, oldest first.
    pub fn soldiers(&self, region: RegionId) -> impl Iterator<Item = &Soldier> {
        self.soldiers.get(&region).into_iter().flat_map(|q| q.iter())
    }

    /// Number of soldiers stationed in a region.
    #[must_use]
    pub fn soldier_count(&self, region: RegionId) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let count = self.soldiers.get(&region).map_or(0, |q| q.len() as u32);
        count
    }

    /// Temple on a region, if any.
    #[must_use]
    pub fn temple(&self, region: RegionId) -> Option<&Temple> {
        self.temples.get(&region)
    }

    /// All temples, by region.
    pub fn temples(&self) -> impl Iterator<Item = &Temple> {
        self.temples.values()
    }

    /// Temples owned by a player.
    pub fn temples_of(&self, player: PlayerId) -> impl Iterator<Item = &Temple> {
        self.temples
            .values()
            .filter(move |t| self.owner(t.region) == Some(player))
    }

    /// Faith held by a player.
    #[must_use]
    pub fn cash(&self, player: PlayerId) -> u32 {
        self.cash.get(player).copied().unwrap_or(0)
    }

    /// Number of regions a player owns.
    #[must_use]
    pub fn region_count(&self, player: PlayerId) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let count = self.owners.iter().filter(|o| **o == Some(player)).count() as u32;
        count
    }

    /// Soldiers across every region a player owns.
    #[must_use]
    pub fn total_soldiers(&self, player: PlayerId) -> u32 {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner == Some(player))
            .map(|(region, _)| self.soldier_count(region))
            .sum()
    }

    /// Soldiers across the whole map, neutral included.
    #[must_use]
    pub fn soldiers_on_map(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let total = self.soldiers.values().map(|q| q.len()).sum::<usize>() as u32;
        total
    }

    /// Effect magnitude of `kind` for a player: the best among its temples.
    ///
    /// Neutral forces always have level 0.
    #[must_use]
    pub fn upgrade_level(&self, player: Option<PlayerId>, kind: Upgrade) -> u32 {
        let Some(player) = player else {
            return 0;
        };
        self.temples_of(player)
            .map(|t| t.effect(kind))
            .max()
            .unwrap_or(0)
    }

    /// Level of `kind` counted from 1, the best among a player's temples.
    #[must_use]
    pub fn raw_upgrade_level(&self, player: Option<PlayerId>, kind: Upgrade) -> u32 {
        let Some(player) = player else {
            return 0;
        };
        self.temples_of(player)
            .map(|t| t.raw_level(kind))
            .max()
            .unwrap_or(0)
    }

    /// Faith a player earns at the end of its turn.
    ///
    /// One per region plus one per soldier standing at one of its temples,
    /// scaled by the water upgrade. Players without temples earn nothing.
    #[must_use]
    pub fn income(&self, player: PlayerId) -> u32 {
        let temple_soldiers: u32 = self
            .temples_of(player)
            .map(|t| self.soldier_count(t.region))
            .sum();
        if self.temples_of(player).next().is_none() {
            return 0;
        }
        let base = self.region_count(player) + temple_soldiers;

        let mut multiplier = 1.0 + 0.01 * f64::from(self.upgrade_level(Some(player), Upgrade::Water));
        if self.rules.ai_level == AiLevel::Evil && self.player(player).is_some_and(Player::is_ai) {
            multiplier += EVIL_INCOME_BONUS;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let income = (multiplier * f64::from(base)).ceil() as u32;
        income
    }

    /// Price of the next soldier for the active player this turn.
    #[must_use]
    pub const fn soldier_cost(&self) -> u32 {
        Upgrade::soldier_cost(self.turn.soldiers_bought)
    }

    /// Whether a player can still launch an army move from a region this turn.
    #[must_use]
    pub fn region_has_active_army(&self, player: PlayerId, region: RegionId) -> bool {
        self.turn.player == player
            && self.turn.moves_remaining > 0
            && self.owner(region) == Some(player)
            && self.soldier_count(region) > 0
            && !self.turn.conquered.contains(&region)
    }

    /// Regions owned by each player, indexed by player id.
    #[must_use]
    pub fn standings(&self) -> Vec<u32> {
        let mut counts = vec![0; self.players.len()];
        for owner in self.owners.iter().flatten() {
            if let Some(count) = counts.get_mut(*owner) {
                *count += 1;
            }
        }
        counts
    }

    /// Players that still own at least one region.
    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(|p| self.region_count(p.id) > 0)
    }

    /// Decide the winner from the current standings.
    ///
    /// The player with the most regions wins; a tie at the top is a draw.
    #[must_use]
    pub fn determine_result(&self) -> EndResult {
        let standings = self.standings();
        let mut ranked: Vec<(PlayerId, u32)> = standings.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        match ranked.as_slice() {
            [(winner, _)] => EndResult::Winner(*winner),
            [(first, top), (_, second), ..] if top > second => EndResult::Winner(*first),
            _ => EndResult::Draw,
        }
    }

    pub(crate) fn spawn_soldiers(&mut self, region: RegionId, count: u32) {
        if count == 0 {
            return;
        }
        let queue = Arc::make_mut(self.soldiers.entry(region).or_default());
        for _ in 0..count {
            queue.push_back(self.soldier_ids.spawn());
        }
    }

    pub(crate) fn set_owner(&mut self, region: RegionId, owner: Option<PlayerId>) {
        if let Some(slot) = self.owners.get_mut(region) {
            *slot = owner;
        }
    }

    pub(crate) fn place_temple(&mut self, region: RegionId) {
        if region < self.map.len() {
            self.temples.entry(region).or_insert_with(|| Temple::new(region));
        }
    }

    /// Remove `count` soldiers from the front of a region's queue.
    pub(crate) fn pop_front(&mut self, region: RegionId, count: u32) -> Vec<Soldier> {
        let Some(queue) = self.soldiers.get_mut(&region) else {
            return Vec::new();
        };
        let queue = Arc::make_mut(queue);
        let take = (count as usize).min(queue.len());
        let taken: Vec<Soldier> = queue.drain(..take).collect();
        if queue.is_empty() {
            self.soldiers.remove(&region);
        }
        taken
    }

    /// Append soldiers to the back of a region's queue.
    pub(crate) fn push_back(&mut self, region: RegionId, soldiers: impl IntoIterator<Item = Soldier>) {
        let mut incoming = soldiers.into_iter().peekable();
        if incoming.peek().is_some() {
            Arc::make_mut(self.soldiers.entry(region).or_default()).extend(incoming);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Controller;

    fn create_test_game() -> GameState {
        let map = RegionGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        let players = vec![Player::new(0, Controller::Human), Player::new(1, Controller::Ai)];
        let mut game = GameState::new(players, map, Rules::default());

        game.set_owner(0, Some(0));
        game.set_owner(1, Some(0));
        game.set_owner(2, Some(0));
        game.place_temple(0);
        game.spawn_soldiers(0, 2);
        game.spawn_soldiers(1, 1);

        game.set_owner(4, Some(1));
        game.place_temple(4);
        game.spawn_soldiers(4, 3);
        game
    }

    #[test]
    fn test_game_state_creation() {
        let game = create_test_game();
        assert_eq!(game.turn().turn_index, 1);
        assert_eq!(game.active_player(), 0);
        assert_eq!(game.turn().moves_remaining, MOVES_PER_TURN);
        assert!(!game.is_over());
        assert!(!game.is_simulation());
    }

    #[test]
    fn test_income_formula() {
        // 3 regions + 2 soldiers at the temple, no water upgrade
        let game = create_test_game();
        assert_eq!(game.income(0), 5);
    }

    #[test]
    fn test_income_requires_temple() {
        let mut game = create_test_game();
        game.temples.remove(&0);
        assert_eq!(game.income(0), 0);
    }

    #[test]
    fn test_income_with_water() {
        let mut game = create_test_game();
        if let Some(temple) = game.temples.get_mut(&0) {
            temple.upgrade = Some(Upgrade::Water);
            temple.level = 0;
        }
        // ceil(1.2 * 5) = 6
        assert_eq!(game.income(0), 6);
    }

    #[test]
    fn test_evil_ai_income_bonus() {
        let mut game = create_test_game();
        game.rules.ai_level = AiLevel::Evil;
        // player 1: 1 region + 3 temple soldiers = 4, ceil(1.4 * 4) = 6
        assert_eq!(game.income(1), 6);
        // human player is unaffected
        assert_eq!(game.income(0), 5);
    }

    #[test]
    fn test_upgrade_level_neutral_is_zero() {
        let mut game = create_test_game();
        game.place_temple(3);
        if let Some(temple) = game.temples.get_mut(&3) {
            temple.upgrade = Some(Upgrade::Earth);
        }
        assert_eq!(game.upgrade_level(None, Upgrade::Earth), 0);
        assert_eq!(game.upgrade_level(game.owner(3), Upgrade::Earth), 0);

        game.set_owner(3, Some(1));
        assert_eq!(game.upgrade_level(Some(1), Upgrade::Earth), 1);
        assert_eq!(game.raw_upgrade_level(Some(1), Upgrade::Earth), 1);
    }

    #[test]
    fn test_soldier_queue_order() {
        let mut game = create_test_game();
        let ids: Vec<_> = game.soldiers(4).map(|s| s.id).collect();
        let taken = game.pop_front(4, 2);
        assert_eq!(taken.iter().map(|s| s.id).collect::<Vec<_>>(), ids[..2]);
        assert_eq!(game.soldier_count(4), 1);

        game.pop_front(4, 5);
        assert_eq!(game.soldier_count(4), 0);
        assert!(!game.soldiers.contains_key(&4));
    }

    #[test]
    fn test_totals_and_standings() {
        let game = create_test_game();
        assert_eq!(game.total_soldiers(0), 3);
        assert_eq!(game.total_soldiers(1), 3);
        assert_eq!(game.soldiers_on_map(), 6);
        assert_eq!(game.standings(), vec![3, 1]);
        assert_eq!(game.living_players().count(), 2);
    }

    #[test]
    fn test_region_has_active_army() {
        let mut game = create_test_game();
        assert!(game.region_has_active_army(0, 0));
        assert!(!game.region_has_active_army(0, 2)); // no soldiers
        assert!(!game.region_has_active_army(1, 4)); // not their turn
        game.turn.conquered.insert(0);
        assert!(!game.region_has_active_army(0, 0));
    }

    #[test]
    fn test_for_simulation_sets_flag_only() {
        let game = create_test_game();
        let sim = game.for_simulation();
        assert!(sim.is_simulation());
        assert_eq!(sim.owners, game.owners);
        assert!(Arc::ptr_eq(&sim.map, &game.map));
    }

    #[test]
    fn test_queues_shared_until_touched() {
        let game = create_test_game();
        let mut next = game.clone();
        next.pop_front(0, 1);
        assert!(Arc::ptr_eq(&next.soldiers[&4], &game.soldiers[&4]));
        assert_eq!(game.soldier_count(0), 2);
        assert_eq!(next.soldier_count(0), 1);
    }
}
