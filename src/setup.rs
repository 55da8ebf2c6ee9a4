//! Game setup: configuration, map generation and the initial state.

pub mod mapgen;

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SetupError};
use crate::game::{
    AiLevel, Controller, GameState, PLAYER_TEMPLATES, Player, RegionGraph, RegionId, Rules,
};

pub use mapgen::{MAX_PLAYERS, MIN_PLAYERS, MapParams, generate, generate_with};

/// Everything decided before a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetup {
    /// Who controls each player slot; `Off` slots do not take part.
    pub controllers: Vec<Controller>,
    /// Difficulty tier of AI players.
    pub ai_level: AiLevel,
    /// Last turn played, `None` for endless games.
    pub turn_limit: Option<u32>,
    /// Soldiers placed at each home temple.
    pub home_soldiers: u32,
    /// Neutral temples per enabled player.
    pub neutral_temples_per_player: u32,
    /// Soldiers guarding each neutral temple.
    pub neutral_temple_soldiers: u32,
    /// Faith every player starts with.
    pub starting_cash: u32,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            controllers: vec![
                Controller::Human,
                Controller::Ai,
                Controller::Ai,
                Controller::Off,
            ],
            ai_level: AiLevel::Nice,
            turn_limit: Some(12),
            home_soldiers: 4,
            neutral_temples_per_player: 1,
            neutral_temple_soldiers: 3,
            starting_cash: 0,
        }
    }
}

impl GameSetup {
    /// Load a setup from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a setup from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// A setup with `count` AI players and the default rules.
    #[must_use]
    pub fn all_ai(count: usize) -> Self {
        Self {
            controllers: vec![Controller::Ai; count],
            ..Self::default()
        }
    }

    /// Number of slots taking part.
    #[must_use]
    pub fn enabled_players(&self) -> usize {
        self.controllers
            .iter()
            .filter(|c| **c != Controller::Off)
            .count()
    }

    /// Check the slot configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] for fewer than two enabled slots or more slots
    /// than player templates.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.controllers.len() > PLAYER_TEMPLATES.len() {
            return Err(SetupError::TooManySlots {
                slots: self.controllers.len(),
                max: PLAYER_TEMPLATES.len(),
            });
        }
        let enabled = self.enabled_players();
        if enabled < MIN_PLAYERS {
            return Err(SetupError::TooFewPlayers { enabled });
        }
        Ok(())
    }

    /// Rule parameters for a game with this setup.
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules {
            turn_limit: self.turn_limit,
            ai_level: self.ai_level,
            ..Rules::default()
        }
    }

    /// Players for the enabled slots, numbered in turn order.
    ///
    /// Each keeps the name and colors of its slot.
    #[must_use]
    pub fn players(&self) -> Vec<Player> {
        self.controllers
            .iter()
            .zip(PLAYER_TEMPLATES.iter())
            .filter(|(controller, _)| **controller != Controller::Off)
            .enumerate()
            .map(|(id, (controller, template))| Player::from_template(id, template, *controller))
            .collect()
    }
}

/// Generate a map and build the starting state for a setup.
///
/// # Errors
///
/// Returns [`SetupError`] if the setup is invalid or the map cannot be
/// generated.
pub fn make_initial_state<R: Rng + ?Sized>(
    setup: &GameSetup,
    rng: &mut R,
) -> Result<GameState, SetupError> {
    setup.validate()?;
    let players = setup.players();
    let map = generate(players.len(), rng)?;
    populate(setup, players, map, rng)
}

/// Build the starting state on a given map.
///
/// Homes are spread out by graph distance: the first is random, every
/// further one maximizes the distance to the nearest home already chosen.
/// Neutral temples then go to the regions farthest from any temple.
///
/// # Errors
///
/// Returns [`SetupError`] if the setup is invalid or the map has too few
/// regions.
pub fn populate<R: Rng + ?Sized>(
    setup: &GameSetup,
    players: Vec<Player>,
    map: RegionGraph,
    rng: &mut R,
) -> Result<GameState, SetupError> {
    setup.validate()?;
    let player_count = players.len();
    let neutral_count = setup.neutral_temples_per_player as usize * player_count;
    let needed = player_count + neutral_count;
    if map.len() < needed {
        return Err(SetupError::NotEnoughRegions {
            needed,
            available: map.len(),
        });
    }

    let mut state = GameState::new(players, map, setup.rules());
    let map = Arc::clone(&state.map);
    let mut spread = Spread::new(&map);

    for player in 0..player_count {
        let home = if player == 0 {
            rng.random_range(0..map.len())
        } else {
            spread.farthest()
        };
        spread.claim(home);
        state.set_owner(home, Some(player));
        state.place_temple(home);
        state.spawn_soldiers(home, setup.home_soldiers);
        debug!("player {player} starts at region {home}");
    }

    for _ in 0..neutral_count {
        let region = spread.farthest();
        spread.claim(region);
        state.place_temple(region);
        state.spawn_soldiers(region, setup.neutral_temple_soldiers);
    }

    for cash in &mut state.cash {
        *cash = setup.starting_cash;
    }

    info!(
        "new game: {player_count} players, {} regions, {} temples",
        state.map().len(),
        state.temples().count()
    );
    Ok(state)
}

/// Tracks the distance from every region to the nearest claimed one.
struct Spread<'a> {
    map: &'a RegionGraph,
    nearest: Vec<usize>,
    claimed: Vec<bool>,
}

impl<'a> Spread<'a> {
    fn new(map: &'a RegionGraph) -> Self {
        Self {
            map,
            nearest: vec![usize::MAX; map.len()],
            claimed: vec![false; map.len()],
        }
    }

    fn claim(&mut self, region: RegionId) {
        self.claimed[region] = true;
        let distances = self.map.distances_from(region);
        for (nearest, distance) in self.nearest.iter_mut().zip(distances) {
            *nearest = (*nearest).min(distance.unwrap_or(usize::MAX));
        }
    }

    /// The unclaimed region farthest from every claimed one; lowest id on ties.
    fn farthest(&self) -> RegionId {
        let mut best = None;
        for (region, &distance) in self.nearest.iter().enumerate() {
            if self.claimed[region] {
                continue;
            }
            match best {
                Some((_, d)) if d >= distance => {}
                _ => best = Some((region, distance)),
            }
        }
        best.map_or(0, |(region, _)| region)
    }
}
