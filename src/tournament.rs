//! Headless game driver.
//!
//! Provides a pure function interface: `(setup, deciders, seed) -> GameReport`
//!
//! The driver handles:
//! - Map generation and the initial state from a [`GameSetup`]
//! - Asking each player's [`Decider`] for moves and applying them
//! - A move cap for games that would otherwise never end
//! - Parallel tournaments with rayon

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::error::{EngineError, SetupError};
use crate::game::{Controller, EndResult, GameState, Hint, Move, PlayerId, Transition, apply};
use crate::setup::{GameSetup, make_initial_state};

/// Chooses moves for one player.
///
/// The engine never decides which move to make; a decider is whatever
/// does, be it a search, a script or a person behind a UI.
pub trait Decider {
    /// Pick a move for the active player of `state`.
    ///
    /// The move must be valid for `state`; see [`GameState::legal_moves`].
    fn decide(&mut self, state: &GameState, rng: &mut dyn RngCore) -> Move;
}

/// Plays uniformly random legal moves.
///
/// Ends its turn with probability `end_bias` whenever it could do
/// something else, so games keep moving.
#[derive(Debug, Clone, Copy)]
pub struct RandomDecider {
    end_bias: f64,
}

impl RandomDecider {
    /// A decider ending its turn early with probability `end_bias`.
    #[must_use]
    pub const fn new(end_bias: f64) -> Self {
        Self { end_bias }
    }
}

impl Default for RandomDecider {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Decider for RandomDecider {
    fn decide(&mut self, state: &GameState, rng: &mut dyn RngCore) -> Move {
        let mut moves = state.legal_moves();
        // legal_moves always ends with the end-of-turn move
        let end = moves.pop().unwrap_or_else(|| state.end_move());
        if moves.is_empty() || rng.random_bool(self.end_bias.clamp(0.0, 1.0)) {
            return end;
        }
        let index = rng.random_range(0..moves.len());
        moves.swap_remove(index)
    }
}

/// Limits for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TournamentConfig {
    /// Games in a tournament.
    pub games: u64,
    /// Moves applied before a game is abandoned.
    pub move_cap: u32,
    /// Seed of the first game; game `i` uses `base_seed + i`.
    pub base_seed: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games: 100,
            move_cap: 5_000,
            base_seed: 0,
        }
    }
}

/// Error type for driver operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    /// The setup could not produce a game.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// A decider produced a move the engine rejected.
    #[error("game {seed}: player {player} made an invalid move: {source}")]
    InvalidMove {
        /// Seed of the game.
        seed: u64,
        /// Player whose decider failed.
        player: PlayerId,
        /// Engine rejection.
        #[source]
        source: EngineError,
    },
    /// One decider is needed per enabled player.
    #[error("{got} deciders for {expected} players")]
    DeciderCount {
        /// Enabled players.
        expected: usize,
        /// Deciders supplied.
        got: usize,
    },
}

/// Summary of one finished (or abandoned) game.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    /// Seed the game was played with.
    pub seed: u64,
    /// Result, `None` if the move cap was hit first.
    pub result: Option<EndResult>,
    /// Turn the game stopped on.
    pub turns: u32,
    /// Moves applied.
    pub moves: u32,
    /// Regions owned by each player at the end.
    pub standings: Vec<u32>,
    /// Players in the order they were eliminated.
    pub eliminated: Vec<PlayerId>,
    /// The last state.
    #[serde(skip)]
    pub final_state: GameState,
}

impl GameReport {
    /// The winner, if the game produced one.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.result.and_then(EndResult::winner)
    }
}

/// Play a game to the end with one decider per player.
///
/// Given the same seed, setup and deterministic deciders, this always
/// produces the same game.
///
/// # Errors
///
/// Returns an error if the setup is invalid, the decider count does not
/// match, or a decider produces an invalid move.
pub fn run_game(
    setup: &GameSetup,
    deciders: &mut [Box<dyn Decider>],
    config: &TournamentConfig,
    seed: u64,
) -> Result<GameReport, TournamentError> {
    run_game_observed(setup, deciders, config, seed, &mut |_, _| {})
}

/// [`run_game`], calling `observer` after every applied move.
///
/// # Errors
///
/// Same as [`run_game`].
pub fn run_game_observed(
    setup: &GameSetup,
    deciders: &mut [Box<dyn Decider>],
    config: &TournamentConfig,
    seed: u64,
    observer: &mut dyn FnMut(&Move, &Transition),
) -> Result<GameReport, TournamentError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = make_initial_state(setup, &mut rng)?;
    if deciders.len() != state.players().len() {
        return Err(TournamentError::DeciderCount {
            expected: state.players().len(),
            got: deciders.len(),
        });
    }

    let mut moves = 0;
    let mut eliminated = Vec::new();
    while !state.is_over() && moves < config.move_cap {
        let player = state.active_player();
        let mv = deciders[player].decide(&state, &mut rng);
        let transition = apply(&state, &mv, &mut rng).map_err(|source| {
            TournamentError::InvalidMove {
                seed,
                player,
                source,
            }
        })?;
        eliminated.extend(transition.hints.iter().filter_map(|hint| match hint {
            Hint::Eliminated { player } => Some(*player),
            _ => None,
        }));
        observer(&mv, &transition);
        state = transition.state;
        moves += 1;
    }

    let result = state.end_result();
    match result {
        Some(result) => info!(
            "game {seed} finished on turn {} after {moves} moves: {result:?}",
            state.turn().turn_index
        ),
        None => debug!("game {seed} abandoned after {moves} moves"),
    }

    Ok(GameReport {
        seed,
        result,
        turns: state.turn().turn_index,
        moves,
        standings: state.standings(),
        eliminated,
        final_state: state,
    })
}

/// Aggregated tournament results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TournamentStats {
    /// Games played.
    pub games_played: u64,
    /// Wins per player.
    pub wins: Vec<u64>,
    /// Drawn games.
    pub draws: u64,
    /// Games stopped by the move cap.
    pub unfinished: u64,
    /// Turns summed over all games.
    pub total_turns: u64,
    /// Moves summed over all games.
    pub total_moves: u64,
}

impl TournamentStats {
    /// Empty statistics for `players` players.
    #[must_use]
    pub fn new(players: usize) -> Self {
        Self {
            wins: vec![0; players],
            ..Self::default()
        }
    }

    /// Add one game.
    pub fn add(&mut self, report: &GameReport) {
        self.games_played += 1;
        self.total_turns += u64::from(report.turns);
        self.total_moves += u64::from(report.moves);
        match report.result {
            Some(EndResult::Winner(player)) => {
                if let Some(wins) = self.wins.get_mut(player) {
                    *wins += 1;
                }
            }
            Some(EndResult::Draw) => self.draws += 1,
            None => self.unfinished += 1,
        }
    }

    /// Merge another set of statistics into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }
        self.draws += other.draws;
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.total_moves += other.total_moves;
    }

    /// Share of games won by a player.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Mean turns per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// Play `config.games` games in parallel.
///
/// `make_decider` is called once per player per game with the player's id
/// and controller. `on_game` runs after each game, from any thread.
///
/// # Errors
///
/// Returns the first error any game produced.
pub fn run_tournament<F>(
    setup: &GameSetup,
    config: &TournamentConfig,
    make_decider: F,
    on_game: &(dyn Fn(&GameReport) + Sync),
) -> Result<TournamentStats, TournamentError>
where
    F: Fn(PlayerId, Controller) -> Box<dyn Decider> + Sync,
{
    setup.validate()?;
    let players = setup.players();
    let count = players.len();

    (0..config.games)
        .into_par_iter()
        .map(|i| -> Result<GameReport, TournamentError> {
            let mut deciders: Vec<Box<dyn Decider>> = players
                .iter()
                .map(|p| make_decider(p.id, p.controller))
                .collect();
            let report = run_game(setup, &mut deciders, config, config.base_seed.wrapping_add(i))?;
            on_game(&report);
            Ok(report)
        })
        .try_fold(
            || TournamentStats::new(count),
            |mut stats, report| {
                stats.add(&report?);
                Ok::<_, TournamentError>(stats)
            },
        )
        .try_reduce(
            || TournamentStats::new(count),
            |mut a, b| {
                a.merge(&b);
                Ok(a)
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_deciders(count: usize) -> Vec<Box<dyn Decider>> {
        (0..count)
            .map(|_| Box::new(RandomDecider::default()) as Box<dyn Decider>)
            .collect()
    }

    #[test]
    fn test_random_decider_moves_are_legal() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = make_initial_state(&GameSetup::all_ai(2), &mut rng).unwrap();
        let mut decider = RandomDecider::new(0.0);
        for _ in 0..20 {
            let mv = decider.decide(&state, &mut rng);
            assert!(crate::game::validate(&state, &mv).is_ok());
        }
    }

    #[test]
    fn test_run_game_finishes() {
        let setup = GameSetup::all_ai(2);
        let config = TournamentConfig::default();
        let report = run_game(&setup, &mut random_deciders(2), &config, 3).unwrap();
        assert!(report.result.is_some());
        assert!(report.turns <= 12);
        assert_eq!(report.standings.len(), 2);
    }

    #[test]
    fn test_run_game_deterministic() {
        let setup = GameSetup::all_ai(3);
        let config = TournamentConfig::default();
        let a = run_game(&setup, &mut random_deciders(3), &config, 77).unwrap();
        let b = run_game(&setup, &mut random_deciders(3), &config, 77).unwrap();
        assert_eq!(a.final_state, b.final_state);
        assert_eq!(a.moves, b.moves);
    }

    #[test]
    fn test_move_cap_stops_game() {
        let setup = GameSetup {
            turn_limit: None,
            ..GameSetup::all_ai(2)
        };
        let config = TournamentConfig {
            move_cap: 5,
            ..TournamentConfig::default()
        };
        let report = run_game(&setup, &mut random_deciders(2), &config, 1).unwrap();
        assert_eq!(report.moves, 5);
        assert!(report.result.is_none());
    }

    #[test]
    fn test_decider_count_checked() {
        let setup = GameSetup::all_ai(3);
        let result = run_game(&setup, &mut random_deciders(2), &TournamentConfig::default(), 0);
        assert!(matches!(
            result,
            Err(TournamentError::DeciderCount {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_tournament_stats_add_up() {
        let setup = GameSetup::all_ai(2);
        let config = TournamentConfig {
            games: 8,
            ..TournamentConfig::default()
        };
        let stats = run_tournament(
            &setup,
            &config,
            |_, _| Box::new(RandomDecider::default()),
            &|_| {},
        )
        .unwrap();
        assert_eq!(stats.games_played, 8);
        assert_eq!(
            stats.wins.iter().sum::<u64>() + stats.draws + stats.unfinished,
            8
        );
    }

    #[test]
    fn test_stats_merge() {
        let mut a = TournamentStats::new(2);
        a.games_played = 2;
        a.wins = vec![1, 1];
        let mut b = TournamentStats::new(2);
        b.games_played = 1;
        b.draws = 1;
        a.merge(&b);
        assert_eq!(a.games_played, 3);
        assert_eq!(a.draws, 1);
        assert!((a.win_rate(0) - 1.0 / 3.0).abs() < 1e-9);
    }
}
