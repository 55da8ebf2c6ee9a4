// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Shrinewar: a deterministic turn-based territory strategy engine.
//!
//! Players own regions of a procedurally generated map, march soldier
//! queues between neighbouring regions, fight over them and spend faith on
//! temple upgrades. The crate provides:
//! - Map generation from a seeded random source
//! - An immutable game state with copy-on-write sharing between snapshots
//! - A move application engine returning the next state plus presentation hints
//! - A simulation mode with deterministic fights for lookahead searches
//! - A headless driver for playing whole games and tournaments
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tournament Runner / CLI           │
//! ├─────────────────────────────────────┤
//! │   Setup (map generation, homes)     │
//! ├─────────────────────────────────────┤
//! │   Move Application Engine           │
//! ├─────────────────────────────────────┤
//! │   Game State + Combat Resolution    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use shrinewar::setup::{GameSetup, make_initial_state};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let state = make_initial_state(&GameSetup::all_ai(2), &mut rng).unwrap();
//! let next = shrinewar::game::apply(&state, &state.end_move(), &mut rng).unwrap();
//! assert_eq!(next.state.active_player(), 1);
//! ```

pub mod error;
pub mod game;
pub mod render;
pub mod setup;
pub mod testing;
pub mod tournament;

pub use error::{ConfigError, EngineError, GraphError, MapGenError, SetupError};

// Re-export key game types at crate root for convenience
pub use game::{EndResult, GameState, Move, PlayerId, RegionGraph, RegionId, Transition, Upgrade};
pub use setup::{GameSetup, make_initial_state};
pub use tournament::{Decider, GameReport, RandomDecider, TournamentConfig, run_game};
