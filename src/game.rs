//! Game layer for Shrinewar.
//!
//! Implements the rules of the simulation:
//! - Region graph, players, temples and soldier queues
//! - Upgrade catalogue and the faith economy
//! - Combat resolution with injectable dice
//! - The move application engine and its presentation side channel

mod combat;
mod dice;
mod engine;
mod hints;
mod invariants;
mod moves;
mod player;
mod region;
mod soldier;
mod state;
mod temple;
mod upgrade;

pub use combat::{
    DEFENDER_THRESHOLD, FightOutcome, FightSetup, RoundOutcome, resolve_fight,
};
pub use dice::{FightDice, RandomDice, ScriptedDice, SimulatedDice};
pub use engine::{Transition, apply, apply_with_dice, validate};
pub use hints::{FloatingText, Hint, HintSink, SoundCue, TextAnchor};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use moves::{ArmyMove, BuildMove, EndMove, Move, MoveStamp};
pub use player::{AiLevel, Controller, PLAYER_TEMPLATES, Player, PlayerId, PlayerTemplate};
pub use region::{CellGrid, Point, Region, RegionGraph, RegionId};
pub use soldier::{Soldier, SoldierId, SoldierIds};
pub use state::{EndResult, GameState, MARTYR_BONUS, MOVES_PER_TURN, Rules, Turn};
pub use temple::Temple;
pub use upgrade::Upgrade;
