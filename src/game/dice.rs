//! Fight rolls as an injected capability.
//!
//! Combat never reaches for ambient randomness. Real play hands the engine
//! a [`RandomDice`]; lookahead uses [`SimulatedDice`], whose rolls depend
//! only on the round and the size of the fight; replays use
//! [`ScriptedDice`] with the rolls recorded the first time.

use rand::Rng;

/// Source of fight rolls.
pub trait FightDice {
    /// Roll for `round` (0-based) of a fight lasting `rounds` rounds.
    ///
    /// The result lies in `[0, maximum)`.
    fn roll(&mut self, round: u32, rounds: u32, maximum: f64) -> f64;
}

/// Uniform draws from a random number generator.
#[derive(Debug)]
pub struct RandomDice<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomDice<'a, R> {
    /// Wrap a generator.
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> FightDice for RandomDice<'_, R> {
    fn roll(&mut self, _round: u32, _rounds: u32, maximum: f64) -> f64 {
        if maximum <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(0.0..maximum)
    }
}

/// Deterministic rolls for lookahead search.
///
/// Rolls are spread evenly around the middle of the range, which
/// exaggerates whichever side is stronger and lets a search evaluate a
/// fight without branching on chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDice;

impl FightDice for SimulatedDice {
    fn roll(&mut self, round: u32, rounds: u32, maximum: f64) -> f64 {
        f64::from(round + 3) * maximum / f64::from(rounds + 5)
    }
}

/// Replays a fixed list of rolls.
#[derive(Debug, Clone)]
pub struct ScriptedDice<'a> {
    rolls: &'a [f64],
    next: usize,
}

impl<'a> ScriptedDice<'a> {
    /// Replay `rolls` in order.
    #[must_use]
    pub const fn new(rolls: &'a [f64]) -> Self {
        Self { rolls, next: 0 }
    }

    /// Number of rolls available.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rolls.len()
    }

    /// Whether the script holds no rolls.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

impl FightDice for ScriptedDice<'_> {
    /// Returns the next scripted roll; past the end it returns `maximum`,
    /// an attacker win. Callers check the length up front.
    fn roll(&mut self, _round: u32, _rounds: u32, maximum: f64) -> f64 {
        let roll = self.rolls.get(self.next).copied().unwrap_or(maximum);
        self.next += 1;
        roll
    }
}
