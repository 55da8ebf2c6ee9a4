//! Combat resolution.
//!
//! A fight is decided soldier pair by soldier pair. Before it starts, an
//! Earth-upgraded defender kills up to its Earth level of invaders outright.
//! Each round then draws a roll in `[0, 120 + chance)`, where
//! `chance = 100 × (attack / defense)^1.6`; a roll up to 120 is won by the
//! defender, anything above by the attacker.

use serde::Serialize;

use crate::game::FightDice;

/// Rolls at or below this value are won by the defender.
pub const DEFENDER_THRESHOLD: f64 = 120.0;

/// Exponent skewing the win chance towards the stronger side.
const CHANCE_EXPONENT: f64 = 1.6;

/// Everything that decides a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightSetup {
    /// Attacking soldiers sent.
    pub incoming: u32,
    /// Soldiers defending the destination.
    pub defenders: u32,
    /// Attacker's offense (Fire) level, in percent.
    pub offense: u32,
    /// Defender's defense (Earth) level; percent and pre-emptive kills.
    pub defense: u32,
    /// Losses the attacker may absorb during this attack.
    pub invincibility: u32,
}

impl FightSetup {
    /// Invaders killed before the exchange.
    #[must_use]
    pub fn preemptive_damage(&self) -> u32 {
        self.incoming.min(self.defense)
    }

    /// Number of rounds the exchange lasts (0 if one side is empty).
    #[must_use]
    pub fn rounds(&self) -> u32 {
        let incoming = self.incoming - self.preemptive_damage();
        incoming.min(self.defenders)
    }

    /// The attacker's skewed chance value, the open end of the roll range
    /// minus [`DEFENDER_THRESHOLD`].
    #[must_use]
    pub fn attacker_win_chance(&self) -> f64 {
        let incoming = self.incoming - self.preemptive_damage();
        let attack = f64::from(incoming) * (1.0 + f64::from(self.offense) * 0.01);
        let defense = f64::from(self.defenders) * (1.0 + f64::from(self.defense) * 0.01);
        if defense <= 0.0 {
            return f64::INFINITY;
        }
        100.0 * (attack / defense).powf(CHANCE_EXPONENT)
    }
}

/// What happened in one round of the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The front attacker died.
    AttackerLost,
    /// The attacker lost the round but an invincibility charge saved the soldier.
    Absorbed,
    /// The front defender died.
    DefenderLost,
}

/// Result of a fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightOutcome {
    /// Invaders killed before the exchange.
    pub preemptive: u32,
    /// Round by round results.
    pub rounds: Vec<RoundOutcome>,
    /// The roll drawn for each round.
    pub rolls: Vec<f64>,
    /// Attackers killed during the exchange.
    pub attackers_lost: u32,
    /// Defenders killed during the exchange.
    pub defenders_lost: u32,
    /// Attackers still standing.
    pub attackers_left: u32,
    /// Defenders still standing.
    pub defenders_left: u32,
}

impl FightOutcome {
    /// Whether there was an exchange at all.
    #[must_use]
    pub fn fought(&self) -> bool {
        !self.rounds.is_empty()
    }

    /// Whether the destination held.
    #[must_use]
    pub fn defended(&self) -> bool {
        self.defenders_left > 0
    }

    /// Soldiers that died, on both sides, pre-emptive kills included.
    #[must_use]
    pub fn casualties(&self) -> u32 {
        self.preemptive + self.attackers_lost + self.defenders_lost
    }
}

/// Resolve a fight.
///
/// Pure apart from the rolls drawn from `dice`; with deterministic dice
/// the outcome is fully determined by the setup.
pub fn resolve_fight(setup: &FightSetup, dice: &mut dyn FightDice) -> FightOutcome {
    let preemptive = setup.preemptive_damage();
    let mut attackers = setup.incoming - preemptive;
    let mut defenders = setup.defenders;
    let rounds = setup.rounds();

    let mut outcome = FightOutcome {
        preemptive,
        rounds: Vec::with_capacity(rounds as usize),
        rolls: Vec::with_capacity(rounds as usize),
        attackers_lost: 0,
        defenders_lost: 0,
        attackers_left: attackers,
        defenders_left: defenders,
    };
    if rounds == 0 {
        return outcome;
    }

    let maximum = DEFENDER_THRESHOLD + setup.attacker_win_chance();
    let mut invincibility = setup.invincibility;

    for round in 0..rounds {
        let roll = dice.roll(round, rounds, maximum);
        let result = if roll <= DEFENDER_THRESHOLD {
            if invincibility > 0 {
                invincibility -= 1;
                RoundOutcome::Absorbed
            } else {
                attackers -= 1;
                outcome.attackers_lost += 1;
                RoundOutcome::AttackerLost
            }
        } else {
            defenders -= 1;
            outcome.defenders_lost += 1;
            RoundOutcome::DefenderLost
        };
        log::trace!("fight round {round}/{rounds}: roll {roll:.2} of {maximum:.2} -> {result:?}");
        outcome.rolls.push(roll);
        outcome.rounds.push(result);
    }

    outcome.attackers_left = attackers;
    outcome.defenders_left = defenders;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ScriptedDice, SimulatedDice};

    fn setup(incoming: u32, defenders: u32) -> FightSetup {
        FightSetup {
            incoming,
            defenders,
            offense: 0,
            defense: 0,
            invincibility: 0,
        }
    }

    #[test]
    fn test_even_fight_chance() {
        // equal strength: 100 * 1^1.6 = 100
        let chance = setup(4, 4).attacker_win_chance();
        assert!((chance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_modifiers_skew_chance() {
        let mut s = setup(4, 4);
        s.offense = 50;
        assert!(s.attacker_win_chance() > 100.0);
        s.offense = 0;
        s.defense = 2;
        s.incoming = 6;
        // 2 killed up front, then 4 vs 4 at +2% defense
        assert!(s.attacker_win_chance() < 100.0);
    }

    #[test]
    fn test_preemptive_damage_capped_by_incoming() {
        let mut s = setup(1, 3);
        s.defense = 2;
        assert_eq!(s.preemptive_damage(), 1);
        assert_eq!(s.rounds(), 0);

        let outcome = resolve_fight(&s, &mut SimulatedDice);
        assert_eq!(outcome.preemptive, 1);
        assert!(!outcome.fought());
        assert_eq!(outcome.attackers_left, 0);
        assert_eq!(outcome.defenders_left, 3);
    }

    #[test]
    fn test_no_defenders_no_rounds() {
        let outcome = resolve_fight(&setup(5, 0), &mut SimulatedDice);
        assert!(!outcome.fought());
        assert_eq!(outcome.attackers_left, 5);
        assert!(!outcome.defended());
    }

    #[test]
    fn test_simulated_even_fight() {
        // 3 vs 3: maximum 220, rolls (i+3)*220/8 = 82.5, 110, 137.5
        let outcome = resolve_fight(&setup(3, 3), &mut SimulatedDice);
        assert_eq!(
            outcome.rounds,
            vec![
                RoundOutcome::AttackerLost,
                RoundOutcome::AttackerLost,
                RoundOutcome::DefenderLost
            ]
        );
        assert_eq!(outcome.attackers_left, 1);
        assert_eq!(outcome.defenders_left, 2);
        assert!(outcome.defended());
        assert_eq!(outcome.casualties(), 3);
    }

    #[test]
    fn test_simulated_overwhelming_attack() {
        // 10 vs 1: chance = 100 * 10^1.6 ≈ 3981, single roll 3/6 of the range
        let outcome = resolve_fight(&setup(10, 1), &mut SimulatedDice);
        assert_eq!(outcome.rounds, vec![RoundOutcome::DefenderLost]);
        assert_eq!(outcome.attackers_left, 10);
        assert_eq!(outcome.defenders_left, 0);
    }

    #[test]
    fn test_invincibility_absorbs_losses() {
        let mut s = setup(2, 2);
        s.invincibility = 1;
        let rolls = [10.0, 10.0];
        let outcome = resolve_fight(&s, &mut ScriptedDice::new(&rolls));
        assert_eq!(
            outcome.rounds,
            vec![RoundOutcome::Absorbed, RoundOutcome::AttackerLost]
        );
        assert_eq!(outcome.attackers_lost, 1);
        assert_eq!(outcome.attackers_left, 1);
    }

    #[test]
    fn test_roll_at_threshold_is_defender_win() {
        let rolls = [DEFENDER_THRESHOLD];
        let outcome = resolve_fight(&setup(1, 1), &mut ScriptedDice::new(&rolls));
        assert_eq!(outcome.rounds, vec![RoundOutcome::AttackerLost]);
    }
}
