#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shrinewar::game::{FightSetup, RoundOutcome, ScriptedDice, resolve_fight};

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacking soldiers sent.
    incoming: u16,
    /// Soldiers defending.
    defenders: u16,
    /// Fire level in percent.
    offense: u8,
    /// Earth level.
    defense: u8,
    /// Invincibility charges.
    invincibility: u8,
    /// Rolls to replay; short lists are padded by the dice.
    rolls: Vec<f64>,
}

fuzz_target!(|input: CombatInput| {
    let setup = FightSetup {
        incoming: u32::from(input.incoming),
        defenders: u32::from(input.defenders),
        offense: u32::from(input.offense),
        defense: u32::from(input.defense),
        invincibility: u32::from(input.invincibility),
    };

    let mut dice = ScriptedDice::new(&input.rolls);
    let outcome = resolve_fight(&setup, &mut dice);

    assert_eq!(
        outcome.preemptive + outcome.attackers_lost + outcome.attackers_left,
        setup.incoming
    );
    assert_eq!(outcome.defenders_lost + outcome.defenders_left, setup.defenders);
    assert_eq!(outcome.rounds.len() as u32, setup.rounds());
    let absorbed = outcome
        .rounds
        .iter()
        .filter(|r| **r == RoundOutcome::Absorbed)
        .count() as u32;
    assert!(absorbed <= setup.invincibility);
});
