//! The move application engine.
//!
//! [`apply`] takes a state and a move and returns the next state together
//! with the presentation hints describing what happened. The input state is
//! never touched.
//!
//! Order of operations for every move:
//! 1. Validate the move against the state
//! 2. Resolve it (army movement and combat, purchase, or end of turn)
//! 3. Eliminate players left without soldiers
//! 4. End the game if fewer than two players hold regions

use log::{Level, debug, info, log};
use rand::Rng;

use crate::error::{EngineError, IllegalMove};
use crate::game::{
    ArmyMove, BuildMove, FightDice, FightOutcome, FightSetup, FloatingText, GameState,
    Hint, HintSink, Move, RandomDice, RegionId, RoundOutcome, ScriptedDice, SimulatedDice,
    SoundCue, TextAnchor, Turn, Upgrade, resolve_fight,
};

/// Width of short combat texts.
const SHORT_TEXT_WIDTH: u32 = 4;

/// Width of the longer combat texts.
const LONG_TEXT_WIDTH: u32 = 7;

/// Color of neutral or otherwise uncolored texts.
const NEUTRAL_TEXT_COLOR: &str = "#fff";

/// The outcome of applying one move.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The state after the move.
    pub state: GameState,
    /// Presentation hints, in the order things happened. Empty in simulation.
    pub hints: Vec<Hint>,
    /// The fight, if the move was an attack.
    pub fight: Option<FightOutcome>,
}

/// Apply a move, drawing fight rolls from `rng` in real play.
///
/// Simulation states resolve fights with [`SimulatedDice`] and never touch
/// `rng`; an army move carrying precomputed rolls replays them instead.
///
/// # Errors
///
/// Returns an [`EngineError`] if the move does not fit the state; see
/// [`validate`].
pub fn apply<R: Rng + ?Sized>(
    state: &GameState,
    mv: &Move,
    rng: &mut R,
) -> Result<Transition, EngineError> {
    apply_with_dice(state, mv, &mut RandomDice::new(rng))
}

/// Apply a move with an explicit source of fight rolls for real play.
///
/// # Errors
///
/// Same as [`apply`].
pub fn apply_with_dice(
    state: &GameState,
    mv: &Move,
    dice: &mut dyn FightDice,
) -> Result<Transition, EngineError> {
    validate(state, mv)?;

    let mut next = state.clone();
    let mut hints = HintSink::new(!state.simulation);
    let level = if state.simulation {
        Level::Trace
    } else {
        Level::Debug
    };

    let fight = match mv {
        Move::Army(army) => {
            log!(
                level,
                "player {} moves {} soldiers {} -> {}",
                state.turn.player,
                army.count,
                army.source,
                army.destination
            );
            move_soldiers(&mut next, army, dice, &mut hints)?
        }
        Move::Build(build) => {
            log!(
                level,
                "player {} builds {} at {}",
                state.turn.player,
                build.upgrade,
                build.region
            );
            build_upgrade(&mut next, build, &mut hints);
            None
        }
        Move::End(_) => {
            log!(level, "player {} ends turn {}", state.turn.player, state.turn.turn_index);
            next_turn(&mut next, &mut hints);
            None
        }
    };

    after_move_checks(&mut next, &mut hints);

    #[cfg(debug_assertions)]
    crate::game::assert_invariants(&next);

    Ok(Transition {
        state: next,
        hints: hints.into_hints(),
        fight,
    })
}

/// Check that a move can be applied to a state.
///
/// # Errors
///
/// - [`EngineError::GameOver`] if the game already has a result
/// - [`EngineError::StaleMove`] if the stamp does not match the state
/// - [`EngineError::UnknownRegion`] for regions not on the map
/// - [`EngineError::NoTemple`] for build moves on temple-less regions
/// - [`EngineError::Illegal`] for moves that break a rule
pub fn validate(state: &GameState, mv: &Move) -> Result<(), EngineError> {
    if state.is_over() {
        return Err(EngineError::GameOver);
    }

    let stamp = mv.stamp();
    if stamp.turn_index != state.turn.turn_index
        || stamp.player != state.turn.player
        || stamp.moves_remaining != state.turn.moves_remaining
    {
        return Err(EngineError::StaleMove {
            move_turn: stamp.turn_index,
            move_player: stamp.player,
            turn: state.turn.turn_index,
            player: state.turn.player,
        });
    }

    match mv {
        Move::Army(army) => validate_army(state, army),
        Move::Build(build) => validate_build(state, build),
        Move::End(_) => Ok(()),
    }
}

fn check_region(state: &GameState, region: RegionId) -> Result<(), EngineError> {
    if region < state.map.len() {
        Ok(())
    } else {
        Err(EngineError::UnknownRegion(region))
    }
}

fn validate_army(state: &GameState, army: &ArmyMove) -> Result<(), EngineError> {
    check_region(state, army.source)?;
    check_region(state, army.destination)?;

    let player = state.turn.player;
    if state.turn.moves_remaining == 0 {
        return Err(IllegalMove::NoMovesRemaining.into());
    }
    if state.owner(army.source) != Some(player) {
        return Err(IllegalMove::NotOwned(army.source).into());
    }
    if state.turn.conquered.contains(&army.source) {
        return Err(IllegalMove::ConqueredThisTurn(army.source).into());
    }
    if !state.map.are_neighbors(army.source, army.destination) {
        return Err(IllegalMove::NotAdjacent {
            from: army.source,
            to: army.destination,
        }
        .into());
    }
    let available = state.soldier_count(army.source);
    if army.count == 0 || army.count > available {
        return Err(IllegalMove::BadSoldierCount {
            requested: army.count,
            available,
        }
        .into());
    }
    Ok(())
}

fn validate_build(state: &GameState, build: &BuildMove) -> Result<(), EngineError> {
    check_region(state, build.region)?;
    let Some(temple) = state.temple(build.region) else {
        return Err(EngineError::NoTemple(build.region));
    };
    let player = state.turn.player;
    if state.owner(build.region) != Some(player) {
        return Err(IllegalMove::NotOwned(build.region).into());
    }

    let cost = match build.upgrade {
        Upgrade::Soldier => state.soldier_cost(),
        Upgrade::Rebirth => {
            if temple.upgrade.is_none() {
                return Err(IllegalMove::NothingToRemove(build.region).into());
            }
            0
        }
        upgrade => {
            let level = next_level(temple.upgrade, temple.level, upgrade);
            upgrade
                .cost(level)
                .ok_or(IllegalMove::MaxLevel(upgrade))?
        }
    };

    let cash = state.cash(player);
    if cost > cash {
        return Err(IllegalMove::InsufficientFaith { cost, cash }.into());
    }
    Ok(())
}

/// Level a temple reaches when `upgrade` is bought on it.
fn next_level(current: Option<Upgrade>, level: u32, upgrade: Upgrade) -> u32 {
    if current == Some(upgrade) { level + 1 } else { 0 }
}

fn move_soldiers(
    state: &mut GameState,
    army: &ArmyMove,
    dice: &mut dyn FightDice,
    hints: &mut HintSink,
) -> Result<Option<FightOutcome>, EngineError> {
    let source = army.source;
    let destination = army.destination;
    let from_owner = state.owner(source);
    let to_owner = state.owner(destination);
    let defenders = state.soldier_count(destination);
    let mut incoming = army.count;
    let mut fight = None;

    if from_owner != to_owner {
        let setup = FightSetup {
            incoming,
            defenders,
            offense: state.upgrade_level(from_owner, Upgrade::Fire),
            defense: state.upgrade_level(to_owner, Upgrade::Earth),
            invincibility: state.raw_upgrade_level(from_owner, Upgrade::Fire),
        };

        let outcome = match (&army.rolls, state.simulation) {
            (_, true) => resolve_fight(&setup, &mut SimulatedDice),
            (Some(rolls), false) => {
                let needed = setup.rounds() as usize;
                if rolls.len() < needed {
                    return Err(EngineError::ShortFightSequence {
                        provided: rolls.len(),
                        needed,
                    });
                }
                resolve_fight(&setup, &mut ScriptedDice::new(rolls))
            }
            (None, false) => resolve_fight(&setup, dice),
        };

        let charging = outcome.preemptive > 0 || outcome.fought();
        if charging && hints.is_enabled() {
            let soldiers = state
                .soldiers(source)
                .take(incoming as usize)
                .map(|s| s.id)
                .collect();
            hints.push(Hint::Charge {
                soldiers,
                target: destination,
            });
        }

        if outcome.preemptive > 0 {
            if let Some(front) = state.soldiers(source).next() {
                hints.text(FloatingText::new(
                    TextAnchor::Soldier(front.id),
                    format!("Earth kills {}!", outcome.preemptive),
                    Upgrade::Earth.color(),
                    LONG_TEXT_WIDTH,
                ));
            }
            state.pop_front(source, outcome.preemptive);
            hints.sound(SoundCue::OursDead);
            incoming -= outcome.preemptive;
        }

        for round in &outcome.rounds {
            match round {
                RoundOutcome::AttackerLost => {
                    state.pop_front(source, 1);
                    incoming -= 1;
                    hints.sound(SoundCue::OursDead);
                }
                RoundOutcome::Absorbed => {
                    if let Some(front) = state.soldiers(source).next() {
                        hints.text(FloatingText::new(
                            TextAnchor::Soldier(front.id),
                            "Protected by Fire!",
                            Upgrade::Fire.color(),
                            LONG_TEXT_WIDTH,
                        ));
                    }
                    hints.sound(SoundCue::OursDead);
                }
                RoundOutcome::DefenderLost => {
                    state.pop_front(destination, 1);
                    if let Some(owner) = to_owner {
                        let bonus = state.rules.martyr_bonus;
                        if let Some(cash) = state.cash.get_mut(owner) {
                            *cash += bonus;
                        }
                    }
                    hints.sound(SoundCue::EnemyDead);
                }
            }
        }

        if outcome.defended() {
            incoming = 0;
            let color = to_owner
                .and_then(|owner| state.player(owner))
                .map_or(NEUTRAL_TEXT_COLOR, |p| p.highlight.as_str())
                .to_string();
            hints.sound(SoundCue::Defeat);
            hints.text(FloatingText::new(
                TextAnchor::Region(destination),
                "Defended!",
                color,
                LONG_TEXT_WIDTH,
            ));
        }

        if charging {
            hints.push(Hint::ChargeOver);
        }
        fight = Some(outcome);
    }

    if incoming > 0 {
        let moving = state.pop_front(source, incoming);
        state.push_back(destination, moving);

        if from_owner != to_owner {
            state.set_owner(destination, from_owner);
            if let Some(temple) = state.temples.get_mut(&destination) {
                temple.clear();
            }
            state.turn.conquered.insert(destination);

            let color = from_owner
                .and_then(|owner| state.player(owner))
                .map_or(NEUTRAL_TEXT_COLOR, |p| p.highlight.as_str())
                .to_string();
            hints.push(Hint::Particles {
                region: destination,
            });
            hints.text(FloatingText::new(
                TextAnchor::Region(destination),
                "Conquered!",
                color,
                LONG_TEXT_WIDTH,
            ));
            hints.sound(if defenders > 0 {
                SoundCue::Victory
            } else {
                SoundCue::TakeOver
            });
        }
    }

    state.turn.moves_remaining = state.turn.moves_remaining.saturating_sub(1);
    Ok(fight)
}

fn build_upgrade(state: &mut GameState, build: &BuildMove, hints: &mut HintSink) {
    let player = state.turn.player;
    let region = build.region;

    let cost = match build.upgrade {
        Upgrade::Soldier => {
            let cost = state.soldier_cost();
            state.turn.soldiers_bought += 1;
            state.spawn_soldiers(region, 1);
            cost
        }
        Upgrade::Rebirth => {
            if let Some(temple) = state.temples.get_mut(&region) {
                temple.clear();
            }
            0
        }
        upgrade => {
            let Some(temple) = state.temples.get_mut(&region) else {
                return;
            };
            let level = next_level(temple.upgrade, temple.level, upgrade);
            temple.upgrade = Some(upgrade);
            temple.level = level;
            if upgrade == Upgrade::Air {
                state.turn.moves_remaining += 1;
            }
            upgrade.cost(level).unwrap_or(0)
        }
    };

    if let Some(cash) = state.cash.get_mut(player) {
        *cash = cash.saturating_sub(cost);
    }
    hints.sound(SoundCue::Click);
    hints.push(Hint::Particles { region });
}

fn next_turn(state: &mut GameState, hints: &mut HintSink) {
    let player = state.turn.player;

    let income = state.income(player);
    if let Some(cash) = state.cash.get_mut(player) {
        *cash += income;
    }
    if income > 0 {
        if let Some(first) = state.temples_of(player).next() {
            hints.text(FloatingText::new(
                TextAnchor::Region(first.region),
                format!("+{income}"),
                NEUTRAL_TEXT_COLOR,
                SHORT_TEXT_WIDTH,
            ));
        }
    }

    let temple_regions: Vec<RegionId> = state.temples_of(player).map(|t| t.region).collect();
    for region in temple_regions {
        state.spawn_soldiers(region, 1);
    }

    let count = state.players.len();
    let mut next_player = player;
    let mut turn_index = state.turn.turn_index;
    for _ in 0..count {
        next_player = (next_player + 1) % count;
        if next_player == 0 {
            turn_index += 1;
        }
        if state.region_count(next_player) > 0 {
            break;
        }
    }

    let moves = state.rules.moves_per_turn + state.upgrade_level(Some(next_player), Upgrade::Air);
    state.turn = Turn::new(turn_index, next_player, moves);

    match state.rules.turn_limit {
        Some(limit) if turn_index > limit => {
            state.turn.turn_index = limit;
            let result = state.determine_result();
            info!("turn limit {limit} reached: {result:?}");
            state.end_result = Some(result);
        }
        _ => hints.push(Hint::TurnStarted {
            player: next_player,
            turn_index,
        }),
    }
}

/// Eliminate players without soldiers and end the game when one is left.
fn after_move_checks(state: &mut GameState, hints: &mut HintSink) {
    for player in 0..state.players.len() {
        if state.region_count(player) == 0 || state.total_soldiers(player) > 0 {
            continue;
        }
        for owner in &mut state.owners {
            if *owner == Some(player) {
                *owner = None;
            }
        }
        if state.turn.player == player {
            state.turn.moves_remaining = 0;
        }
        if !state.simulation {
            info!("player {player} eliminated on turn {}", state.turn.turn_index);
        }
        hints.sound(SoundCue::Elimination);
        hints.push(Hint::Eliminated { player });
    }

    let active = state.turn.player;
    let owners = &state.owners;
    state
        .turn
        .conquered
        .retain(|&region| owners.get(region).copied().flatten() == Some(active));

    if state.end_result.is_none() && state.living_players().count() < 2 {
        let result = state.determine_result();
        if !state.simulation {
            info!("game over on turn {}: {result:?}", state.turn.turn_index);
        } else {
            debug!("simulated game over: {result:?}");
        }
        state.end_result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Controller, EndResult, Player, RegionGraph, Rules};
    use crate::testing::StateBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn apply_ok(state: &GameState, mv: &Move) -> Transition {
        apply(state, mv, &mut rng()).unwrap()
    }

    #[test]
    fn test_friendly_move_transfers_front_soldiers() {
        let state = StateBuilder::line(3)
            .owner(0, 0)
            .owner(1, 0)
            .soldiers(0, 3)
            .soldiers(1, 1)
            .owner(2, 1)
            .soldiers(2, 1)
            .build();
        let moved: Vec<_> = state.soldiers(0).take(2).map(|s| s.id).collect();
        let left = state.soldiers(0).nth(2).map(|s| s.id);

        let t = apply_ok(&state, &state.army_move(0, 1, 2));
        let dest: Vec<_> = t.state.soldiers(1).map(|s| s.id).collect();
        assert_eq!(dest.len(), 3);
        assert_eq!(&dest[1..], moved.as_slice());
        assert_eq!(t.state.soldiers(0).next().map(|s| s.id), left);
        assert_eq!(t.state.turn().moves_remaining, 2);
        assert!(t.fight.is_none());
        // input untouched
        assert_eq!(state.soldier_count(0), 3);
        assert_eq!(state.turn().moves_remaining, 3);
    }

    #[test]
    fn test_conquest_of_empty_region() {
        let state = StateBuilder::line(3)
            .owner(0, 0)
            .soldiers(0, 2)
            .temple(1)
            .upgrade(1, Upgrade::Water, 1)
            .owner(2, 1)
            .soldiers(2, 1)
            .build();
        let t = apply_ok(&state, &state.army_move(0, 1, 1));

        assert_eq!(t.state.owner(1), Some(0));
        assert!(t.state.turn().conquered.contains(&1));
        let temple = t.state.temple(1).unwrap();
        assert_eq!(temple.upgrade, None);
        assert_eq!(temple.level, 0);
        assert!(t.hints.contains(&Hint::Sound {
            cue: SoundCue::TakeOver
        }));

        let again = t.state.army_move(1, 2, 1);
        assert_eq!(
            validate(&t.state, &again),
            Err(IllegalMove::ConqueredThisTurn(1).into())
        );
    }

    #[test]
    fn test_defended_attack_moves_nobody() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 1)
            .owner(1, 1)
            .soldiers(1, 3)
            .build();
        let mut mv = state.army_move(0, 1, 1);
        if let Move::Army(army) = &mut mv {
            army.rolls = Some(vec![200.0]);
        }
        let t = apply_ok(&state, &mv);
        // one defender killed, two remain, attack fails
        assert_eq!(t.state.soldier_count(1), 2);
        assert_eq!(t.state.soldier_count(0), 1);
        assert_eq!(t.state.owner(1), Some(1));
        assert_eq!(t.state.cash(1), MARTYR);
        assert!(t.hints.iter().any(|h| matches!(
            h,
            Hint::Text(FloatingText { text, .. }) if text == "Defended!"
        )));
        assert_eq!(t.fight.unwrap().rolls, vec![200.0]);
    }

    const MARTYR: u32 = crate::game::MARTYR_BONUS;

    #[test]
    fn test_earth_kills_before_fight() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 3)
            .owner(1, 1)
            .temple(1)
            .upgrade(1, Upgrade::Earth, 1)
            .soldiers(1, 1)
            .build();
        let mut mv = state.army_move(0, 1, 3);
        if let Move::Army(army) = &mut mv {
            army.rolls = Some(vec![500.0]);
        }
        let t = apply_ok(&state, &mv);
        let fight = t.fight.as_ref().unwrap();
        assert_eq!(fight.preemptive, 2);
        assert_eq!(fight.rounds, vec![RoundOutcome::DefenderLost]);
        assert_eq!(t.state.owner(1), Some(0));
        assert_eq!(t.state.soldier_count(1), 1);
        assert_eq!(t.state.soldier_count(0), 0);
        assert!(t.hints.iter().any(|h| matches!(
            h,
            Hint::Text(FloatingText { text, color, .. })
                if text == "Earth kills 2!" && color == Upgrade::Earth.color()
        )));
        assert!(t.hints.contains(&Hint::Sound {
            cue: SoundCue::Victory
        }));
    }

    #[test]
    fn test_short_fight_sequence_rejected() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 2)
            .owner(1, 1)
            .soldiers(1, 2)
            .build();
        let mut mv = state.army_move(0, 1, 2);
        if let Move::Army(army) = &mut mv {
            army.rolls = Some(vec![1.0]);
        }
        assert_eq!(
            apply(&state, &mv, &mut rng()).unwrap_err(),
            EngineError::ShortFightSequence {
                provided: 1,
                needed: 2
            }
        );
    }

    #[test]
    fn test_replayed_rolls_reproduce_fight() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 5)
            .owner(1, 1)
            .soldiers(1, 4)
            .build();
        let mv = state.army_move(0, 1, 5);
        let first = apply(&state, &mv, &mut StdRng::seed_from_u64(7)).unwrap();
        let rolls = first.fight.as_ref().unwrap().rolls.clone();

        let mut replay = mv.clone();
        if let Move::Army(army) = &mut replay {
            army.rolls = Some(rolls);
        }
        let second = apply(&state, &replay, &mut StdRng::seed_from_u64(1234)).unwrap();
        assert_eq!(first.state, second.state);
    }

    #[test]
    fn test_simulation_is_deterministic_and_silent() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 6)
            .owner(1, 1)
            .soldiers(1, 4)
            .build()
            .for_simulation();
        let mv = state.army_move(0, 1, 6);
        let a = apply(&state, &mv, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = apply(&state, &mv, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(a.state, b.state);
        assert_eq!(a.fight, b.fight);
        assert!(a.hints.is_empty());
        assert!(a.state.is_simulation());
    }

    #[test]
    fn test_build_soldier_escalates_cost() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .temple(0)
            .soldiers(0, 1)
            .cash(0, 30)
            .owner(1, 1)
            .soldiers(1, 1)
            .build();
        let t1 = apply_ok(&state, &state.build_move(0, Upgrade::Soldier));
        assert_eq!(t1.state.cash(0), 22);
        let t2 = apply_ok(&t1.state, &t1.state.build_move(0, Upgrade::Soldier));
        assert_eq!(t2.state.cash(0), 10);
        assert_eq!(t2.state.soldier_count(0), 3);
        assert_eq!(t2.state.turn().moves_remaining, 3);
        assert_eq!(
            validate(&t2.state, &t2.state.build_move(0, Upgrade::Soldier)),
            Err(IllegalMove::InsufficientFaith { cost: 16, cash: 10 }.into())
        );
    }

    #[test]
    fn test_build_levels_and_air_move() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .temple(0)
            .soldiers(0, 1)
            .cash(0, 100)
            .owner(1, 1)
            .soldiers(1, 1)
            .build();
        let t1 = apply_ok(&state, &state.build_move(0, Upgrade::Air));
        assert_eq!(t1.state.cash(0), 75);
        assert_eq!(t1.state.turn().moves_remaining, 4);
        let t2 = apply_ok(&t1.state, &t1.state.build_move(0, Upgrade::Air));
        assert_eq!(t2.state.cash(0), 40);
        assert_eq!(t2.state.temple(0).unwrap().level, 1);
        assert_eq!(t2.state.turn().moves_remaining, 5);
        assert_eq!(
            validate(&t2.state, &t2.state.build_move(0, Upgrade::Air)),
            Err(IllegalMove::MaxLevel(Upgrade::Air).into())
        );

        // switching kind starts over at level 0
        let t3 = apply_ok(&t2.state, &t2.state.build_move(0, Upgrade::Water));
        let temple = t3.state.temple(0).unwrap();
        assert_eq!(temple.upgrade, Some(Upgrade::Water));
        assert_eq!(temple.level, 0);
        assert_eq!(t3.state.cash(0), 25);

        let t4 = apply_ok(&t3.state, &t3.state.build_move(0, Upgrade::Rebirth));
        assert_eq!(t4.state.temple(0).unwrap().upgrade, None);
        assert_eq!(t4.state.cash(0), 25);
    }

    #[test]
    fn test_end_turn_income_and_spawn() {
        let state = StateBuilder::line(4)
            .owner(0, 0)
            .owner(1, 0)
            .owner(2, 0)
            .temple(0)
            .soldiers(0, 2)
            .owner(3, 1)
            .soldiers(3, 1)
            .build();
        let t = apply_ok(&state, &state.end_move());
        assert_eq!(t.state.cash(0), 5);
        assert_eq!(t.state.soldier_count(0), 3);
        assert_eq!(t.state.active_player(), 1);
        assert_eq!(t.state.turn().turn_index, 1);
        assert!(t.hints.contains(&Hint::TurnStarted {
            player: 1,
            turn_index: 1
        }));

        let t = apply_ok(&t.state, &t.state.end_move());
        assert_eq!(t.state.active_player(), 0);
        assert_eq!(t.state.turn().turn_index, 2);
    }

    #[test]
    fn test_end_turn_skips_players_without_regions() {
        let map = RegionGraph::from_edges(2, &[(0, 1)]).unwrap();
        let players = (0..3).map(|id| Player::new(id, Controller::Ai)).collect();
        let mut state = GameState::new(players, map, Rules::default());
        state.set_owner(0, Some(0));
        state.spawn_soldiers(0, 1);
        state.set_owner(1, Some(2));
        state.spawn_soldiers(1, 1);

        let t = apply_ok(&state, &state.end_move());
        assert_eq!(t.state.active_player(), 2);
    }

    #[test]
    fn test_turn_limit_ends_game() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 1)
            .owner(1, 1)
            .soldiers(1, 1)
            .turn(3, 1)
            .turn_limit(Some(3))
            .build();
        let t = apply_ok(&state, &state.end_move());
        assert_eq!(t.state.end_result(), Some(EndResult::Draw));
        assert_eq!(t.state.turn().turn_index, 3);
        assert_eq!(
            apply(&t.state, &t.state.end_move(), &mut rng()).unwrap_err(),
            EngineError::GameOver
        );
    }

    #[test]
    fn test_elimination_and_victory() {
        let state = StateBuilder::line(3)
            .owner(0, 0)
            .soldiers(0, 3)
            .owner(1, 1)
            .soldiers(1, 1)
            .owner(2, 1)
            .build();
        let mut mv = state.army_move(0, 1, 3);
        if let Move::Army(army) = &mut mv {
            army.rolls = Some(vec![1000.0]);
        }
        let t = apply_ok(&state, &mv);
        // player 1 lost its only soldiers; region 2 goes neutral
        assert_eq!(t.state.owner(2), None);
        assert_eq!(t.state.end_result(), Some(EndResult::Winner(0)));
        assert!(t.hints.contains(&Hint::Eliminated { player: 1 }));
    }

    #[test]
    fn test_active_player_eliminated_by_own_attack() {
        let state = StateBuilder::line(3)
            .players(3)
            .owner(0, 0)
            .soldiers(0, 1)
            .owner(1, 1)
            .soldiers(1, 1)
            .owner(2, 2)
            .soldiers(2, 1)
            .build();
        let mut mv = state.army_move(0, 1, 1);
        if let Move::Army(army) = &mut mv {
            army.rolls = Some(vec![0.0]);
        }
        let t = apply_ok(&state, &mv);

        assert_eq!(t.state.owner(0), None);
        assert_eq!(t.state.turn().moves_remaining, 0);
        assert!(!t.state.is_over());
        assert!(t.hints.contains(&Hint::Eliminated { player: 0 }));
        assert_eq!(t.state.legal_moves(), vec![t.state.end_move()]);

        let next = apply_ok(&t.state, &t.state.end_move()).state;
        assert_eq!(next.active_player(), 1);
        assert_eq!(next.turn().turn_index, 1);
    }

    #[test]
    fn test_stale_and_unknown_moves_rejected() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .soldiers(0, 2)
            .owner(1, 1)
            .soldiers(1, 1)
            .build();
        let old = state.army_move(0, 1, 1);
        let after = apply_ok(&state, &state.end_move()).state;
        assert!(matches!(
            validate(&after, &old),
            Err(EngineError::StaleMove { .. })
        ));
        assert_eq!(
            validate(&state, &state.army_move(0, 9, 1)),
            Err(EngineError::UnknownRegion(9))
        );
        assert_eq!(
            validate(&state, &state.build_move(0, Upgrade::Fire)),
            Err(EngineError::NoTemple(0))
        );
        assert_eq!(
            validate(&state, &state.army_move(0, 1, 3)),
            Err(IllegalMove::BadSoldierCount {
                requested: 3,
                available: 2
            }
            .into())
        );
    }
}
