#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shrinewar::game::{Move, apply, check_invariants};
use shrinewar::setup::{GameSetup, make_initial_state};

/// Structured input for engine fuzzing.
#[derive(Arbitrary, Debug)]
struct MovesInput {
    /// Game seed.
    seed: u64,
    /// Players, mapped into 2..=4.
    players: u8,
    /// Raw JSON fed to the decoder before play starts.
    json: String,
    /// Index into the legal move list, one per step.
    choices: Vec<u16>,
    /// Whether to play in simulation mode.
    simulate: bool,
}

fuzz_target!(|input: MovesInput| {
    let players = 2 + usize::from(input.players % 3);
    let mut rng = StdRng::seed_from_u64(input.seed);
    let Ok(mut state) = make_initial_state(&GameSetup::all_ai(players), &mut rng) else {
        return;
    };
    if input.simulate {
        state = state.for_simulation();
    }

    // arbitrary JSON may decode into anything; the engine must reject it cleanly
    if let Ok(mv) = Move::from_json(&input.json) {
        if let Ok(transition) = apply(&state, &mv, &mut rng) {
            assert!(check_invariants(&transition.state).is_empty());
        }
    }

    for choice in input.choices.iter().take(500) {
        let moves = state.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = &moves[usize::from(*choice) % moves.len()];
        let transition = apply(&state, mv, &mut rng).expect("legal move rejected");
        assert!(check_invariants(&transition.state).is_empty());
        if input.simulate {
            assert!(transition.hints.is_empty());
        }
        state = transition.state;
    }
});
