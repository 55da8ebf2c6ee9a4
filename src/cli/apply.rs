//! Apply command implementation.

use super::CliError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shrinewar::game::{Move, apply};
use shrinewar::render::render_summary;
use shrinewar::setup::{GameSetup, make_initial_state};
use std::fs;
use std::path::Path;

/// Execute the apply command.
///
/// Fights without recorded rolls draw from the seeded random source, so
/// only moves carrying their rolls reproduce an earlier game exactly.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a move is rejected.
pub(crate) fn execute(setup: &GameSetup, seed: u64, moves: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(moves)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", moves.display())))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = make_initial_state(setup, &mut rng)?;

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mv = Move::from_json(line)
            .map_err(|e| CliError::new(format!("line {}: {e}", number + 1)))?;
        let transition = apply(&state, &mv, &mut rng)
            .map_err(|e| CliError::new(format!("line {}: {e}", number + 1)))?;
        if let Some(fight) = &transition.fight {
            println!(
                "line {}: fight, {} attackers and {} defenders lost",
                number + 1,
                fight.attackers_lost,
                fight.defenders_lost
            );
        }
        state = transition.state;
    }

    print!("{}", render_summary(&state));
    Ok(())
}
