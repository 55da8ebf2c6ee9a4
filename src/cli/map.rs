//! Map command implementation.

use super::{CliError, resolve_seed};
use rand::SeedableRng;
use rand::rngs::StdRng;
use shrinewar::make_initial_state;
use shrinewar::render::{render_map, render_region_ids};
use shrinewar::setup::GameSetup;

/// Execute the map command.
///
/// # Errors
///
/// Returns an error if the player count is unsupported or generation fails.
pub(crate) fn execute(players: usize, seed: Option<u64>, ids: bool) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let state = make_initial_state(&GameSetup::all_ai(players), &mut rng)?;

    let picture = if ids {
        render_region_ids(&state)
    } else {
        render_map(&state)
    };
    let picture = picture.ok_or_else(|| CliError::new("generated map has no cell grid"))?;

    println!("Seed {seed}: {} regions for {players} players", state.map().len());
    print!("{picture}");
    for region in state.map().regions() {
        println!("  region {:>2} borders {:?}", region.id, region.neighbors);
    }
    Ok(())
}
