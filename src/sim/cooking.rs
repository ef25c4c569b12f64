//! Pot clock. Runs every tick whether or not anyone touches the pots.

use crate::state::{PotState, WorldState};

/// Counts every cooking pot down by one tick. Pots reaching zero are ready.
#[tracing::instrument(level = "trace", skip(world))]
pub fn advance_pots(world: &mut WorldState) {
    for &loc in world.grid.pot_locs() {
        let pot = &mut world.objects[loc];
        if let PotState::Cooking { remaining } = PotState::of(pot) {
            pot.cooking_tick = remaining - 1;
            if pot.cooking_tick == 0 {
                tracing::trace!("soup ready in pot at cell {}", loc);
            }
        }
    }
}
