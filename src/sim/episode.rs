//! Episode clock and reset handling.

use tracing::debug;

use crate::state::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    Horizon,
    Requested,
}

/// Advances the timestep and, when the episode is over, resets the world.
///
/// `Some` marks the tick on which the episode went reset-pending; the world
/// is already running the fresh episode when this returns.
#[tracing::instrument(level = "trace", skip(world))]
pub fn advance_episode(world: &mut WorldState) -> Option<ResetReason> {
    world.timestep = world.timestep.saturating_add(1);

    let reason = if world.timestep >= world.horizon {
        ResetReason::Horizon
    } else if world.reset_requested {
        ResetReason::Requested
    } else {
        return None;
    };

    debug!("episode ended at timestep {} ({:?}), resetting", world.timestep, reason);
    world.reset();
    Some(reason)
}
