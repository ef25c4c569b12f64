//! Per-agent action legality, computed from committed positions only.

use crate::state::WorldState;

use super::action::{Action, ActionMask, NUM_MOVES};

/// A move is legal when its destination is open floor inside the grid and
/// no other agent currently stands there. STAY and INTERACT always are.
pub fn action_mask(world: &WorldState, agent: usize) -> ActionMask {
    let mut mask = [true; NUM_MOVES];
    let Some(player) = world.players.get(agent) else {
        return mask;
    };

    for action in Action::ALL {
        if let Some(direction) = action.direction() {
            let target = player.position.step(direction);
            let blocked_by_agent = world
                .occupant(&target)
                .is_some_and(|other| other != agent);
            mask[action.code()] = world.grid.is_walkable(&target) && !blocked_by_agent;
        }
    }
    mask
}

#[tracing::instrument(level = "trace", skip(world))]
pub fn compute_masks(world: &WorldState) -> Vec<ActionMask> {
    (0..world.num_players())
        .map(|agent| action_mask(world, agent))
        .collect()
}

/// Swaps every action the mask forbids for STAY.
pub fn enforce_masks(actions: &mut [Action], masks: &[ActionMask]) {
    for (agent, (action, mask)) in actions.iter_mut().zip(masks).enumerate() {
        if !mask[action.code()] {
            tracing::trace!("agent {} chose masked action {:?}, using Stay", agent, action);
            *action = Action::Stay;
        }
    }
}
