//! Simultaneous movement: every agent proposes from the committed state,
//! then conflicts are settled in ascending agent id before anything commits.
//!
//! Conflict rules:
//! - two agents trading cells (a swap) both stay put
//! - a mover cannot enter a cell whose occupant is not leaving it
//! - several movers aiming at one cell: the lowest id gets it
//!
//! Blocked agents keep their position but still turn to their proposed
//! orientation. Rules are applied until nothing changes, since one blocked
//! agent can block the agent queued behind it.
//!
//! Moves the tick's action mask rejects never reach conflict resolution:
//! they are proposed as bump turns, so a masked move leaves the agent
//! exactly where STAY would.

use tracing::trace;

use crate::infra::Position;
use crate::state::WorldState;

use super::action::{Action, ActionMask};

/// Fills each agent's proposed position and orientation.
///
/// A directional action targets the neighbouring cell if its terrain is
/// walkable and `masks` allows the move; otherwise it only turns. `masks`
/// must come from this tick's committed positions.
#[tracing::instrument(level = "trace", skip(world, actions, masks))]
pub fn propose_moves(world: &mut WorldState, actions: &[Action], masks: &[ActionMask]) {
    let grid = &world.grid;
    for (agent, player) in world.players.iter_mut().enumerate() {
        let action = actions.get(agent).copied().unwrap_or_default();
        let allowed = masks.get(agent).is_none_or(|mask| mask[action.code()]);
        match action.direction() {
            Some(direction) => {
                let target = player.position.step(direction);
                if allowed && grid.is_walkable(&target) {
                    player.propose(target, direction);
                } else {
                    player.propose(player.position, direction);
                }
            }
            None => player.propose(player.position, player.orientation),
        }
    }
}

/// Settles conflicts among the proposals and commits the outcome.
#[tracing::instrument(level = "trace", skip(world))]
pub fn commit_moves(world: &mut WorldState) {
    let current: Vec<Position> = world.players.iter().map(|p| p.position).collect();
    let proposed: Vec<Position> = world.players.iter().map(|p| p.proposed_position).collect();
    let allowed = resolve_conflicts(&current, &proposed);

    for (player, allowed) in world.players.iter_mut().zip(allowed) {
        if allowed {
            player.commit_position_and_orientation();
        } else {
            player.commit_orientation();
        }
    }
}

/// Returns, per agent, whether its proposed move may be committed.
/// Agents that are not moving are reported as `false`.
pub fn resolve_conflicts(current: &[Position], proposed: &[Position]) -> Vec<bool> {
    let n = current.len();
    let mut moving: Vec<bool> = current
        .iter()
        .zip(proposed)
        .map(|(from, to)| from != to)
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            if moving[i] && moving[j] && proposed[i] == current[j] && proposed[j] == current[i] {
                trace!("agents {} and {} tried to swap cells, both blocked", i, j);
                moving[i] = false;
                moving[j] = false;
            }
        }
    }

    loop {
        let mut changed = false;

        for i in 0..n {
            if moving[i] && (0..n).any(|j| j != i && !moving[j] && current[j] == proposed[i]) {
                trace!("agent {} blocked by a stationary agent at {:?}", i, proposed[i]);
                moving[i] = false;
                changed = true;
            }
        }
        if changed {
            continue;
        }

        for i in 0..n {
            if moving[i] && (0..i).any(|j| moving[j] && proposed[j] == proposed[i]) {
                trace!("agent {} lost {:?} to a lower id", i, proposed[i]);
                moving[i] = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    moving
}
