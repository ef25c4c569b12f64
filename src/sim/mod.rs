//! Per-tick transition engine.
//!
//! Stages run in the order given by [`TickSchedule`]; each one is a plain
//! function over a [`crate::state::WorldState`] so a batch can run any
//! stage across all worlds before moving on.

mod action;
mod action_mask;
mod batch;
mod cooking;
mod env;
mod episode;
mod interaction;
mod movement;
mod observation;
mod reward;
mod schedule;

pub use action::{Action, ActionMask, NUM_MOVES};
pub use action_mask::{action_mask, compute_masks, enforce_masks};
pub use batch::{BatchEnv, BatchError};
pub use cooking::advance_pots;
pub use env::{CookingEnv, StepResult};
pub use episode::{ResetReason, advance_episode};
pub use interaction::{Interaction, interact, resolve_interactions};
pub use movement::{commit_moves, propose_moves, resolve_conflicts};
pub use observation::{EncoderConfig, StateEncoder, URGENCY_WINDOW};
pub use reward::{RewardEvent, collect_team_reward, cook_time, credit};
pub use schedule::{Stage, TickSchedule};
