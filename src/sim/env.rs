//! Single-world environment: one [`WorldState`] plus its per-tick buffers.

use tracing::warn;

use crate::config::{Config, ConfigError};
use crate::state::WorldState;

use super::action::{Action, ActionMask};
use super::action_mask::{compute_masks, enforce_masks};
use super::cooking::advance_pots;
use super::episode::{ResetReason, advance_episode};
use super::interaction::resolve_interactions;
use super::movement::{commit_moves, propose_moves};
use super::observation::{EncoderConfig, StateEncoder};
use super::reward::collect_team_reward;
use super::schedule::{Stage, TickSchedule};

/// Outputs of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Per-agent observations [num_players][obs_size]
    pub observations: Vec<Vec<i32>>,
    pub masks: Vec<ActionMask>,
    /// Shared team reward, repeated per agent
    pub rewards: Vec<f32>,
    pub done: bool,
    pub soups_served: u32,
    pub reset_reason: Option<ResetReason>,
}

pub struct CookingEnv {
    world: WorldState,
    encoder: StateEncoder,
    actions: Vec<Action>,
    masks: Vec<ActionMask>,
    /// Flattened [num_players][obs_size]
    observations: Vec<i32>,
    rewards: Vec<f32>,
    done: bool,
    soups_served: u32,
    reset_reason: Option<ResetReason>,
}

impl CookingEnv {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_encoder(config, EncoderConfig::default())
    }

    pub fn with_encoder(config: &Config, encoder_config: EncoderConfig) -> Result<Self, ConfigError> {
        let world = WorldState::new(config)?;
        let encoder = StateEncoder::new(encoder_config);
        let num_players = world.num_players();
        let obs_size = encoder.obs_size(&world);

        let mut env = Self {
            world,
            encoder,
            actions: vec![Action::Stay; num_players],
            masks: Vec::with_capacity(num_players),
            observations: vec![0; num_players * obs_size],
            rewards: vec![0.0; num_players],
            done: false,
            soups_served: 0,
            reset_reason: None,
        };
        env.observe();
        Ok(env)
    }

    /// Decodes one action code per agent. Missing agents stay put.
    pub fn set_actions(&mut self, codes: &[i32]) {
        let num_players = self.num_players();
        if codes.len() > num_players {
            warn!(
                "{} action codes for {} agents, ignoring the rest",
                codes.len(),
                num_players
            );
        }
        for (agent, action) in self.actions.iter_mut().enumerate() {
            *action = codes.get(agent).map_or(Action::Stay, |&c| Action::from_code(c));
        }
    }

    pub fn run_stage(&mut self, stage: Stage) {
        match stage {
            Stage::Mask => {
                self.masks = compute_masks(&self.world);
                if self.world.enforce_action_mask {
                    enforce_masks(&mut self.actions, &self.masks);
                }
            }
            Stage::Propose => propose_moves(&mut self.world, &self.actions, &self.masks),
            Stage::Commit => commit_moves(&mut self.world),
            Stage::Interact => resolve_interactions(&mut self.world, &self.actions),
            Stage::Cook => advance_pots(&mut self.world),
            Stage::Reward => {
                self.rewards = collect_team_reward(&mut self.world);
                self.soups_served = std::mem::take(&mut self.world.soups_served);
            }
            Stage::Observe => self.observe(),
            Stage::ResetCheck => {
                self.reset_reason = advance_episode(&mut self.world);
                self.done = self.reset_reason.is_some();
                if self.done {
                    self.observe();
                }
            }
        }
    }

    /// Runs one full tick with the given action codes.
    pub fn step(&mut self, codes: &[i32]) -> StepResult {
        self.set_actions(codes);
        for &stage in TickSchedule::standard().stages() {
            self.run_stage(stage);
        }
        self.result()
    }

    /// Starts a fresh episode immediately.
    pub fn reset(&mut self) -> StepResult {
        self.world.reset();
        self.rewards.fill(0.0);
        self.done = false;
        self.soups_served = 0;
        self.reset_reason = None;
        self.observe();
        self.result()
    }

    /// Ends the episode at the next reset check.
    pub fn request_reset(&mut self) {
        self.world.reset_requested = true;
    }

    fn observe(&mut self) {
        self.masks = compute_masks(&self.world);
        let obs_size = self.obs_size();
        for (agent, out) in self.observations.chunks_mut(obs_size).enumerate() {
            self.encoder.encode_into(&self.world, agent, out);
        }
    }

    pub fn result(&self) -> StepResult {
        StepResult {
            observations: self
                .observations
                .chunks(self.obs_size())
                .map(<[i32]>::to_vec)
                .collect(),
            masks: self.masks.clone(),
            rewards: self.rewards.clone(),
            done: self.done,
            soups_served: self.soups_served,
            reset_reason: self.reset_reason,
        }
    }

    pub fn num_players(&self) -> usize {
        self.world.num_players()
    }

    pub fn obs_size(&self) -> usize {
        self.encoder.obs_size(&self.world)
    }

    pub fn observations(&self) -> &[i32] {
        &self.observations
    }

    pub fn observation(&self, agent: usize) -> &[i32] {
        let size = self.obs_size();
        &self.observations[agent * size..(agent + 1) * size]
    }

    pub fn masks(&self) -> &[ActionMask] {
        &self.masks
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn soups_served(&self) -> u32 {
        self.soups_served
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }
}
