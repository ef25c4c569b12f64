//! Many worlds stepped in lockstep.
//!
//! Every stage of the tick runs across all worlds in parallel before the
//! next stage starts. Worlds share nothing, so the order in which rayon
//! visits them never changes the outcome.

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ConfigError};

use super::action::NUM_MOVES;
use super::env::CookingEnv;
use super::schedule::TickSchedule;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("a batch needs at least one world")]
    Empty,

    #[error("world {world_index}: {source}")]
    World {
        world_index: usize,
        #[source]
        source: ConfigError,
    },

    #[error(
        "world {world_index} has {players} players and observation size {obs_size}, \
         world 0 has {expected_players} and {expected_obs_size}"
    )]
    ShapeMismatch {
        world_index: usize,
        players: usize,
        obs_size: usize,
        expected_players: usize,
        expected_obs_size: usize,
    },

    #[error("world index {world_index} out of range ({num_worlds} worlds)")]
    InvalidIndex {
        world_index: usize,
        num_worlds: usize,
    },

    #[error("expected {expected} action codes, got {actual}")]
    ActionCount { expected: usize, actual: usize },
}

pub struct BatchEnv {
    envs: Vec<CookingEnv>,
    schedule: TickSchedule,
    num_players: usize,
    obs_size: usize,
    /// [world][agent][obs_size]
    observations: Vec<i32>,
    /// [world][agent][NUM_MOVES]
    masks: Vec<bool>,
    /// [world][agent]
    rewards: Vec<f32>,
    /// [world]
    dones: Vec<bool>,
    /// [world]
    soups_served: Vec<u32>,
}

impl BatchEnv {
    /// Builds one world per config. All worlds must share agent count and
    /// grid size so the output buffers stay rectangular.
    pub fn new(configs: &[Config]) -> Result<Self, BatchError> {
        if configs.is_empty() {
            return Err(BatchError::Empty);
        }

        let envs = configs
            .iter()
            .enumerate()
            .map(|(world_index, config)| {
                CookingEnv::new(config).map_err(|source| BatchError::World {
                    world_index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let num_players = envs[0].num_players();
        let obs_size = envs[0].obs_size();
        for (world_index, env) in envs.iter().enumerate().skip(1) {
            if env.num_players() != num_players || env.obs_size() != obs_size {
                return Err(BatchError::ShapeMismatch {
                    world_index,
                    players: env.num_players(),
                    obs_size: env.obs_size(),
                    expected_players: num_players,
                    expected_obs_size: obs_size,
                });
            }
        }

        let num_worlds = envs.len();
        let mut batch = Self {
            envs,
            schedule: TickSchedule::standard(),
            num_players,
            obs_size,
            observations: vec![0; num_worlds * num_players * obs_size],
            masks: vec![false; num_worlds * num_players * NUM_MOVES],
            rewards: vec![0.0; num_worlds * num_players],
            dones: vec![false; num_worlds],
            soups_served: vec![0; num_worlds],
        };
        batch.gather();
        debug!(
            "batch of {} worlds, {} players, observation size {}",
            num_worlds, num_players, obs_size
        );
        Ok(batch)
    }

    /// `num_worlds` copies of the same world.
    pub fn uniform(config: &Config, num_worlds: usize) -> Result<Self, BatchError> {
        Self::new(&vec![config.clone(); num_worlds])
    }

    /// Runs one tick in every world. `actions` is flattened [world][agent].
    pub fn step(&mut self, actions: &[i32]) -> Result<(), BatchError> {
        let expected = self.envs.len() * self.num_players;
        if actions.len() != expected {
            return Err(BatchError::ActionCount {
                expected,
                actual: actions.len(),
            });
        }

        self.envs
            .par_iter_mut()
            .zip(actions.par_chunks(self.num_players))
            .for_each(|(env, codes)| env.set_actions(codes));

        for &stage in self.schedule.stages() {
            self.envs
                .par_iter_mut()
                .for_each(|env| env.run_stage(stage));
        }

        self.gather();
        Ok(())
    }

    /// Flags a world to reset at its next reset check.
    pub fn request_reset(&mut self, world_index: usize) -> Result<(), BatchError> {
        let num_worlds = self.envs.len();
        let env = self
            .envs
            .get_mut(world_index)
            .ok_or(BatchError::InvalidIndex {
                world_index,
                num_worlds,
            })?;
        env.request_reset();
        Ok(())
    }

    pub fn reset_all(&mut self) {
        self.envs.par_iter_mut().for_each(|env| {
            env.reset();
        });
        self.gather();
    }

    fn gather(&mut self) {
        let per_world_obs = self.num_players * self.obs_size;
        let per_world_masks = self.num_players * NUM_MOVES;
        let num_players = self.num_players;
        let envs = &self.envs;

        self.observations
            .par_chunks_mut(per_world_obs)
            .zip(envs.par_iter())
            .for_each(|(out, env)| out.copy_from_slice(env.observations()));

        self.masks
            .par_chunks_mut(per_world_masks)
            .zip(envs.par_iter())
            .for_each(|(out, env)| {
                for (slot, mask) in out.chunks_mut(NUM_MOVES).zip(env.masks()) {
                    slot.copy_from_slice(mask);
                }
            });

        self.rewards
            .par_chunks_mut(num_players)
            .zip(envs.par_iter())
            .for_each(|(out, env)| out.copy_from_slice(env.rewards()));

        for (world_index, env) in envs.iter().enumerate() {
            self.dones[world_index] = env.done();
            self.soups_served[world_index] = env.soups_served();
        }
    }

    pub fn num_worlds(&self) -> usize {
        self.envs.len()
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn obs_size(&self) -> usize {
        self.obs_size
    }

    pub fn observations(&self) -> &[i32] {
        &self.observations
    }

    pub fn masks(&self) -> &[bool] {
        &self.masks
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn dones(&self) -> &[bool] {
        &self.dones
    }

    pub fn soups_served(&self) -> &[u32] {
        &self.soups_served
    }

    pub fn env(&self, world_index: usize) -> Option<&CookingEnv> {
        self.envs.get(world_index)
    }

    pub fn envs(&self) -> &[CookingEnv] {
        &self.envs
    }
}
