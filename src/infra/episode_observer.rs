use crate::runner::{EpisodeStats, RunSummary};
use crate::sim::BatchEnv;

/// Trait for observing a rollout run
pub trait EpisodeObserver {
    /// Called once before the first tick
    fn on_run_start(&mut self, layout: &str, batch: &BatchEnv, seed: u64);

    /// Called after every tick of the batch
    fn on_tick(&mut self, tick: u64, batch: &BatchEnv);

    /// Called whenever a world finishes an episode
    fn on_episode_finished(&mut self, stats: &EpisodeStats);

    /// Called when the run is over
    fn on_run_finished(&mut self, summary: &RunSummary);
}
