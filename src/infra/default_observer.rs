use std::io::{self, Write};

use tracing::{debug, info};

use crate::infra::EpisodeObserver;
use crate::runner::{EpisodeStats, RunSummary};
use crate::sim::BatchEnv;

/// Logs run progress. With `show_map` set, prints world 0 after every tick.
#[derive(Debug, Default)]
pub struct DefaultObserver {
    pub show_map: bool,
}

impl DefaultObserver {
    pub fn new(show_map: bool) -> Self {
        Self { show_map }
    }
}

impl EpisodeObserver for DefaultObserver {
    fn on_run_start(&mut self, layout: &str, batch: &BatchEnv, seed: u64) {
        info!("Run on {} started", layout);
        info!("- worlds: {}", batch.num_worlds());
        info!("- players per world: {}", batch.num_players());
        info!("- observation size: {}", batch.obs_size());
        info!("- seed: {}", seed);
    }

    fn on_tick(&mut self, tick: u64, batch: &BatchEnv) {
        if !self.show_map {
            return;
        }
        let Some(env) = batch.env(0) else {
            return;
        };
        let world = env.world();
        debug!(
            "tick: {}, timestep: {}, reward: {}",
            tick,
            world.timestep,
            env.rewards().first().copied().unwrap_or_default()
        );
        let _ = writeln!(io::stdout(), "{}", world.draw_ascii_map());
    }

    fn on_episode_finished(&mut self, stats: &EpisodeStats) {
        info!(
            "world {} episode {}: return {}, soups served {}, ticks {}",
            stats.world_index, stats.episode, stats.team_return, stats.soups_served, stats.ticks
        );
    }

    fn on_run_finished(&mut self, summary: &RunSummary) {
        info!("Run finished after {} ticks", summary.ticks);
        info!("- episodes: {}", summary.episodes);
        info!("- mean return: {:.2}", summary.mean_return);
        info!("- soups served: {}", summary.soups_served);
    }
}
