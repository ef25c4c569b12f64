//! Seeded random rollouts over a [`BatchEnv`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::infra::{EpisodeObserver, ReplayFile};
use crate::sim::{Action, BatchEnv, BatchError, NUM_MOVES};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("replay: {0}")]
    Replay(#[from] std::io::Error),
}

/// One finished episode of one world
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    pub world_index: usize,
    pub episode: usize,
    pub ticks: u32,
    pub team_return: f32,
    pub soups_served: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub episodes: usize,
    pub ticks: u64,
    pub mean_return: f32,
    pub soups_served: u32,
}

/// Plays every agent with a uniform choice among its legal actions.
pub struct RolloutRunner {
    batch: BatchEnv,
    rng: StdRng,
    seed: u64,
    actions: Vec<i32>,
    tick: u64,
    returns: Vec<f32>,
    soups: Vec<u32>,
    ticks: Vec<u32>,
    episodes: Vec<usize>,
    finished: Vec<EpisodeStats>,
}

impl RolloutRunner {
    pub fn new(batch: BatchEnv, seed: u64) -> Self {
        let num_worlds = batch.num_worlds();
        let num_agents = num_worlds * batch.num_players();
        Self {
            batch,
            rng: StdRng::seed_from_u64(seed),
            seed,
            actions: vec![Action::Stay as i32; num_agents],
            tick: 0,
            returns: vec![0.0; num_worlds],
            soups: vec![0; num_worlds],
            ticks: vec![0; num_worlds],
            episodes: vec![0; num_worlds],
            finished: Vec::new(),
        }
    }

    fn sample_actions(&mut self) {
        let masks = self.batch.masks();
        for (action, mask) in self.actions.iter_mut().zip(masks.chunks(NUM_MOVES)) {
            let legal: Vec<Action> = Action::ALL
                .into_iter()
                .filter(|a| mask[a.code()])
                .collect();
            let choice = legal.choose(&mut self.rng).copied().unwrap_or_default();
            *action = choice as i32;
        }
    }

    /// Samples actions, steps the batch once and books finished episodes.
    pub fn step(
        &mut self,
        observer: &mut dyn EpisodeObserver,
        replay: Option<&mut ReplayFile>,
    ) -> Result<(), RunnerError> {
        self.sample_actions();
        self.batch.step(&self.actions)?;
        self.tick += 1;

        if let Some(replay) = replay {
            replay.append(self.tick, &self.actions, &self.batch)?;
        }

        let num_players = self.batch.num_players();
        for world_index in 0..self.batch.num_worlds() {
            // the reward is shared, agent 0 carries the team value
            self.returns[world_index] += self.batch.rewards()[world_index * num_players];
            self.soups[world_index] += self.batch.soups_served()[world_index];
            self.ticks[world_index] += 1;

            if self.batch.dones()[world_index] {
                let stats = EpisodeStats {
                    world_index,
                    episode: self.episodes[world_index],
                    ticks: std::mem::take(&mut self.ticks[world_index]),
                    team_return: std::mem::take(&mut self.returns[world_index]),
                    soups_served: std::mem::take(&mut self.soups[world_index]),
                };
                self.episodes[world_index] += 1;
                observer.on_episode_finished(&stats);
                self.finished.push(stats);
            }
        }

        observer.on_tick(self.tick, &self.batch);
        Ok(())
    }

    /// Steps until every world has finished `episodes` episodes.
    pub fn run(
        &mut self,
        layout: &str,
        episodes: usize,
        observer: &mut dyn EpisodeObserver,
        mut replay: Option<&mut ReplayFile>,
    ) -> Result<RunSummary, RunnerError> {
        observer.on_run_start(layout, &self.batch, self.seed);

        while self.episodes.iter().any(|&done| done < episodes) {
            self.step(observer, replay.as_deref_mut())?;
        }
        if let Some(replay) = replay {
            replay.flush()?;
        }

        let summary = self.summary();
        observer.on_run_finished(&summary);
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        let episodes = self.finished.len();
        let total: f32 = self.finished.iter().map(|s| s.team_return).sum();
        RunSummary {
            episodes,
            ticks: self.tick,
            mean_return: if episodes == 0 {
                0.0
            } else {
                total / episodes as f32
            },
            soups_served: self.finished.iter().map(|s| s.soups_served).sum(),
        }
    }

    pub fn finished(&self) -> &[EpisodeStats] {
        &self.finished
    }

    pub fn batch(&self) -> &BatchEnv {
        &self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutParams;
    use crate::layouts;

    #[derive(Default)]
    struct Recorder {
        ticks: u64,
        episodes: Vec<EpisodeStats>,
        summary: Option<RunSummary>,
    }

    impl EpisodeObserver for Recorder {
        fn on_run_start(&mut self, _layout: &str, _batch: &BatchEnv, _seed: u64) {}

        fn on_tick(&mut self, tick: u64, _batch: &BatchEnv) {
            self.ticks = tick;
        }

        fn on_episode_finished(&mut self, stats: &EpisodeStats) {
            self.episodes.push(stats.clone());
        }

        fn on_run_finished(&mut self, summary: &RunSummary) {
            self.summary = Some(summary.clone());
        }
    }

    fn runner(seed: u64, horizon: u32) -> RolloutRunner {
        let params = LayoutParams {
            horizon,
            ..layouts::default_params()
        };
        let config = layouts::named("cramped_room", &params).unwrap().unwrap();
        RolloutRunner::new(BatchEnv::uniform(&config, 3).unwrap(), seed)
    }

    #[test]
    fn test_run_finishes_requested_episodes() {
        let mut runner = runner(1, 25);
        let mut recorder = Recorder::default();
        let summary = runner.run("cramped_room", 2, &mut recorder, None).unwrap();

        assert_eq!(summary.episodes, 6);
        assert_eq!(summary.ticks, 50);
        assert_eq!(recorder.ticks, 50);
        assert_eq!(recorder.episodes.len(), 6);
        assert!(recorder.episodes.iter().all(|s| s.ticks == 25));
        assert_eq!(recorder.summary, Some(summary));
    }

    #[test]
    fn test_sampled_actions_respect_masks() {
        let mut runner = runner(3, 400);
        let mut recorder = Recorder::default();
        for _ in 0..50 {
            let masks = runner.batch().masks().to_vec();
            runner.step(&mut recorder, None).unwrap();
            for (code, mask) in runner.actions.iter().zip(masks.chunks(NUM_MOVES)) {
                assert!(mask[*code as usize]);
            }
        }
    }

    #[test]
    fn test_same_seed_same_rollout() {
        let mut a = runner(42, 30);
        let mut b = runner(42, 30);
        let mut recorder = Recorder::default();
        for _ in 0..60 {
            a.step(&mut recorder, None).unwrap();
            b.step(&mut recorder, None).unwrap();
            assert_eq!(a.actions, b.actions);
            assert_eq!(a.batch().observations(), b.batch().observations());
            assert_eq!(a.batch().rewards(), b.batch().rewards());
        }
        assert_eq!(a.finished(), b.finished());
    }
}
