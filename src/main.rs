use std::env;

use cookgrid::infra::{DefaultObserver, ReplayFile};
use cookgrid::runner::RolloutRunner;
use cookgrid::{BatchEnv, layouts};
use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn get_env_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cookgrid=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let layout = env::var("COOKGRID_LAYOUT").unwrap_or_else(|_| "cramped_room".to_string());
    let num_worlds = get_env_var::<usize>("COOKGRID_WORLDS").unwrap_or(8);
    let episodes = get_env_var::<usize>("COOKGRID_EPISODES").unwrap_or(1);
    let seed = get_env_var::<u64>("COOKGRID_SEED").unwrap_or(0);
    let replays_folder = env::var("COOKGRID_REPLAYS_FOLDER").ok();
    let show_map = get_env_var::<bool>("COOKGRID_SHOW_MAP").unwrap_or(false);

    let mut params = layouts::default_params();
    if let Some(horizon) = get_env_var::<u32>("COOKGRID_HORIZON") {
        params.horizon = horizon;
    }

    let config = layouts::named(&layout, &params).ok_or_else(|| {
        format!(
            "unknown layout {:?}, expected one of {}",
            layout,
            layouts::NAMES.join(", ")
        )
    })??;

    let batch = BatchEnv::uniform(&config, num_worlds)?;
    let mut replay_file = replays_folder
        .map(|folder| ReplayFile::new(&folder, &layout, seed))
        .transpose()?;
    if let Some(replay) = &replay_file {
        tracing::info!("Writing replay to {}", replay.path().display());
    }

    let mut runner = RolloutRunner::new(batch, seed);
    let mut observer = DefaultObserver::new(show_map);
    runner.run(&layout, episodes, &mut observer, replay_file.as_mut())?;

    Ok(())
}
