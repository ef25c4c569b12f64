mod default_observer;
mod episode_observer;
mod replay;
mod types;

pub use default_observer::DefaultObserver;
pub use episode_observer::EpisodeObserver;
pub use replay::ReplayFile;
pub use types::{Direction, Position};
