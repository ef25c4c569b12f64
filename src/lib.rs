pub mod config;
pub mod infra;
pub mod layouts;
pub mod runner;
pub mod sim;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, LayoutParams, Order};
pub use infra::{Direction, Position};
pub use sim::{Action, BatchEnv, BatchError, CookingEnv, StepResult};
pub use state::WorldState;
