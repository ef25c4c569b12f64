mod grid;
mod object;
mod player_state;
mod recipes;
mod world_state;

pub use grid::{Grid, MAX_SIZE, Terrain};
pub use object::{NOT_COOKING, Object, ObjectKind, PotState};
pub use player_state::PlayerState;
pub use recipes::{MAX_NUM_INGREDIENTS, NUM_RECIPES, RecipeBook, recipe_index};
pub use world_state::{ShapingRewards, WorldState};
