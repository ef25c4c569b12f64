//! Recipe lookups and the per-tick team reward.

use crate::state::{Object, WorldState};

/// Reward-bearing events raised by the interaction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardEvent {
    IngredientPlaced,
    DishPickup,
    SoupDelivered { recipe: usize },
}

/// Cook time of the composition currently in `soup`.
pub fn cook_time(world: &WorldState, soup: &Object) -> u32 {
    world.recipes.cook_time(soup.recipe())
}

/// Adds the reward for `event` to the tick accumulator and returns it.
pub fn credit(world: &mut WorldState, event: RewardEvent) -> i64 {
    let amount = match event {
        RewardEvent::IngredientPlaced => world.shaping.placement_in_pot as i64,
        RewardEvent::DishPickup => world.shaping.dish_pickup as i64,
        RewardEvent::SoupDelivered { recipe } => {
            world.soups_served += 1;
            world.recipes.value(recipe) as i64 + world.shaping.soup_pickup as i64
        }
    };
    world.calculated_reward += amount;
    tracing::trace!("{:?} credited {}", event, amount);
    amount
}

/// Drains the accumulator into one shared reward per agent.
pub fn collect_team_reward(world: &mut WorldState) -> Vec<f32> {
    let total = std::mem::take(&mut world.calculated_reward);
    vec![total as f32; world.num_players()]
}
