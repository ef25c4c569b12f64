//! INTERACT against the faced cell, after movement has committed.
//!
//! Agents are processed in ascending id and each sees the cell changes made
//! by lower ids earlier in the same pass, so two agents can never both take
//! the same counter item or soup.

use tracing::{trace, warn};

use crate::state::{MAX_NUM_INGREDIENTS, Object, ObjectKind, PotState, Terrain, WorldState};

use super::action::Action;
use super::reward::{self, RewardEvent};

/// What an interaction did, mostly for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    PickedFromSource(ObjectKind),
    PlacedIngredient { started_cooking: bool },
    StartedCooking,
    PickedUpSoup,
    PickedFromCounter,
    PlacedOnCounter,
    Served,
    Nothing,
}

#[tracing::instrument(level = "trace", skip(world, actions))]
pub fn resolve_interactions(world: &mut WorldState, actions: &[Action]) {
    for agent in 0..world.num_players() {
        if actions.get(agent) == Some(&Action::Interact) {
            let outcome = interact(world, agent);
            if outcome != Interaction::Nothing {
                trace!("agent {} interaction: {:?}", agent, outcome);
            }
        }
    }
}

/// Applies one agent's INTERACT.
pub fn interact(world: &mut WorldState, agent: usize) -> Interaction {
    let target = world.players[agent].facing();
    let Some(cell) = world.grid.index(&target) else {
        return Interaction::Nothing;
    };
    let holding = world.players[agent].held_object;

    match world.grid.terrain_at(cell) {
        Terrain::OnionSource => pick_from_source(world, agent, ObjectKind::Onion),
        Terrain::TomatoSource => pick_from_source(world, agent, ObjectKind::Tomato),
        Terrain::DishSource => pick_from_source(world, agent, ObjectKind::Dish),
        Terrain::Pot => interact_with_pot(world, agent, cell, holding),
        Terrain::Counter => {
            let on_counter = world.objects[cell];
            match (holding.is_none(), on_counter.is_none()) {
                (true, false) => {
                    let item = world.objects[cell].take();
                    world.players[agent].set_object(item);
                    Interaction::PickedFromCounter
                }
                (false, true) => {
                    world.objects[cell] = world.players[agent].remove_object();
                    Interaction::PlacedOnCounter
                }
                _ => Interaction::Nothing,
            }
        }
        Terrain::Serving if holding.kind == ObjectKind::Soup => {
            let soup = world.players[agent].remove_object();
            reward::credit(
                world,
                RewardEvent::SoupDelivered {
                    recipe: soup.recipe(),
                },
            );
            Interaction::Served
        }
        Terrain::Serving | Terrain::Air => Interaction::Nothing,
    }
}

fn pick_from_source(world: &mut WorldState, agent: usize, kind: ObjectKind) -> Interaction {
    let player = &mut world.players[agent];
    if player.has_object() {
        return Interaction::Nothing;
    }
    player.set_object(Object::of_kind(kind));
    Interaction::PickedFromSource(kind)
}

fn interact_with_pot(
    world: &mut WorldState,
    agent: usize,
    cell: usize,
    holding: Object,
) -> Interaction {
    let state = PotState::of(&world.objects[cell]);

    if holding.is_ingredient() {
        if !state.accepts_ingredients() {
            return Interaction::Nothing;
        }
        if !world.objects[cell].add_ingredient(holding.kind) {
            warn!("pot at cell {} is over capacity, dropping interaction", cell);
            return Interaction::Nothing;
        }
        world.players[agent].remove_object();
        reward::credit(world, RewardEvent::IngredientPlaced);

        let full = world.objects[cell].num_ingredients() == MAX_NUM_INGREDIENTS;
        if full {
            start_cooking(world, cell);
        }
        return Interaction::PlacedIngredient {
            started_cooking: full,
        };
    }

    match (holding.kind, state) {
        (ObjectKind::None, PotState::Filling) => {
            start_cooking(world, cell);
            Interaction::StartedCooking
        }
        (ObjectKind::Dish, PotState::Ready) => {
            let contents = world.objects[cell].take();
            world.players[agent].set_object(Object::soup(
                contents.num_onions,
                contents.num_tomatoes,
                0,
            ));
            reward::credit(world, RewardEvent::DishPickup);
            Interaction::PickedUpSoup
        }
        _ => Interaction::Nothing,
    }
}

fn start_cooking(world: &mut WorldState, cell: usize) {
    let time = reward::cook_time(world, &world.objects[cell]);
    let pot = &mut world.objects[cell];
    pot.cooking_tick = i32::try_from(time).unwrap_or(i32::MAX);
    trace!(
        "pot at cell {} cooking {} onions, {} tomatoes for {} ticks",
        cell, pot.num_onions, pot.num_tomatoes, time
    );
}
