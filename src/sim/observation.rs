//! Lossless per-cell observation planes.
//!
//! The vector is cell-major: slot `cell * channels + channel` with
//! `cell = y * width + x`. Positions are absolute; player planes are ordered
//! ego first, then the other agents in ascending id.
//!
//! ```text
//! channel                                    count
//! player location                            P
//! player orientation (N, S, E, W)            4P
//! pot, counter, onion/tomato/dish source,    6
//!   serving
//! onions/tomatoes in filling pot             2
//! onions/tomatoes in soup                    2
//! soup cook time remaining, soup done        2
//! dishes, onions, tomatoes                   3
//! urgency                                    1
//! ```

use crate::infra::Position;
use crate::state::{Object, ObjectKind, PotState, Terrain, WorldState};

/// Urgency plane lights up when fewer ticks than this remain.
pub const URGENCY_WINDOW: u32 = 40;

const TERRAIN_PLANES: usize = 6;
const OBJECT_PLANES: usize = 9;

mod object_plane {
    pub const ONIONS_IN_POT: usize = 0;
    pub const TOMATOES_IN_POT: usize = 1;
    pub const ONIONS_IN_SOUP: usize = 2;
    pub const TOMATOES_IN_SOUP: usize = 3;
    pub const COOK_TIME_REMAINING: usize = 4;
    pub const SOUP_DONE: usize = 5;
    pub const DISHES: usize = 6;
    pub const ONIONS: usize = 7;
    pub const TOMATOES: usize = 8;
}

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub urgency_window: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            urgency_window: URGENCY_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateEncoder {
    config: EncoderConfig,
}

impl StateEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn channels(num_players: usize) -> usize {
        5 * num_players + TERRAIN_PLANES + OBJECT_PLANES + 1
    }

    pub fn obs_size(&self, world: &WorldState) -> usize {
        world.grid.size() * Self::channels(world.num_players())
    }

    pub fn encode(&self, world: &WorldState, agent: usize) -> Vec<i32> {
        let mut obs = vec![0; self.obs_size(world)];
        self.encode_into(world, agent, &mut obs);
        obs
    }

    /// Overwrites `out`, which must hold exactly `obs_size` slots.
    pub fn encode_into(&self, world: &WorldState, agent: usize, out: &mut [i32]) {
        out.fill(0);
        let num_players = world.num_players();
        let channels = Self::channels(num_players);
        let terrain_base = 5 * num_players;
        let object_base = terrain_base + TERRAIN_PLANES;
        let urgency = object_base + OBJECT_PLANES;

        let mut set = |pos: &Position, channel: usize, value: i32| {
            if let Some(cell) = world.grid.index(pos) {
                out[cell * channels + channel] = value;
            }
        };

        for (rank, id) in ego_order(agent, num_players).enumerate() {
            let player = &world.players[id];
            set(&player.position, rank, 1);
            set(
                &player.position,
                num_players + 4 * rank + player.orientation.index(),
                1,
            );
        }

        for (cell, terrain) in world.grid.iter() {
            let pos = world.grid.position(cell);
            let plane = match terrain {
                Terrain::Air => None,
                Terrain::Pot => Some(0),
                Terrain::Counter => Some(1),
                Terrain::OnionSource => Some(2),
                Terrain::TomatoSource => Some(3),
                Terrain::DishSource => Some(4),
                Terrain::Serving => Some(5),
            };
            if let Some(plane) = plane {
                set(&pos, terrain_base + plane, 1);
            }

            let object = &world.objects[cell];
            if !object.is_none() {
                for (plane, value) in object_features(object, terrain == Terrain::Pot) {
                    set(&pos, object_base + plane, value);
                }
            }
        }

        for player in &world.players {
            if player.has_object() {
                for (plane, value) in object_features(&player.held_object, false) {
                    set(&player.position, object_base + plane, value);
                }
            }
        }

        if world.horizon.saturating_sub(world.timestep) < self.config.urgency_window {
            for cell in 0..world.grid.size() {
                out[cell * channels + urgency] = 1;
            }
        }
    }
}

/// Agent ids in observation order for `agent`.
fn ego_order(agent: usize, num_players: usize) -> impl Iterator<Item = usize> {
    std::iter::once(agent).chain((0..num_players).filter(move |&id| id != agent))
}

/// Non-zero object planes for one object.
fn object_features(object: &Object, in_pot: bool) -> Vec<(usize, i32)> {
    use object_plane::*;

    match object.kind {
        ObjectKind::None => Vec::new(),
        ObjectKind::Dish => vec![(DISHES, 1)],
        ObjectKind::Onion => vec![(ONIONS, 1)],
        ObjectKind::Tomato => vec![(TOMATOES, 1)],
        ObjectKind::Soup if in_pot => match PotState::of(object) {
            PotState::Empty => Vec::new(),
            PotState::Filling => vec![
                (ONIONS_IN_POT, object.num_onions as i32),
                (TOMATOES_IN_POT, object.num_tomatoes as i32),
            ],
            PotState::Cooking { remaining } => vec![
                (ONIONS_IN_SOUP, object.num_onions as i32),
                (TOMATOES_IN_SOUP, object.num_tomatoes as i32),
                (COOK_TIME_REMAINING, remaining),
            ],
            PotState::Ready => vec![
                (ONIONS_IN_SOUP, object.num_onions as i32),
                (TOMATOES_IN_SOUP, object.num_tomatoes as i32),
                (SOUP_DONE, 1),
            ],
        },
        ObjectKind::Soup => vec![
            (ONIONS_IN_SOUP, object.num_onions as i32),
            (TOMATOES_IN_SOUP, object.num_tomatoes as i32),
            (SOUP_DONE, 1),
        ],
    }
}
