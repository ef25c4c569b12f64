use std::fmt::Write;

use crate::config::{Config, ConfigError};
use crate::infra::{Direction, Position};

use super::grid::{Grid, Terrain};
use super::object::{Object, ObjectKind, PotState};
use super::player_state::PlayerState;
use super::recipes::RecipeBook;

/// Fixed sub-goal rewards granted by the interaction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapingRewards {
    pub placement_in_pot: u32,
    pub dish_pickup: u32,
    pub soup_pickup: u32,
}

/// Everything one world owns. Nothing in here is shared with another world.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub grid: Grid,
    /// One slot per cell; pots hold their soup here
    pub objects: Vec<Object>,
    pub players: Vec<PlayerState>,
    pub timestep: u32,
    pub horizon: u32,
    pub recipes: RecipeBook,
    pub shaping: ShapingRewards,
    /// Team reward collected during the current tick
    pub calculated_reward: i64,
    /// Soups delivered during the current tick
    pub soups_served: u32,
    pub reset_requested: bool,
    pub enforce_action_mask: bool,
    start_positions: Vec<Position>,
}

impl WorldState {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let grid = config.build_grid()?;
        let start_positions = config.start_positions(&grid)?;
        let recipes = config.recipe_book()?;
        config.check_horizon()?;

        let mut world = Self {
            objects: vec![Object::NONE; grid.size()],
            players: Vec::with_capacity(start_positions.len()),
            grid,
            timestep: 0,
            horizon: config.horizon,
            recipes,
            shaping: ShapingRewards {
                placement_in_pot: config.placement_in_pot_rew,
                dish_pickup: config.dish_pickup_rew,
                soup_pickup: config.soup_pickup_rew,
            },
            calculated_reward: 0,
            soups_served: 0,
            reset_requested: false,
            enforce_action_mask: config.enforce_action_mask,
            start_positions,
        };
        world.reset();
        Ok(world)
    }

    /// Back to the configured start: empty cells and pots, agents at their
    /// start cells facing north with empty hands, clocks and rewards zeroed.
    pub fn reset(&mut self) {
        self.objects.fill(Object::NONE);
        self.players = self
            .start_positions
            .iter()
            .map(|&pos| PlayerState::new(pos, Direction::North))
            .collect();
        self.timestep = 0;
        self.calculated_reward = 0;
        self.soups_served = 0;
        self.reset_requested = false;
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn start_positions(&self) -> &[Position] {
        &self.start_positions
    }

    /// Agent whose committed position is `pos`
    pub fn occupant(&self, pos: &Position) -> Option<usize> {
        self.players.iter().position(|p| p.position == *pos)
    }

    pub fn pot_states(&self) -> impl Iterator<Item = (usize, PotState)> + '_ {
        self.grid
            .pot_locs()
            .iter()
            .map(|&loc| (loc, PotState::of(&self.objects[loc])))
    }

    /// Text rendering for logs: terrain letters, lowercase objects
    /// (`o` onion, `t` tomato, `d` dish, `s` soup, digit = ingredients in a
    /// pot) and agents as their layout digit, `1` for agent 0, over everything.
    pub fn draw_ascii_map(&self) -> String {
        let mut out = String::with_capacity(self.grid.size() * 2);
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                let pos = Position::new(x, y);
                let Some(index) = self.grid.index(&pos) else {
                    continue;
                };
                let ch = if let Some(player) = self.occupant(&pos) {
                    char::from_digit(player as u32 + 1, 10).unwrap_or('?')
                } else {
                    let object = &self.objects[index];
                    match (self.grid.terrain_at(index), object.kind) {
                        (_, ObjectKind::None) => self.grid.terrain_at(index).layout_char(),
                        (Terrain::Pot, _) => match PotState::of(object) {
                            PotState::Ready => 's',
                            _ => char::from_digit(object.num_ingredients() as u32, 10)
                                .unwrap_or('?'),
                        },
                        (_, ObjectKind::Onion) => 'o',
                        (_, ObjectKind::Tomato) => 't',
                        (_, ObjectKind::Dish) => 'd',
                        (_, ObjectKind::Soup) => 's',
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        for (id, player) in self.players.iter().enumerate() {
            let _ = writeln!(
                out,
                "agent {}: ({}, {}) facing {:?} holding {:?}",
                id,
                player.position.x,
                player.position.y,
                player.orientation,
                player.held_object.kind
            );
        }
        out
    }
}
