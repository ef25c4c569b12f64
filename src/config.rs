//! World configuration and its construction-time validation.
//!
//! A [`Config`] describes one world exactly as the host hands it over:
//! flattened terrain codes, start positions, shaping rewards and the two
//! recipe tables. [`Config::from_layout`] builds one from an ASCII layout
//! and a set of [`LayoutParams`].

use thiserror::Error;

use crate::infra::Position;
use crate::state::{
    Grid, MAX_NUM_INGREDIENTS, MAX_SIZE, NUM_RECIPES, RecipeBook, Terrain, recipe_index,
};

/// Most agents a single world can host.
pub const MAX_NUM_PLAYERS: usize = 4;

/// Configuration errors. Any of these aborts world construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("grid has {cells} cells, capacity is {capacity}")]
    GridTooLarge { cells: usize, capacity: usize },

    #[error("terrain has {actual} cells, {expected} expected from height x width")]
    TerrainSizeMismatch { expected: usize, actual: usize },

    #[error("unknown terrain code {code} at cell {index}")]
    UnknownTerrainCode { index: usize, code: u8 },

    #[error("a world needs at least one player")]
    NoPlayers,

    #[error("{count} players requested, at most {max} supported")]
    TooManyPlayers { count: usize, max: usize },

    #[error("{num_players} players but {xs} start x and {ys} start y coordinates")]
    StartPositionCount {
        num_players: usize,
        xs: usize,
        ys: usize,
    },

    #[error("start position ({x}, {y}) of player {player} is outside the grid")]
    StartOutOfBounds { player: usize, x: i32, y: i32 },

    #[error("start position ({x}, {y}) of player {player} is not walkable")]
    StartNotWalkable { player: usize, x: i32, y: i32 },

    #[error("players {first} and {second} both start at ({x}, {y})")]
    DuplicateStart {
        first: usize,
        second: usize,
        x: i32,
        y: i32,
    },

    #[error("recipe table {table} has {actual} entries, expected {expected}")]
    RecipeTableSize {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cook time {time} for recipe {recipe} exceeds {max}")]
    CookTimeTooLarge { recipe: usize, time: u32, max: u32 },

    #[error("horizon must be at least one tick")]
    ZeroHorizon,

    #[error("layout is empty")]
    EmptyLayout,

    #[error("layout row {row} has width {actual}, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown layout character {ch:?} at row {row}, column {col}")]
    UnknownLayoutChar { ch: char, row: usize, col: usize },

    #[error("layout has player {present} but no player {missing}")]
    MissingPlayer { present: usize, missing: usize },

    #[error("order with {onions} onions and {tomatoes} tomatoes exceeds the ingredient cap")]
    OrderTooLarge { onions: u8, tomatoes: u8 },

    #[error("recipe {table} for {onions} onions and {tomatoes} tomatoes overflows u32")]
    RecipeValueOverflow {
        table: &'static str,
        onions: u32,
        tomatoes: u32,
    },
}

/// Per-world construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Row-major terrain codes, `height * width` entries
    pub terrain: Vec<u8>,
    pub height: i32,
    pub width: i32,
    pub num_players: usize,
    pub start_player_x: Vec<i32>,
    pub start_player_y: Vec<i32>,
    pub placement_in_pot_rew: u32,
    pub dish_pickup_rew: u32,
    pub soup_pickup_rew: u32,
    pub recipe_values: Vec<u32>,
    pub recipe_times: Vec<u32>,
    pub horizon: u32,
    /// Replace mask-illegal actions with STAY before they are applied
    pub enforce_action_mask: bool,
}

impl Config {
    /// Checks every construction rule and builds the static terrain.
    pub fn build_grid(&self) -> Result<Grid, ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let cells = (self.width as usize) * (self.height as usize);
        if cells > MAX_SIZE {
            return Err(ConfigError::GridTooLarge {
                cells,
                capacity: MAX_SIZE,
            });
        }
        if self.terrain.len() != cells {
            return Err(ConfigError::TerrainSizeMismatch {
                expected: cells,
                actual: self.terrain.len(),
            });
        }

        let terrain = self
            .terrain
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                Terrain::from_code(code).ok_or(ConfigError::UnknownTerrainCode { index, code })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Grid::new(self.width, self.height, terrain))
    }

    /// Start cells, validated against `grid`.
    pub fn start_positions(&self, grid: &Grid) -> Result<Vec<Position>, ConfigError> {
        if self.num_players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.num_players > MAX_NUM_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                count: self.num_players,
                max: MAX_NUM_PLAYERS,
            });
        }
        if self.start_player_x.len() != self.num_players
            || self.start_player_y.len() != self.num_players
        {
            return Err(ConfigError::StartPositionCount {
                num_players: self.num_players,
                xs: self.start_player_x.len(),
                ys: self.start_player_y.len(),
            });
        }

        let mut starts: Vec<Position> = Vec::with_capacity(self.num_players);
        for (player, (&x, &y)) in self
            .start_player_x
            .iter()
            .zip(self.start_player_y.iter())
            .enumerate()
        {
            let pos = Position::new(x, y);
            if !grid.contains(&pos) {
                return Err(ConfigError::StartOutOfBounds { player, x, y });
            }
            if !grid.is_walkable(&pos) {
                return Err(ConfigError::StartNotWalkable { player, x, y });
            }
            if let Some(first) = starts.iter().position(|p| *p == pos) {
                return Err(ConfigError::DuplicateStart {
                    first,
                    second: player,
                    x,
                    y,
                });
            }
            starts.push(pos);
        }
        Ok(starts)
    }

    pub fn recipe_book(&self) -> Result<RecipeBook, ConfigError> {
        let values = table_array("recipe_values", &self.recipe_values)?;
        let times = table_array("recipe_times", &self.recipe_times)?;
        if let Some((recipe, &time)) = times
            .iter()
            .enumerate()
            .find(|(_, t)| **t > i32::MAX as u32)
        {
            return Err(ConfigError::CookTimeTooLarge {
                recipe,
                time,
                max: i32::MAX as u32,
            });
        }
        Ok(RecipeBook::new(values, times))
    }

    pub fn check_horizon(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        Ok(())
    }

    /// Builds a config from an ASCII layout.
    ///
    /// Rows are trimmed and blank lines skipped. Digits `1`..`9` mark the
    /// start cell of that player and stand on open floor.
    pub fn from_layout(layout: &str, params: &LayoutParams) -> Result<Config, ConfigError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(ConfigError::EmptyLayout);
        };
        let width = first.chars().count();

        let mut terrain = Vec::with_capacity(width * rows.len());
        let mut starts: [Option<Position>; 9] = [None; 9];

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(ConfigError::RaggedLayout {
                    row,
                    expected: width,
                    actual,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '1'..='9' => {
                        let player = ch as usize - '1' as usize;
                        starts[player] = Some(Position::new(col as i32, row as i32));
                        Terrain::Air
                    }
                    _ => Terrain::from_layout_char(ch)
                        .ok_or(ConfigError::UnknownLayoutChar { ch, row, col })?,
                };
                terrain.push(cell as u8);
            }
        }

        let num_players = starts.iter().filter(|s| s.is_some()).count();
        if let Some(missing) = starts[..num_players].iter().position(Option::is_none) {
            let present = starts
                .iter()
                .rposition(Option::is_some)
                .map_or(0, |p| p + 1);
            return Err(ConfigError::MissingPlayer {
                present,
                missing: missing + 1,
            });
        }
        let starts: Vec<Position> = starts.iter().flatten().copied().collect();

        let (recipe_values, recipe_times) = params.recipe_tables()?;

        Ok(Config {
            terrain,
            height: rows.len() as i32,
            width: width as i32,
            num_players,
            start_player_x: starts.iter().map(|p| p.x).collect(),
            start_player_y: starts.iter().map(|p| p.y).collect(),
            placement_in_pot_rew: params.placement_in_pot_rew,
            dish_pickup_rew: params.dish_pickup_rew,
            soup_pickup_rew: params.soup_pickup_rew,
            recipe_values,
            recipe_times,
            horizon: params.horizon,
            enforce_action_mask: params.enforce_action_mask,
        })
    }
}

fn table_array(table: &'static str, entries: &[u32]) -> Result<[u32; NUM_RECIPES], ConfigError> {
    entries
        .try_into()
        .map_err(|_| ConfigError::RecipeTableSize {
            table,
            expected: NUM_RECIPES,
            actual: entries.len(),
        })
}

/// A soup composition that can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    pub onions: u8,
    pub tomatoes: u8,
}

impl Order {
    pub fn new(onions: u8, tomatoes: u8) -> Self {
        Self { onions, tomatoes }
    }

    fn recipe(&self) -> Result<usize, ConfigError> {
        if self.onions as u32 + self.tomatoes as u32 > MAX_NUM_INGREDIENTS as u32 {
            return Err(ConfigError::OrderTooLarge {
                onions: self.onions,
                tomatoes: self.tomatoes,
            });
        }
        Ok(recipe_index(self.onions, self.tomatoes))
    }
}

/// Recipe and reward parameters that accompany a layout.
///
/// Times and values are resolved from the most specific setting present:
/// a global `cook_time`/`delivery_reward` wins over per-order tables,
/// which win over per-ingredient linear pricing, which wins over the
/// default of 20.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutParams {
    /// Compositions that can be served for value. Anything else is worth 0.
    pub orders: Vec<Order>,
    pub bonus_orders: Vec<Order>,
    pub order_bonus: u32,
    pub onion_time: Option<u32>,
    pub tomato_time: Option<u32>,
    /// Cook times matched positionally against `orders`
    pub recipe_times: Option<Vec<u32>>,
    pub cook_time: Option<u32>,
    pub onion_value: Option<u32>,
    pub tomato_value: Option<u32>,
    /// Values matched positionally against `orders`
    pub recipe_values: Option<Vec<u32>>,
    pub delivery_reward: Option<u32>,
    pub placement_in_pot_rew: u32,
    pub dish_pickup_rew: u32,
    pub soup_pickup_rew: u32,
    pub horizon: u32,
    pub enforce_action_mask: bool,
}

const DEFAULT_RECIPE_TIME: u32 = 20;
const DEFAULT_RECIPE_VALUE: u32 = 20;

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            bonus_orders: Vec::new(),
            order_bonus: 2,
            onion_time: None,
            tomato_time: None,
            recipe_times: None,
            cook_time: None,
            onion_value: None,
            tomato_value: None,
            recipe_values: None,
            delivery_reward: None,
            placement_in_pot_rew: 3,
            dish_pickup_rew: 3,
            soup_pickup_rew: 5,
            horizon: 400,
            enforce_action_mask: false,
        }
    }
}

impl LayoutParams {
    /// Resolves the `(recipe_values, recipe_times)` tables.
    pub fn recipe_tables(&self) -> Result<(Vec<u32>, Vec<u32>), ConfigError> {
        let order_slots = self
            .orders
            .iter()
            .map(Order::recipe)
            .collect::<Result<Vec<_>, _>>()?;
        let bonus_slots = self
            .bonus_orders
            .iter()
            .map(Order::recipe)
            .collect::<Result<Vec<_>, _>>()?;

        // same order as recipe_index
        let compositions = || {
            (0..=MAX_NUM_INGREDIENTS)
                .flat_map(|o| (0..=MAX_NUM_INGREDIENTS).map(move |t| (o as u32, t as u32)))
        };
        let linear = |table: &'static str, onion: u32, tomato: u32| {
            compositions()
                .map(|(o, t)| {
                    o.checked_mul(onion)
                        .zip(t.checked_mul(tomato))
                        .and_then(|(a, b)| a.checked_add(b))
                        .ok_or(ConfigError::RecipeValueOverflow {
                            table,
                            onions: o,
                            tomatoes: t,
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let mut times = match (self.onion_time, self.tomato_time) {
            (Some(onion), Some(tomato)) => linear("time", onion, tomato)?,
            _ => vec![DEFAULT_RECIPE_TIME; NUM_RECIPES],
        };
        if let Some(per_order) = &self.recipe_times {
            for (&slot, &time) in order_slots.iter().zip(per_order) {
                times[slot] = time;
            }
        }
        if let Some(cook_time) = self.cook_time {
            times = vec![cook_time; NUM_RECIPES];
        }

        let mut values = match (self.onion_value, self.tomato_value) {
            (Some(onion), Some(tomato)) => linear("value", onion, tomato)?,
            _ => vec![DEFAULT_RECIPE_VALUE; NUM_RECIPES],
        };
        if let Some(per_order) = &self.recipe_values {
            for (&slot, &value) in order_slots.iter().zip(per_order) {
                values[slot] = value;
            }
        }
        if let Some(reward) = self.delivery_reward {
            values = vec![reward; NUM_RECIPES];
        }

        for ((slot, value), (o, t)) in values.iter_mut().enumerate().zip(compositions()) {
            if !order_slots.contains(&slot) {
                *value = 0;
            } else if bonus_slots.contains(&slot) {
                *value = value.checked_mul(self.order_bonus).ok_or(
                    ConfigError::RecipeValueOverflow {
                        table: "value",
                        onions: o,
                        tomatoes: t,
                    },
                )?;
            }
        }

        Ok((values, times))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRAMPED: &str = "
        XXPXX
        O  2O
        X1  X
        XDXSX
    ";

    fn onion_soup_params() -> LayoutParams {
        LayoutParams {
            orders: vec![Order::new(3, 0)],
            ..LayoutParams::default()
        }
    }

    #[test]
    fn test_from_layout_extracts_players_and_terrain() {
        let config = Config::from_layout(CRAMPED, &onion_soup_params()).unwrap();
        assert_eq!(config.width, 5);
        assert_eq!(config.height, 4);
        assert_eq!(config.num_players, 2);
        assert_eq!(config.start_player_x, vec![1, 3]);
        assert_eq!(config.start_player_y, vec![2, 1]);
        assert_eq!(config.terrain[2], Terrain::Pot as u8);
        assert_eq!(config.terrain[5], Terrain::OnionSource as u8);
        assert_eq!(config.terrain[11], Terrain::Air as u8);
        assert_eq!(config.horizon, 400);
    }

    #[test]
    fn test_layout_errors() {
        let params = onion_soup_params();
        assert_eq!(Config::from_layout("  \n ", &params), Err(ConfigError::EmptyLayout));
        assert_eq!(
            Config::from_layout("XXX\nX1\nXXX", &params),
            Err(ConfigError::RaggedLayout {
                row: 1,
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            Config::from_layout("XQX\nX1X", &params),
            Err(ConfigError::UnknownLayoutChar {
                ch: 'Q',
                row: 0,
                col: 1
            })
        );
        assert_eq!(
            Config::from_layout("X1X\nX3X", &params),
            Err(ConfigError::MissingPlayer {
                present: 3,
                missing: 2
            })
        );
    }

    #[test]
    fn test_default_tables_only_value_ordered_recipes() {
        let (values, times) = onion_soup_params().recipe_tables().unwrap();
        assert_eq!(values.len(), NUM_RECIPES);
        assert_eq!(times, vec![20; NUM_RECIPES]);
        assert_eq!(values[recipe_index(3, 0)], 20);
        assert_eq!(values.iter().filter(|v| **v != 0).count(), 1);
    }

    #[test]
    fn test_linear_pricing_with_bonus_and_overrides() {
        let params = LayoutParams {
            orders: vec![Order::new(2, 1), Order::new(1, 0)],
            bonus_orders: vec![Order::new(1, 0)],
            onion_time: Some(3),
            tomato_time: Some(5),
            recipe_times: Some(vec![9]),
            onion_value: Some(4),
            tomato_value: Some(7),
            ..LayoutParams::default()
        };
        let (values, times) = params.recipe_tables().unwrap();

        // per-order time overrides only the first order
        assert_eq!(times[recipe_index(2, 1)], 9);
        assert_eq!(times[recipe_index(1, 0)], 3);
        assert_eq!(times[recipe_index(0, 2)], 10);

        assert_eq!(values[recipe_index(2, 1)], 15);
        assert_eq!(values[recipe_index(1, 0)], 8);
        assert_eq!(values[recipe_index(0, 1)], 0);
    }

    #[test]
    fn test_global_overrides_win() {
        let params = LayoutParams {
            orders: vec![Order::new(1, 1)],
            cook_time: Some(4),
            recipe_times: Some(vec![99]),
            delivery_reward: Some(11),
            recipe_values: Some(vec![99]),
            ..LayoutParams::default()
        };
        let (values, times) = params.recipe_tables().unwrap();
        assert_eq!(times, vec![4; NUM_RECIPES]);
        assert_eq!(values[recipe_index(1, 1)], 11);
    }

    #[test]
    fn test_recipe_overflow_is_rejected() {
        let params = LayoutParams {
            orders: vec![Order::new(3, 0)],
            onion_value: Some(u32::MAX / 2),
            tomato_value: Some(1),
            ..LayoutParams::default()
        };
        assert_eq!(
            params.recipe_tables(),
            Err(ConfigError::RecipeValueOverflow {
                table: "value",
                onions: 2,
                tomatoes: 2
            })
        );

        let params = LayoutParams {
            orders: vec![Order::new(1, 0)],
            onion_time: Some(u32::MAX),
            tomato_time: Some(1),
            ..LayoutParams::default()
        };
        assert!(matches!(
            params.recipe_tables(),
            Err(ConfigError::RecipeValueOverflow { table: "time", .. })
        ));

        let params = LayoutParams {
            orders: vec![Order::new(1, 0)],
            bonus_orders: vec![Order::new(1, 0)],
            order_bonus: 2,
            delivery_reward: Some(u32::MAX),
            ..LayoutParams::default()
        };
        assert_eq!(
            params.recipe_tables(),
            Err(ConfigError::RecipeValueOverflow {
                table: "value",
                onions: 1,
                tomatoes: 0
            })
        );
    }

    #[test]
    fn test_unordered_bonus_recipe_stays_zero() {
        let params = LayoutParams {
            orders: vec![Order::new(1, 0)],
            bonus_orders: vec![Order::new(3, 0)],
            order_bonus: 2,
            delivery_reward: Some(u32::MAX),
            ..LayoutParams::default()
        };
        let (values, _) = params.recipe_tables().unwrap();
        assert_eq!(values[recipe_index(3, 0)], 0);
        assert_eq!(values[recipe_index(1, 0)], u32::MAX);
    }

    #[test]
    fn test_oversized_order_is_rejected() {
        let params = LayoutParams {
            orders: vec![Order::new(2, 2)],
            ..LayoutParams::default()
        };
        assert_eq!(
            params.recipe_tables(),
            Err(ConfigError::OrderTooLarge {
                onions: 2,
                tomatoes: 2
            })
        );
    }

    #[test]
    fn test_validation_rules() {
        let config = Config::from_layout(CRAMPED, &onion_soup_params()).unwrap();
        let grid = config.build_grid().unwrap();
        assert_eq!(grid.pot_locs().len(), 1);

        let mut bad = config.clone();
        bad.terrain.pop();
        assert_eq!(
            bad.build_grid().unwrap_err(),
            ConfigError::TerrainSizeMismatch {
                expected: 20,
                actual: 19
            }
        );

        let mut bad = config.clone();
        bad.terrain[0] = 9;
        assert_eq!(
            bad.build_grid().unwrap_err(),
            ConfigError::UnknownTerrainCode { index: 0, code: 9 }
        );

        let mut bad = config.clone();
        bad.width = 20;
        bad.height = 20;
        assert!(matches!(bad.build_grid(), Err(ConfigError::GridTooLarge { .. })));

        let mut bad = config.clone();
        bad.num_players = MAX_NUM_PLAYERS + 1;
        assert!(matches!(
            bad.start_positions(&grid),
            Err(ConfigError::TooManyPlayers { .. })
        ));

        let mut bad = config.clone();
        bad.start_player_x[0] = 0;
        assert_eq!(
            bad.start_positions(&grid),
            Err(ConfigError::StartNotWalkable { player: 0, x: 0, y: 2 })
        );

        let mut bad = config.clone();
        bad.start_player_y[1] = 7;
        assert_eq!(
            bad.start_positions(&grid),
            Err(ConfigError::StartOutOfBounds { player: 1, x: 3, y: 7 })
        );

        let mut bad = config.clone();
        bad.start_player_x[1] = 1;
        bad.start_player_y[1] = 2;
        assert_eq!(
            bad.start_positions(&grid),
            Err(ConfigError::DuplicateStart {
                first: 0,
                second: 1,
                x: 1,
                y: 2
            })
        );

        let mut bad = config.clone();
        bad.recipe_times.truncate(9);
        assert_eq!(
            bad.recipe_book().unwrap_err(),
            ConfigError::RecipeTableSize {
                table: "recipe_times",
                expected: NUM_RECIPES,
                actual: 9
            }
        );

        let mut bad = config;
        bad.horizon = 0;
        assert_eq!(bad.check_horizon(), Err(ConfigError::ZeroHorizon));
    }
}
