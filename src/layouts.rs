//! Built-in kitchens.

use crate::config::{Config, ConfigError, LayoutParams, Order};

pub const CRAMPED_ROOM: &str = "
    XXPXX
    O1  O
    X  2X
    XDXSX
";

pub const COORDINATION_RING: &str = "
    XXXPX
    X 1 P
    D2X X
    O   X
    XOSXX
";

pub const FORCED_COORDINATION: &str = "
    XXXPX
    O X1P
    O2X X
    D X X
    XXXSX
";

pub const NAMES: [&str; 3] = ["cramped_room", "coordination_ring", "forced_coordination"];

/// Onion soup only, 20 ticks to cook, worth 20.
pub fn default_params() -> LayoutParams {
    LayoutParams {
        orders: vec![Order::new(3, 0)],
        cook_time: Some(20),
        delivery_reward: Some(20),
        ..LayoutParams::default()
    }
}

pub fn layout(name: &str) -> Option<&'static str> {
    match name {
        "cramped_room" => Some(CRAMPED_ROOM),
        "coordination_ring" => Some(COORDINATION_RING),
        "forced_coordination" => Some(FORCED_COORDINATION),
        _ => None,
    }
}

/// Config for a built-in layout, or `None` for an unknown name.
pub fn named(name: &str, params: &LayoutParams) -> Option<Result<Config, ConfigError>> {
    layout(name).map(|text| Config::from_layout(text, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Terrain, WorldState};

    #[test]
    fn test_all_layouts_build() {
        for name in NAMES {
            let config = named(name, &default_params()).unwrap().unwrap();
            let world = WorldState::new(&config).unwrap();
            assert_eq!(world.num_players(), 2, "{}", name);
            assert!(!world.grid.pot_locs().is_empty(), "{}", name);
        }
    }

    #[test]
    fn test_unknown_layout() {
        assert!(named("ghost_kitchen", &default_params()).is_none());
    }

    #[test]
    fn test_cramped_room_shape() {
        let config = named("cramped_room", &default_params()).unwrap().unwrap();
        assert_eq!((config.width, config.height), (5, 4));
        assert_eq!(config.terrain[2], Terrain::Pot as u8);
        assert_eq!((config.start_player_x[0], config.start_player_y[0]), (1, 1));
        assert_eq!((config.start_player_x[1], config.start_player_y[1]), (3, 2));
    }

    #[test]
    fn test_default_recipe() {
        let (values, times) = default_params().recipe_tables().unwrap();
        let onion_soup = crate::state::recipe_index(3, 0);
        assert_eq!(values[onion_soup], 20);
        assert_eq!(times[onion_soup], 20);
        assert_eq!(values[crate::state::recipe_index(2, 1)], 0);
    }
}
