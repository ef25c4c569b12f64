use crate::infra::Position;

/// Largest number of cells a single world may hold.
pub const MAX_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Air = 0,
    Pot = 1,
    Counter = 2,
    OnionSource = 3,
    TomatoSource = 4,
    DishSource = 5,
    Serving = 6,
}

impl Terrain {
    pub fn from_code(code: u8) -> Option<Terrain> {
        match code {
            0 => Some(Terrain::Air),
            1 => Some(Terrain::Pot),
            2 => Some(Terrain::Counter),
            3 => Some(Terrain::OnionSource),
            4 => Some(Terrain::TomatoSource),
            5 => Some(Terrain::DishSource),
            6 => Some(Terrain::Serving),
            _ => None,
        }
    }

    pub fn from_layout_char(c: char) -> Option<Terrain> {
        match c {
            ' ' => Some(Terrain::Air),
            'P' => Some(Terrain::Pot),
            'X' => Some(Terrain::Counter),
            'O' => Some(Terrain::OnionSource),
            'T' => Some(Terrain::TomatoSource),
            'D' => Some(Terrain::DishSource),
            'S' => Some(Terrain::Serving),
            _ => None,
        }
    }

    pub fn layout_char(self) -> char {
        match self {
            Terrain::Air => ' ',
            Terrain::Pot => 'P',
            Terrain::Counter => 'X',
            Terrain::OnionSource => 'O',
            Terrain::TomatoSource => 'T',
            Terrain::DishSource => 'D',
            Terrain::Serving => 'S',
        }
    }

    /// Only open floor can be stood on
    pub fn is_walkable(self) -> bool {
        self == Terrain::Air
    }
}

/// Static terrain of one world. Built once from configuration and never
/// mutated while an episode runs.
#[derive(Clone, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    terrain: Vec<Terrain>,
    pot_locs: Vec<usize>,
    counter_locs: Vec<usize>,
}

impl Grid {
    /// Callers validate `terrain.len() == width * height` beforehand.
    pub fn new(width: i32, height: i32, terrain: Vec<Terrain>) -> Self {
        let locs_of = |kind: Terrain| -> Vec<usize> {
            terrain
                .iter()
                .enumerate()
                .filter(|(_, t)| **t == kind)
                .map(|(i, _)| i)
                .collect()
        };
        let pot_locs = locs_of(Terrain::Pot);
        let counter_locs = locs_of(Terrain::Counter);

        Self {
            width,
            height,
            terrain,
            pot_locs,
            counter_locs,
        }
    }

    pub fn size(&self) -> usize {
        self.terrain.len()
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn index(&self, pos: &Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn position(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    pub fn get(&self, pos: &Position) -> Option<Terrain> {
        self.index(pos).map(|i| self.terrain[i])
    }

    pub fn terrain_at(&self, index: usize) -> Terrain {
        self.terrain[index]
    }

    pub fn is_walkable(&self, pos: &Position) -> bool {
        self.get(pos).is_some_and(Terrain::is_walkable)
    }

    pub fn pot_locs(&self) -> &[usize] {
        &self.pot_locs
    }

    pub fn counter_locs(&self) -> &[usize] {
        &self.counter_locs
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Terrain)> + '_ {
        self.terrain.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> Grid {
        // XPX
        // O D
        let terrain = "XPXO D"
            .chars()
            .map(|c| Terrain::from_layout_char(c).unwrap())
            .collect();
        Grid::new(3, 2, terrain)
    }

    #[test]
    fn test_derived_location_lists() {
        let grid = small_grid();
        assert_eq!(grid.pot_locs(), &[1]);
        assert_eq!(grid.counter_locs(), &[0, 2]);
    }

    #[test]
    fn test_index_and_position_are_inverse() {
        let grid = small_grid();
        for i in 0..grid.size() {
            assert_eq!(grid.index(&grid.position(i)), Some(i));
        }
        assert_eq!(grid.index(&Position::new(3, 0)), None);
        assert_eq!(grid.index(&Position::new(0, -1)), None);
    }

    #[test]
    fn test_only_air_is_walkable() {
        let grid = small_grid();
        assert!(grid.is_walkable(&Position::new(1, 1)));
        assert!(!grid.is_walkable(&Position::new(1, 0)));
        assert!(!grid.is_walkable(&Position::new(0, 1)));
        assert!(!grid.is_walkable(&Position::new(5, 5)));
    }

    #[test]
    fn test_terrain_codes_round_trip_through_layout_chars() {
        for code in 0..7u8 {
            let terrain = Terrain::from_code(code).unwrap();
            assert_eq!(terrain as u8, code);
            assert_eq!(Terrain::from_layout_char(terrain.layout_char()), Some(terrain));
        }
        assert_eq!(Terrain::from_code(7), None);
    }
}
