/// Most ingredients a single pot or soup can hold.
pub const MAX_NUM_INGREDIENTS: u8 = 3;

/// One entry per (onions, tomatoes) composition.
pub const NUM_RECIPES: usize =
    (MAX_NUM_INGREDIENTS as usize + 1) * (MAX_NUM_INGREDIENTS as usize + 1);

/// Table slot for a composition.
pub fn recipe_index(num_onions: u8, num_tomatoes: u8) -> usize {
    (MAX_NUM_INGREDIENTS as usize + 1) * num_onions as usize + num_tomatoes as usize
}

/// Per-world serving values and cook times, indexed by [`recipe_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBook {
    values: [u32; NUM_RECIPES],
    times: [u32; NUM_RECIPES],
}

impl RecipeBook {
    pub fn new(values: [u32; NUM_RECIPES], times: [u32; NUM_RECIPES]) -> Self {
        Self { values, times }
    }

    /// Out-of-range slots read as worthless
    pub fn value(&self, recipe: usize) -> u32 {
        self.values.get(recipe).copied().unwrap_or(0)
    }

    pub fn cook_time(&self, recipe: usize) -> u32 {
        self.times.get(recipe).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_index_layout() {
        assert_eq!(NUM_RECIPES, 16);
        assert_eq!(recipe_index(0, 0), 0);
        assert_eq!(recipe_index(2, 1), 9);
        assert_eq!(recipe_index(3, 0), 12);
        assert_eq!(recipe_index(3, 3), NUM_RECIPES - 1);
    }

    #[test]
    fn test_lookup_uses_exact_slot() {
        let mut values = [0; NUM_RECIPES];
        let mut times = [0; NUM_RECIPES];
        values[9] = 42;
        times[9] = 7;
        let book = RecipeBook::new(values, times);

        assert_eq!(book.value(recipe_index(2, 1)), 42);
        assert_eq!(book.cook_time(recipe_index(2, 1)), 7);
        assert_eq!(book.value(recipe_index(1, 2)), 0);
        assert_eq!(book.value(NUM_RECIPES), 0);
    }
}
