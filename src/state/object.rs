use super::recipes::{MAX_NUM_INGREDIENTS, recipe_index};

/// Sentinel for `Object::cooking_tick` while nothing is cooking.
pub const NOT_COOKING: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ObjectKind {
    #[default]
    None = 0,
    Tomato = 1,
    Onion = 2,
    Dish = 3,
    Soup = 4,
}

/// An item lying on a cell, held by an agent, or sitting in a pot.
///
/// Pot contents are always a `Soup`: while filling, `cooking_tick` is
/// [`NOT_COOKING`]; while cooking it counts down to zero; at zero the soup
/// is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Object {
    pub kind: ObjectKind,
    pub num_onions: u8,
    pub num_tomatoes: u8,
    pub cooking_tick: i32,
}

impl Default for Object {
    fn default() -> Self {
        Self::NONE
    }
}

impl Object {
    pub const NONE: Object = Object {
        kind: ObjectKind::None,
        num_onions: 0,
        num_tomatoes: 0,
        cooking_tick: NOT_COOKING,
    };

    pub fn of_kind(kind: ObjectKind) -> Self {
        Self {
            kind,
            ..Self::NONE
        }
    }

    pub fn soup(num_onions: u8, num_tomatoes: u8, cooking_tick: i32) -> Self {
        Self {
            kind: ObjectKind::Soup,
            num_onions,
            num_tomatoes,
            cooking_tick,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == ObjectKind::None
    }

    pub fn is_ingredient(&self) -> bool {
        matches!(self.kind, ObjectKind::Onion | ObjectKind::Tomato)
    }

    pub fn num_ingredients(&self) -> u8 {
        self.num_onions + self.num_tomatoes
    }

    pub fn recipe(&self) -> usize {
        recipe_index(self.num_onions, self.num_tomatoes)
    }

    /// Adds one raw ingredient to this pot soup. Returns false without
    /// changing anything when the soup is already at the ingredient cap.
    pub fn add_ingredient(&mut self, ingredient: ObjectKind) -> bool {
        if self.num_ingredients() >= MAX_NUM_INGREDIENTS {
            return false;
        }
        match ingredient {
            ObjectKind::Onion => self.num_onions += 1,
            ObjectKind::Tomato => self.num_tomatoes += 1,
            _ => return false,
        }
        self.kind = ObjectKind::Soup;
        true
    }

    pub fn take(&mut self) -> Object {
        std::mem::take(self)
    }
}

/// Derived state of a pot cell's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotState {
    Empty,
    Filling,
    Cooking { remaining: i32 },
    Ready,
}

impl PotState {
    pub fn of(contents: &Object) -> PotState {
        if contents.kind != ObjectKind::Soup || contents.num_ingredients() == 0 {
            PotState::Empty
        } else if contents.cooking_tick == NOT_COOKING {
            PotState::Filling
        } else if contents.cooking_tick > 0 {
            PotState::Cooking {
                remaining: contents.cooking_tick,
            }
        } else {
            PotState::Ready
        }
    }

    /// Ingredients can only go into an idle pot
    pub fn accepts_ingredients(self) -> bool {
        matches!(self, PotState::Empty | PotState::Filling)
    }
}
