use crate::infra::Direction;

/// Number of discrete actions an agent can choose from.
pub const NUM_MOVES: usize = 6;

/// Legality of each action, indexed by its code.
pub type ActionMask = [bool; NUM_MOVES];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Action {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    #[default]
    Stay = 4,
    Interact = 5,
}

impl Action {
    pub const ALL: [Action; NUM_MOVES] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stay,
        Action::Interact,
    ];

    pub fn try_from_code(code: i32) -> Option<Action> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Malformed codes degrade to STAY so one bad input never stalls a batch
    pub fn from_code(code: i32) -> Action {
        Self::try_from_code(code).unwrap_or_else(|| {
            tracing::warn!("malformed action code {}, treating as Stay", code);
            Action::Stay
        })
    }

    pub fn code(self) -> usize {
        self as usize
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::North => Some(Direction::North),
            Action::South => Some(Direction::South),
            Action::East => Some(Direction::East),
            Action::West => Some(Direction::West),
            Action::Stay | Action::Interact => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_code(action.code() as i32), action);
        }
    }

    #[test]
    fn test_malformed_codes_become_stay() {
        assert_eq!(Action::from_code(-1), Action::Stay);
        assert_eq!(Action::from_code(6), Action::Stay);
        assert_eq!(Action::try_from_code(42), None);
    }

    #[test]
    fn test_directional_actions_match_direction_codes() {
        for direction in Direction::ALL {
            let action = Action::ALL[direction.index()];
            assert_eq!(action.direction(), Some(direction));
        }
        assert_eq!(Action::Interact.direction(), None);
    }
}
