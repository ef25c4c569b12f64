use crate::infra::{Direction, Position};

use super::object::Object;

/// Per-agent state. `proposed_*` is only meaningful between the propose
/// and commit movement stages of a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Position,
    pub orientation: Direction,
    pub proposed_position: Position,
    pub proposed_orientation: Direction,
    pub held_object: Object,
}

impl PlayerState {
    pub fn new(position: Position, orientation: Direction) -> Self {
        Self {
            position,
            orientation,
            proposed_position: position,
            proposed_orientation: orientation,
            held_object: Object::NONE,
        }
    }

    pub fn has_object(&self) -> bool {
        !self.held_object.is_none()
    }

    pub fn remove_object(&mut self) -> Object {
        self.held_object.take()
    }

    pub fn set_object(&mut self, object: Object) {
        self.held_object = object;
    }

    /// The cell this agent interacts with
    pub fn facing(&self) -> Position {
        self.position.step(self.orientation)
    }

    pub fn propose(&mut self, position: Position, orientation: Direction) {
        self.proposed_position = position;
        self.proposed_orientation = orientation;
    }

    pub fn commit_position_and_orientation(&mut self) {
        self.position = self.proposed_position;
        self.orientation = self.proposed_orientation;
    }

    /// A blocked move still turns the agent
    pub fn commit_orientation(&mut self) {
        self.orientation = self.proposed_orientation;
        self.proposed_position = self.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ObjectKind;

    #[test]
    fn test_blocked_commit_keeps_position_but_turns() {
        let mut player = PlayerState::new(Position::new(1, 1), Direction::North);
        player.propose(Position::new(2, 1), Direction::East);

        player.commit_orientation();
        assert_eq!(player.position, Position::new(1, 1));
        assert_eq!(player.orientation, Direction::East);
        assert_eq!(player.proposed_position, player.position);
    }

    #[test]
    fn test_facing_tracks_orientation() {
        let mut player = PlayerState::new(Position::new(1, 1), Direction::West);
        assert_eq!(player.facing(), Position::new(0, 1));
        player.propose(Position::new(1, 1), Direction::South);
        player.commit_position_and_orientation();
        assert_eq!(player.facing(), Position::new(1, 2));
    }

    #[test]
    fn test_remove_object_empties_hands() {
        let mut player = PlayerState::new(Position::new(0, 0), Direction::North);
        assert!(!player.has_object());
        player.set_object(Object::of_kind(ObjectKind::Onion));
        assert!(player.has_object());
        assert_eq!(player.remove_object().kind, ObjectKind::Onion);
        assert!(!player.has_object());
    }
}
