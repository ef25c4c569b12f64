/// One barrier-separated step of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Mask,
    Propose,
    Commit,
    Interact,
    Cook,
    Reward,
    Observe,
    ResetCheck,
}

/// Ordered stages run once per tick for every world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSchedule {
    stages: Vec<Stage>,
}

impl TickSchedule {
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Stage::Mask,
                Stage::Propose,
                Stage::Commit,
                Stage::Interact,
                Stage::Cook,
                Stage::Reward,
                Stage::Observe,
                Stage::ResetCheck,
            ],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_commits_before_interaction() {
        let schedule = TickSchedule::standard();
        let at = |stage| schedule.stages().iter().position(|s| *s == stage).unwrap();
        assert!(at(Stage::Propose) < at(Stage::Commit));
        assert!(at(Stage::Commit) < at(Stage::Interact));
        assert!(at(Stage::Cook) < at(Stage::Reward));
        assert_eq!(schedule.stages().last(), Some(&Stage::ResetCheck));
    }
}
