use super::Policy;
use crate::game::{Direction, GameState};

/// Keyboard-driven policy
///
/// Keeps the latest key until the next tick consumes it.
#[derive(Debug, Default)]
pub struct ManualPolicy {
    pending: Option<Direction>,
}

impl ManualPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Turn an optional key into a direction.
///
/// A reversal into the neck (body longer than one cell) is ignored, and no
/// key keeps the current direction.
pub fn resolve_input(state: &GameState, requested: Option<Direction>) -> Direction {
    let current = state.direction();
    match requested {
        Some(dir) if state.snake.len() > 1 && dir.is_opposite(current) => current,
        Some(dir) => dir,
        None => current,
    }
}

impl Policy for ManualPolicy {
    fn name(&self) -> String {
        "manual".to_string()
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        resolve_input(state, self.pending.take())
    }

    fn steer(&mut self, requested: Direction) {
        self.pending = Some(requested);
    }

    fn is_autonomous(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_state;

    fn start() -> GameState {
        test_state(&[(100, 50), (90, 50), (80, 50)], Direction::Right, (300, 300))
    }

    #[test]
    fn test_no_key_keeps_direction() {
        let mut policy = ManualPolicy::new();
        assert_eq!(policy.decide(&start()), Direction::Right);
    }

    #[test]
    fn test_key_turns() {
        let mut policy = ManualPolicy::new();
        policy.steer(Direction::Up);
        assert_eq!(policy.decide(&start()), Direction::Up);
        // consumed
        assert_eq!(policy.decide(&start()), Direction::Right);
    }

    #[test]
    fn test_reversal_ignored() {
        let mut policy = ManualPolicy::new();
        policy.steer(Direction::Left);
        assert_eq!(policy.decide(&start()), Direction::Right);
    }

    #[test]
    fn test_single_cell_may_reverse() {
        let state = test_state(&[(100, 50)], Direction::Right, (300, 300));
        assert_eq!(resolve_input(&state, Some(Direction::Left)), Direction::Left);
    }

    #[test]
    fn test_latest_key_wins() {
        let mut policy = ManualPolicy::new();
        policy.steer(Direction::Up);
        policy.steer(Direction::Down);
        assert_eq!(policy.decide(&start()), Direction::Down);
        assert!(!policy.is_autonomous());
    }
}
