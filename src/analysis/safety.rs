//! Immediate move legality
//!
//! A direction is safe when it does not reverse into the neck, the next head
//! cell stays inside the frame, and that cell is not part of the current body.
//! The tail cell counts as occupied even though it would vacate this tick.

use crate::game::{Direction, GameState};

/// Safety of each of the four directions for one state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafeMoves {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl SafeMoves {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    fn set(&mut self, direction: Direction, safe: bool) {
        match direction {
            Direction::Left => self.left = safe,
            Direction::Right => self.right = safe,
            Direction::Up => self.up = safe,
            Direction::Down => self.down = safe,
        }
    }

    /// Entries in scan order: LEFT, RIGHT, UP, DOWN
    pub fn iter(&self) -> impl Iterator<Item = (Direction, bool)> + '_ {
        Direction::SCAN_ORDER.into_iter().map(|d| (d, self.get(d)))
    }

    /// Safe directions in scan order
    pub fn safe_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.iter().filter(|(_, safe)| *safe).map(|(d, _)| d)
    }

    /// First safe direction in scan order
    pub fn first_safe(&self) -> Option<Direction> {
        self.safe_directions().next()
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    pub fn count(&self) -> usize {
        self.safe_directions().count()
    }
}

/// Whether moving one cell in `direction` is immediately legal
pub fn is_safe(state: &GameState, direction: Direction) -> bool {
    if state.snake.len() > 1 && direction.is_opposite(state.direction()) {
        return false;
    }

    let candidate = state.head().stepped(direction, state.cell_size);
    state.is_in_bounds(candidate) && !state.is_occupied_by_snake(candidate)
}

/// Safety of all four directions at once
pub fn safe_set(state: &GameState) -> SafeMoves {
    let mut moves = SafeMoves::default();
    for direction in Direction::SCAN_ORDER {
        moves.set(direction, is_safe(state, direction));
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, Position, Snake, test_state};

    #[test]
    fn test_starting_position() {
        let state = test_state(&[(100, 50), (90, 50), (80, 50)], Direction::Right, (300, 300));
        let moves = safe_set(&state);

        assert!(!moves.left); // reversal into the neck
        assert!(moves.right);
        assert!(moves.up);
        assert!(moves.down);
        assert_eq!(moves.count(), 3);
        assert_eq!(moves.first_safe(), Some(Direction::Right));
    }

    #[test]
    fn test_single_cell_may_reverse() {
        let state = test_state(&[(100, 50)], Direction::Right, (300, 300));
        assert!(is_safe(&state, Direction::Left));
    }

    #[test]
    fn test_never_safe_outside_frame() {
        let cell = 10;
        let (width, height) = (480, 480);
        let edges_x = [0, cell, width - 2 * cell, width - cell];
        let edges_y = [0, cell, height - 2 * cell, height - cell];

        for &x in &edges_x {
            for &y in &edges_y {
                for facing in Direction::SCAN_ORDER {
                    let state = GameState::new(
                        Snake::new(Position::new(x, y), facing, 1, cell),
                        Position::new(240, 240),
                        width,
                        height,
                        cell,
                    );
                    let moves = safe_set(&state);
                    for dir in Direction::SCAN_ORDER {
                        let next = state.head().stepped(dir, cell);
                        let inside = next.x >= 0
                            && next.x <= width - cell
                            && next.y >= 0
                            && next.y <= height - cell;
                        assert_eq!(
                            moves.get(dir),
                            inside,
                            "head ({x},{y}) moving {dir}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_boxed_in_head_has_no_safe_move() {
        // Head at (50,50) with all four neighbours occupied by its own body.
        let state = test_state(
            &[
                (50, 50),
                (60, 50),
                (60, 60),
                (50, 60),
                (40, 60),
                (40, 50),
                (40, 40),
                (50, 40),
            ],
            Direction::Left,
            (300, 300),
        );
        let moves = safe_set(&state);

        assert!(!moves.any());
        assert_eq!(moves.first_safe(), None);
    }

    #[test]
    fn test_tail_counts_as_occupied() {
        let state = test_state(&[(50, 50), (60, 50), (60, 60), (50, 60)], Direction::Left, (300, 300));

        // The tail at (50,60) vacates on a real move, but is still unsafe here.
        assert!(!is_safe(&state, Direction::Down));
        assert_eq!(
            GameEngine::preview(&state, Direction::Down).collision_type,
            None
        );
    }

    #[test]
    fn test_iter_follows_scan_order() {
        let state = test_state(&[(100, 50), (90, 50), (80, 50)], Direction::Right, (300, 300));
        let order: Vec<Direction> = safe_set(&state).iter().map(|(d, _)| d).collect();
        assert_eq!(order, Direction::SCAN_ORDER.to_vec());
    }
}
