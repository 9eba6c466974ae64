//! Flood-fill reachable area
//!
//! Counts the free cells 4-connected to a start cell, treating every current
//! body cell as a wall. The start is usually a hypothetical next head.

use std::collections::{HashSet, VecDeque};

use crate::game::{Direction, GameState, Position};

/// Number of free cells reachable from `start`, the start included.
///
/// Returns 0 when `start` is outside the frame or on the body.
pub fn reachable_area(state: &GameState, start: Position) -> usize {
    flood_fill(state, start, &Direction::SCAN_ORDER)
}

/// Breadth-first fill expanding neighbours in `neighbour_order`.
///
/// The count does not depend on the order; it is a parameter so the property can be checked.
pub(crate) fn flood_fill(state: &GameState, start: Position, neighbour_order: &[Direction]) -> usize {
    let obstacles: HashSet<Position> = state.snake.body.iter().copied().collect();
    let is_free = |pos: Position| state.is_in_bounds(pos) && !obstacles.contains(&pos);

    if !is_free(start) {
        return 0;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for &direction in neighbour_order {
            let next = pos.stepped(direction, state.cell_size);
            if is_free(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.len()
}
