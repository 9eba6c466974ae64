use super::Policy;
use crate::analysis::{reachable_area, safe_set};
use crate::game::{Direction, GameState};

/// One safe move scored for the area-maximizing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub direction: Direction,
    /// Free cells reachable from the new head
    pub area: usize,
    /// Manhattan distance from the new head to the food
    pub food_distance: i32,
}

/// Score every safe move, in scan order
pub fn evaluate_candidates(state: &GameState) -> Vec<Candidate> {
    safe_set(state)
        .safe_directions()
        .map(|direction| {
            let next = state.head().stepped(direction, state.cell_size);
            Candidate {
                direction,
                area: reachable_area(state, next),
                food_distance: next.manhattan_distance(state.food),
            }
        })
        .collect()
}

/// Largest area first, then shortest food distance. Exact ties keep the earliest candidate.
pub fn best_candidate(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().copied().fold(None, |best, c| match best {
        Some(b) if (c.area, -c.food_distance) <= (b.area, -b.food_distance) => Some(b),
        _ => Some(c),
    })
}

/// Moves toward the most open space, preferring the food when spaces are equal
#[derive(Debug, Default)]
pub struct AreaMaximizingPolicy;

impl AreaMaximizingPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for AreaMaximizingPolicy {
    fn name(&self) -> String {
        "area-max".to_string()
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        best_candidate(&evaluate_candidates(state))
            .map(|c| c.direction)
            .unwrap_or(state.direction())
    }
}
