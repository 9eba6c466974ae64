use serde::{Deserialize, Serialize};

use super::Policy;
use crate::analysis::{is_safe, safe_set};
use crate::game::{Direction, GameState};

/// Which axis gap the greedy policy closes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AxisPriority {
    /// Vertical whenever the food is on another row, then horizontal
    #[default]
    VerticalFirst,
    /// The axis with the larger remaining gap; vertical on equal gaps
    LargerGap,
}

/// Greedy chase of the food along one axis at a time
///
/// If the preferred move is unsafe, the first safe direction in scan order
/// (LEFT, RIGHT, UP, DOWN) is taken instead. With no safe move left the
/// current direction is kept.
#[derive(Debug, Default)]
pub struct AxisGreedyPolicy {
    priority: AxisPriority,
}

impl AxisGreedyPolicy {
    pub fn new(priority: AxisPriority) -> Self {
        Self { priority }
    }

    /// The move that closes the chosen axis gap, before any safety check
    pub fn preferred_direction(&self, state: &GameState) -> Direction {
        let dx = state.horizontal_distance();
        let dy = state.vertical_distance();

        let vertical = if dy > 0 { Direction::Down } else { Direction::Up };
        let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };

        match self.priority {
            AxisPriority::VerticalFirst if dy != 0 => vertical,
            AxisPriority::LargerGap if dy != 0 && dy.abs() >= dx.abs() => vertical,
            _ if dx != 0 => horizontal,
            _ => state.direction(),
        }
    }
}

impl Policy for AxisGreedyPolicy {
    fn name(&self) -> String {
        "axis-greedy".to_string()
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        let preferred = self.preferred_direction(state);
        if is_safe(state, preferred) {
            return preferred;
        }

        safe_set(state).first_safe().unwrap_or(state.direction())
    }
}
