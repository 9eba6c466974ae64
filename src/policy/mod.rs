//! Movement policies
//!
//! A policy looks at the current `GameState` and picks the direction for the
//! next tick. Policies are interchangeable strategies chosen when the driver
//! is built:
//!
//! - `ManualPolicy`: keyboard input, reversal into the neck ignored
//! - `AxisGreedyPolicy`: straight for the food, scan-order fallback
//! - `AreaMaximizingPolicy`: most reachable space, nearest food on ties
//! - `ModelPolicy`: asks a `Predictor` and applies its label as-is
//! - `SafeguardedPolicy`: wraps any policy and replaces unsafe choices

pub mod area;
pub mod axis_greedy;
pub mod compose;
pub mod manual;
pub mod model;
pub mod safeguard;

pub use area::{AreaMaximizingPolicy, Candidate};
pub use axis_greedy::{AxisGreedyPolicy, AxisPriority};
pub use compose::{PolicyKind, PolicySettings, build_policy};
pub use manual::ManualPolicy;
pub use model::ModelPolicy;
pub use safeguard::SafeguardedPolicy;

use crate::game::{Direction, GameState};

/// Picks one direction per tick
pub trait Policy {
    /// Short name for status lines and logs
    fn name(&self) -> String;

    /// Direction to apply on the next tick
    fn decide(&mut self, state: &GameState) -> Direction;

    /// Directional key from a human player. Autonomous policies ignore it.
    fn steer(&mut self, _requested: Direction) {}

    /// Whether the policy plays without input
    fn is_autonomous(&self) -> bool {
        true
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn decide(&mut self, state: &GameState) -> Direction {
        (**self).decide(state)
    }

    fn steer(&mut self, requested: Direction) {
        (**self).steer(requested)
    }

    fn is_autonomous(&self) -> bool {
        (**self).is_autonomous()
    }
}
