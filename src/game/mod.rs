//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Policies decide a direction; the engine applies it with the tick rules.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Outcome, Position, Snake};

/// Build a 480x480, cell-10 state from raw segments. Test helper.
#[cfg(test)]
pub(crate) fn test_state(body: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameState {
    let body = body.iter().copied().map(Position::from).collect();
    GameState::new(
        Snake::from_body(body, direction),
        Position::from(food),
        480,
        480,
        10,
    )
}
