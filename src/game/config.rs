use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::direction::Direction;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the game
///
/// All coordinates are in frame units; the snake moves one `cell_size` per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the play field
    pub frame_width: i32,
    /// Height of the play field
    pub frame_height: i32,
    /// Side of one grid cell, the movement increment
    pub cell_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Head position at the start of an episode
    pub start_x: i32,
    pub start_y: i32,
    /// Facing at the start of an episode; the body trails behind it
    pub start_direction: Direction,

    /// Score added when food is eaten
    pub food_reward: i32,
    /// Score removed on every tick without food
    pub step_penalty: i32,

    /// Seed for food placement. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_width: 480,
            frame_height: 480,
            cell_size: 10,
            initial_snake_length: 3,
            start_x: 100,
            start_y: 50,
            start_direction: Direction::Right,
            food_reward: 100,
            step_penalty: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom frame size
    pub fn new(frame_width: i32, frame_height: i32) -> Self {
        Self {
            frame_width,
            frame_height,
            ..Default::default()
        }
    }

    /// Create a small field for testing
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cell columns
    pub fn cols(&self) -> i32 {
        self.frame_width / self.cell_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.frame_height / self.cell_size
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err(String)` with an error message when a value is out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0 {
            return Err(format!("cell_size must be positive, got {}", self.cell_size));
        }

        for (name, value) in [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
        ] {
            if value <= 0 {
                return Err(format!("{name} must be positive, got {value}"));
            }
            if value % self.cell_size != 0 {
                return Err(format!(
                    "{name} ({value}) must be a multiple of cell_size ({})",
                    self.cell_size
                ));
            }
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.start_x % self.cell_size != 0 || self.start_y % self.cell_size != 0 {
            return Err(format!(
                "start position ({}, {}) is not aligned to cell_size {}",
                self.start_x, self.start_y, self.cell_size
            ));
        }

        // The whole starting body trails behind the head and must fit.
        let (dx, dy) = self.start_direction.delta();
        let trail = (self.initial_snake_length as i32 - 1) * self.cell_size;
        let tail_x = self.start_x - dx * trail;
        let tail_y = self.start_y - dy * trail;
        let inside = |x: i32, y: i32| {
            x >= 0 && x < self.frame_width && y >= 0 && y < self.frame_height
        };
        if !inside(self.start_x, self.start_y) || !inside(tail_x, tail_y) {
            return Err(format!(
                "starting body from ({}, {}) to ({tail_x}, {tail_y}) leaves the {}x{} frame",
                self.start_x, self.start_y, self.frame_width, self.frame_height
            ));
        }

        if self.cols() < 2 || self.rows() < 2 {
            return Err("frame must be at least 2x2 cells".to_string());
        }

        Ok(())
    }
}
