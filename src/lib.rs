//! Snake Eater - a grid snake game driven by pluggable movement policies
//!
//! This library provides:
//! - Core game logic and the tick rules (game module)
//! - Move safety and reachable-area analysis (analysis module)
//! - Manual, greedy, area-maximizing and model-driven policies (policy module)
//! - Feature vectors, predictors and dataset logging for learned models
//! - TUI rendering and the interactive / benchmark modes

pub mod analysis;
pub mod dataset;
pub mod driver;
pub mod features;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod predictor;
pub mod render;
pub mod telemetry;
