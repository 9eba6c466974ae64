//! The tick loop body shared by every mode
//!
//! Per tick: the policy decides on a read-only view of the state, the
//! decision is optionally recorded, then the engine applies it and evaluates
//! terminal conditions.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::dataset::DatasetWriter;
use crate::game::{Direction, GameEngine, GameState, StepResult};
use crate::policy::Policy;

/// What happened on one tick
#[derive(Debug, Clone)]
pub struct Tick {
    pub direction: Direction,
    pub result: StepResult,
    /// Time spent in `Policy::decide`
    pub decision_time: Duration,
}

pub struct TickDriver {
    engine: GameEngine,
    state: GameState,
    policy: Box<dyn Policy>,
    recorder: Option<DatasetWriter>,
    episode: u32,
}

impl TickDriver {
    pub fn new(mut engine: GameEngine, policy: Box<dyn Policy>) -> Self {
        let state = engine.reset();
        Self {
            engine,
            state,
            policy,
            recorder: None,
            episode: 1,
        }
    }

    /// Record every decided tick to `recorder`
    pub fn with_recorder(mut self, recorder: DatasetWriter) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn policy_name(&self) -> String {
        self.policy.name()
    }

    pub fn is_autonomous(&self) -> bool {
        self.policy.is_autonomous()
    }

    /// Episodes started so far, counting the current one
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn recorder(&self) -> Option<&DatasetWriter> {
        self.recorder.as_ref()
    }

    /// Forward a directional key to the policy
    pub fn steer(&mut self, requested: Direction) {
        self.policy.steer(requested);
    }

    /// Advance one tick. Returns `None` once the episode is over.
    pub fn tick(&mut self) -> Result<Option<Tick>> {
        if !self.state.is_alive() {
            return Ok(None);
        }

        let started = Instant::now();
        let direction = self.policy.decide(&self.state);
        let decision_time = started.elapsed();

        if let Some(recorder) = self.recorder.as_mut() {
            let future_score = if recorder.includes_future_score() {
                self.engine.future_score(&self.state, direction)
            } else {
                0
            };
            recorder.record(&self.state, direction, future_score)?;
        }

        let result = self.engine.step(&mut self.state, direction);

        if result.info.ate_food {
            tracing::debug!(score = self.state.score, length = self.state.snake.len(), "ate food");
        }
        if result.terminated {
            tracing::info!(
                episode = self.episode,
                score = self.state.score,
                length = self.state.snake.len(),
                steps = self.state.steps,
                cause = result.info.end_cause().unwrap_or("unknown"),
                "episode over"
            );
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.flush()?;
            }
        }

        Ok(Some(Tick {
            direction,
            result,
            decision_time,
        }))
    }

    /// Start a new episode
    pub fn reset(&mut self) {
        self.state = self.engine.reset();
        self.episode += 1;
        tracing::debug!(episode = self.episode, "episode started");
    }

    pub fn flush(&mut self) -> Result<()> {
        match self.recorder.as_mut() {
            Some(recorder) => recorder.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetFormat;
    use crate::features::FeatureSchema;
    use crate::game::{GameConfig, Outcome};
    use crate::policy::{AreaMaximizingPolicy, AxisGreedyPolicy, ManualPolicy};
    use tempfile::tempdir;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::default().with_seed(11))
    }

    #[test]
    fn test_tick_moves_one_cell() {
        let mut driver = TickDriver::new(engine(), Box::new(AreaMaximizingPolicy::new()));
        let head = driver.state().head();

        let tick = driver.tick().unwrap().unwrap();

        assert!(!tick.result.terminated);
        assert_eq!(driver.state().head(), head.stepped(tick.direction, 10));
        assert_eq!(driver.state().steps, 1);
    }

    #[test]
    fn test_manual_runs_into_wall() {
        // Facing right from x=100 on a 480 frame: 38 moves reach x=480.
        let mut driver = TickDriver::new(engine(), Box::new(ManualPolicy::new()));
        let mut ticks = 0;
        while let Some(tick) = driver.tick().unwrap() {
            ticks += 1;
            if tick.result.terminated {
                assert_eq!(tick.result.info.end_cause(), Some("wall"));
            }
        }

        assert_eq!(driver.state().outcome, Outcome::GameOver);
        assert!(ticks <= 38);
        assert!(driver.tick().unwrap().is_none());
    }

    #[test]
    fn test_steer_reaches_policy() {
        let mut driver = TickDriver::new(engine(), Box::new(ManualPolicy::new()));
        driver.steer(Direction::Up);
        let tick = driver.tick().unwrap().unwrap();
        assert_eq!(tick.direction, Direction::Up);
        assert!(!driver.is_autonomous());
    }

    #[test]
    fn test_reset_starts_new_episode() {
        let mut driver = TickDriver::new(engine(), Box::new(ManualPolicy::new()));
        while driver.tick().unwrap().is_some() {}

        driver.reset();

        assert!(driver.state().is_alive());
        assert_eq!(driver.state().score, 0);
        assert_eq!(driver.episode(), 2);
    }

    #[test]
    fn test_records_one_row_per_tick() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ticks.csv");
        let recorder = DatasetWriter::open(&path, DatasetFormat::Csv, FeatureSchema::Basic, true).unwrap();

        let mut driver =
            TickDriver::new(engine(), Box::new(AxisGreedyPolicy::default())).with_recorder(recorder);
        for _ in 0..5 {
            driver.tick().unwrap();
        }
        driver.flush().unwrap();
        assert_eq!(driver.recorder().unwrap().rows(), 5);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with(",future_score,direction"));
    }
}
