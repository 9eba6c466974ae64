//! Headless evaluation of an autonomous policy
//!
//! Plays a fixed number of episodes as fast as possible and reports rolling
//! progress plus a final summary. Episodes that reach the step cap are
//! counted as truncated rather than lost.

use anyhow::{Result, bail};

use crate::driver::TickDriver;
use crate::metrics::episode_stats::TRUNCATED;
use crate::metrics::{EpisodeRecord, EpisodeStats};

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub num_episodes: usize,

    /// Per-episode step cap; unlimited when `None`
    pub max_steps: Option<u32>,

    /// Print progress every N episodes
    pub log_frequency: usize,

    /// Episodes in the rolling window
    pub window_size: usize,
}

impl BenchConfig {
    pub fn new(num_episodes: usize) -> Self {
        Self {
            num_episodes,
            max_steps: Some(10_000),
            log_frequency: 10,
            window_size: 100,
        }
    }
}

pub struct BenchMode {
    driver: TickDriver,
    stats: EpisodeStats,
    config: BenchConfig,
}

impl BenchMode {
    pub fn new(driver: TickDriver, config: BenchConfig) -> Self {
        let stats = EpisodeStats::new(config.window_size);
        Self {
            driver,
            stats,
            config,
        }
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn run(&mut self) -> Result<&EpisodeStats> {
        if !self.driver.is_autonomous() {
            bail!(
                "policy '{}' needs keyboard input and cannot be benchmarked",
                self.driver.policy_name()
            );
        }

        self.print_header();

        for episode in 0..self.config.num_episodes {
            if episode > 0 {
                self.driver.reset();
            }

            let record = self.run_episode()?;
            self.stats.record_episode(&record);

            if self.config.log_frequency > 0 && (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }
        }

        self.driver.flush()?;

        println!("\nBenchmark complete!");
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_report());
        tracing::info!(
            episodes = self.stats.total_episodes(),
            mean_score = self.stats.mean_score(),
            "benchmark finished"
        );

        Ok(&self.stats)
    }

    /// Play the current episode to its end or to the step cap
    fn run_episode(&mut self) -> Result<EpisodeRecord> {
        let mut food_eaten = 0;
        let mut cause = None;

        while let Some(tick) = self.driver.tick()? {
            self.stats.record_decision(tick.decision_time);
            if tick.result.info.ate_food {
                food_eaten += 1;
            }
            if tick.result.terminated {
                cause = Some(tick.result.info.end_cause().unwrap_or("unknown"));
                break;
            }
            if self
                .config
                .max_steps
                .is_some_and(|cap| self.driver.state().steps >= cap)
            {
                tracing::debug!(episode = self.driver.episode(), "episode truncated");
                cause = Some(TRUNCATED);
                break;
            }
        }

        let state = self.driver.state();
        Ok(EpisodeRecord {
            score: state.score,
            length: state.snake.len(),
            steps: state.steps,
            food_eaten,
            cause: cause.unwrap_or("unknown").to_string(),
        })
    }

    fn print_header(&self) {
        let config = self.driver.engine().config();
        println!("{}", "=".repeat(70));
        println!("Policy Benchmark - Snake Eater");
        println!("{}", "=".repeat(70));
        println!("Policy: {}", self.driver.policy_name());
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Board: {}x{} px, cell {} ({}x{} cells)",
            config.frame_width,
            config.frame_height,
            config.cell_size,
            config.cols(),
            config.rows()
        );
        match self.config.max_steps {
            Some(cap) => println!("Step cap: {} per episode", cap),
            None => println!("Step cap: none"),
        }
        if let Some(recorder) = self.driver.recorder() {
            println!("Dataset: {:?}", recorder.path());
        }
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] {}",
            episode,
            self.config.num_episodes,
            self.stats.format_summary()
        );
    }
}
