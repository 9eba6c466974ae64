use std::time::{Duration, Instant};

/// Session-level counters shown in the interactive header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: Option<i32>,
    pub last_score: Option<i32>,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: None,
            last_score: None,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Scores go negative through the step penalty, so the first game sets the high score
    pub fn on_game_over(&mut self, final_score: i32) {
        self.games_played += 1;
        self.last_score = Some(final_score);
        if self.high_score.map_or(true, |best| final_score > best) {
            self.high_score = Some(final_score);
        }
    }

    pub fn format_high_score(&self) -> String {
        self.high_score
            .map_or_else(|| "-".to_string(), |score| score.to_string())
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
