//! Statistics over many episodes of an autonomous policy
//!
//! Rolling windows give smoothed progress lines; totals and the death-cause
//! histogram cover the whole run.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Cause recorded for episodes stopped by the step cap
pub const TRUNCATED: &str = "truncated";

/// Final numbers of one episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub score: i32,
    /// Snake length at the end
    pub length: usize,
    pub steps: u32,
    pub food_eaten: u32,
    /// `wall`, `self`, `board full` or `truncated`
    pub cause: String,
}

#[derive(Debug, Clone)]
pub struct EpisodeStats {
    scores: VecDeque<i32>,
    lengths: VecDeque<usize>,
    food: VecDeque<u32>,

    /// Sums over every episode, for the final means
    score_sum: i64,
    length_sum: usize,
    max_score: Option<i32>,
    max_length: usize,
    causes: BTreeMap<String, u32>,

    decision_time: Duration,
    decisions: u64,

    total_episodes: usize,
    total_steps: u64,
    window_size: usize,
}

impl EpisodeStats {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            scores: VecDeque::with_capacity(window_size),
            lengths: VecDeque::with_capacity(window_size),
            food: VecDeque::with_capacity(window_size),
            score_sum: 0,
            length_sum: 0,
            max_score: None,
            max_length: 0,
            causes: BTreeMap::new(),
            decision_time: Duration::ZERO,
            decisions: 0,
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    pub fn record_episode(&mut self, record: &EpisodeRecord) {
        Self::push_deque(&mut self.scores, record.score, self.window_size);
        Self::push_deque(&mut self.lengths, record.length, self.window_size);
        Self::push_deque(&mut self.food, record.food_eaten, self.window_size);

        self.score_sum += i64::from(record.score);
        self.length_sum += record.length;
        self.max_score = Some(self.max_score.map_or(record.score, |m| m.max(record.score)));
        self.max_length = self.max_length.max(record.length);
        *self.causes.entry(record.cause.clone()).or_insert(0) += 1;

        self.total_episodes += 1;
        self.total_steps += u64::from(record.steps);
    }

    /// Time spent in one `Policy::decide` call
    pub fn record_decision(&mut self, elapsed: Duration) {
        self.decision_time += elapsed;
        self.decisions += 1;
    }

    pub fn rolling_mean_score(&self) -> f64 {
        Self::mean(self.scores.iter().map(|&s| f64::from(s)), self.scores.len())
    }

    pub fn rolling_mean_length(&self) -> f64 {
        Self::mean(self.lengths.iter().map(|&l| l as f64), self.lengths.len())
    }

    pub fn rolling_mean_food(&self) -> f64 {
        Self::mean(self.food.iter().map(|&f| f64::from(f)), self.food.len())
    }

    pub fn mean_score(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.score_sum as f64 / self.total_episodes as f64
        }
    }

    pub fn mean_length(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.length_sum as f64 / self.total_episodes as f64
        }
    }

    pub fn max_score(&self) -> Option<i32> {
        self.max_score
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Episodes per end cause, sorted by cause
    pub fn causes(&self) -> &BTreeMap<String, u32> {
        &self.causes
    }

    pub fn mean_decision_time(&self) -> Duration {
        if self.decisions == 0 {
            Duration::ZERO
        } else {
            let nanos = self.decision_time.as_nanos() / u128::from(self.decisions);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line progress with rolling means
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Score: {:.1} | Len: {:.1} | Food: {:.2} | Decide: {:.1}us",
            self.total_episodes,
            self.total_steps,
            self.rolling_mean_score(),
            self.rolling_mean_length(),
            self.rolling_mean_food(),
            self.mean_decision_time().as_secs_f64() * 1e6,
        )
    }

    /// Multi-line report over the whole run
    pub fn format_report(&self) -> String {
        let causes = self
            .causes
            .iter()
            .map(|(cause, count)| format!("{cause}={count}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            format!("Episodes:      {}", self.total_episodes),
            format!("Total steps:   {}", self.total_steps),
            format!("Mean score:    {:.2}", self.mean_score()),
            format!(
                "Max score:     {}",
                self.max_score.map_or_else(|| "-".to_string(), |s| s.to_string())
            ),
            format!("Mean length:   {:.2}", self.mean_length()),
            format!("Max length:    {}", self.max_length),
            format!("End causes:    {}", if causes.is_empty() { "-".to_string() } else { causes }),
        ];
        lines.push(format!(
            "Mean decision: {:.1}us over {} ticks",
            self.mean_decision_time().as_secs_f64() * 1e6,
            self.decisions
        ));
        lines.join("\n")
    }

    fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else {
            values.sum::<f64>() / len as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: i32, length: usize, steps: u32, cause: &str) -> EpisodeRecord {
        EpisodeRecord {
            score,
            length,
            steps,
            food_eaten: (length - 3) as u32,
            cause: cause.to_string(),
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = EpisodeStats::new(100);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.mean_score(), 0.0);
        assert_eq!(stats.rolling_mean_length(), 0.0);
        assert_eq!(stats.max_score(), None);
        assert_eq!(stats.mean_decision_time(), Duration::ZERO);
        assert!(stats.format_report().contains("End causes:    -"));
    }

    #[test]
    fn test_record_episode() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(&record(150, 5, 50, "wall"));

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_steps(), 50);
        assert_eq!(stats.max_score(), Some(150));
        assert!((stats.mean_length() - 5.0).abs() < 1e-9);
        assert!((stats.rolling_mean_food() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_window_evicts() {
        let mut stats = EpisodeStats::new(3);
        stats.record_episode(&record(-10, 3, 10, "wall"));
        stats.record_episode(&record(20, 4, 20, "self"));
        stats.record_episode(&record(50, 5, 30, "wall"));
        assert!((stats.rolling_mean_score() - 20.0).abs() < 1e-9);

        stats.record_episode(&record(80, 6, 40, "wall"));

        // (20 + 50 + 80) / 3
        assert!((stats.rolling_mean_score() - 50.0).abs() < 1e-9);
        // Whole-run mean keeps the first episode: (-10 + 20 + 50 + 80) / 4
        assert!((stats.mean_score() - 35.0).abs() < 1e-9);
        assert_eq!(stats.total_steps(), 100);
    }

    #[test]
    fn test_negative_max_score() {
        let mut stats = EpisodeStats::new(10);
        stats.record_episode(&record(-30, 3, 30, "wall"));
        stats.record_episode(&record(-12, 3, 12, "self"));
        assert_eq!(stats.max_score(), Some(-12));
    }

    #[test]
    fn test_cause_histogram() {
        let mut stats = EpisodeStats::new(10);
        stats.record_episode(&record(1, 3, 1, "wall"));
        stats.record_episode(&record(1, 3, 1, TRUNCATED));
        stats.record_episode(&record(1, 3, 1, "wall"));

        assert_eq!(stats.causes().get("wall"), Some(&2));
        assert_eq!(stats.causes().get(TRUNCATED), Some(&1));
        assert!(stats.format_report().contains("End causes:    truncated=1, wall=2"));
    }

    #[test]
    fn test_decision_latency() {
        let mut stats = EpisodeStats::new(10);
        stats.record_decision(Duration::from_micros(10));
        stats.record_decision(Duration::from_micros(30));
        assert_eq!(stats.mean_decision_time(), Duration::from_micros(20));
        assert!(stats.format_summary().contains("Decide: 20.0us"));
    }

    #[test]
    fn test_decision_latency_past_u32_count() {
        let mut stats = EpisodeStats::new(10);
        stats.decisions = 1 << 32;
        stats.decision_time = Duration::from_secs(1 << 33);
        assert_eq!(stats.mean_decision_time(), Duration::from_secs(2));
    }

    #[test]
    fn test_format_summary() {
        let mut stats = EpisodeStats::new(100);
        stats.record_episode(&record(250, 6, 150, "self"));

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Score: 250.0"));
        assert!(summary.contains("Len: 6.0"));
        assert!(summary.contains("Food: 3.00"));
    }
}
