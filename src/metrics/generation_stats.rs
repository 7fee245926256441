//! Fitness statistics across generations
//!
//! Each evaluated generation is reduced to a [`FitnessSummary`]; the
//! [`GenerationStats`] tracker keeps the latest one plus a rolling window of
//! best scores for smoothed progress reporting.

use std::collections::VecDeque;

/// Best, average and median normalized fitness of one generation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessSummary {
    pub best: f64,
    pub average: f64,
    pub median: f64,
}

impl FitnessSummary {
    /// Summarize fitness values already sorted in descending order
    ///
    /// Returns the default (all zero) summary for an empty slice.
    ///
    /// # Example
    ///
    /// ```rust
    /// use neuro_snake::metrics::FitnessSummary;
    ///
    /// let summary = FitnessSummary::from_sorted(&[9.0, 5.0, 4.0, 2.0]);
    /// assert_eq!(summary.best, 9.0);
    /// assert_eq!(summary.average, 5.0);
    /// assert_eq!(summary.median, 4.5);
    /// ```
    pub fn from_sorted(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self::default();
        }

        let n = fitness.len();
        let median = if n % 2 == 0 {
            (fitness[n / 2 - 1] + fitness[n / 2]) / 2.0
        } else {
            fitness[n / 2]
        };

        Self {
            best: fitness[0],
            average: fitness.iter().sum::<f64>() / n as f64,
            median,
        }
    }
}

/// Tracker of per-generation summaries with a rolling best-fitness window
///
/// # Example
///
/// ```rust
/// use neuro_snake::metrics::{FitnessSummary, GenerationStats};
///
/// let mut stats = GenerationStats::new(10);
/// stats.record_generation(FitnessSummary::from_sorted(&[12.0, 8.0]), 2);
///
/// assert_eq!(stats.generations(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct GenerationStats {
    /// Best fitness of recent generations (rolling window)
    best_history: VecDeque<f64>,

    /// Summary of the most recent generation
    latest: FitnessSummary,

    /// Best fitness seen in any generation
    all_time_best: f64,

    /// Generations recorded so far
    generations: usize,

    /// Games played across all generations
    total_games: usize,

    /// Window size for the rolling best average
    window_size: usize,
}

impl GenerationStats {
    /// Create a tracker averaging best fitness over `window_size` generations
    pub fn new(window_size: usize) -> Self {
        Self {
            best_history: VecDeque::with_capacity(window_size),
            latest: FitnessSummary::default(),
            all_time_best: 0.0,
            generations: 0,
            total_games: 0,
            window_size,
        }
    }

    /// Record one evaluated generation and the number of games it took
    pub fn record_generation(&mut self, summary: FitnessSummary, games: usize) {
        if self.best_history.len() >= self.window_size {
            self.best_history.pop_front();
        }
        self.best_history.push_back(summary.best);

        if self.generations == 0 || summary.best > self.all_time_best {
            self.all_time_best = summary.best;
        }
        self.latest = summary;
        self.generations += 1;
        self.total_games += games;
    }

    pub fn latest(&self) -> FitnessSummary {
        self.latest
    }

    pub fn all_time_best(&self) -> f64 {
        self.all_time_best
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }

    /// Mean of the best fitness over the rolling window, 0.0 if empty
    pub fn mean_recent_best(&self) -> f64 {
        if self.best_history.is_empty() {
            0.0
        } else {
            self.best_history.iter().sum::<f64>() / self.best_history.len() as f64
        }
    }

    /// One-line summary of the latest generation
    pub fn format_summary(&self) -> String {
        format!(
            "Gen: {} | Games: {} | Best: {:.2} | Avg: {:.2} | Median: {:.2} | Recent best: {:.2} | All-time: {:.2}",
            self.generations,
            self.total_games,
            self.latest.best,
            self.latest.average,
            self.latest.median,
            self.mean_recent_best(),
            self.all_time_best,
        )
    }
}
