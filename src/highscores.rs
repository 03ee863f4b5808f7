//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::platform;
use crate::sim::RunSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level the run ended on
    pub level: u32,
    /// Pins resolved over the run
    pub pins_placed: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "pin_ring_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a finished run. Returns the rank achieved (1-indexed).
    pub fn record(&mut self, run: &RunSummary, timestamp: f64) -> Option<usize> {
        if !self.qualifies(run.final_score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: run.final_score,
            level: run.level,
            pins_placed: run.pins_placed,
            timestamp,
        };

        // Ties keep the older run ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score so far (0 when empty), used to seed a session
    pub fn best(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.score)
    }

    /// Load high scores from LocalStorage
    pub fn load() -> Self {
        match platform::load_json::<HighScores>(Self::STORAGE_KEY) {
            Some(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to LocalStorage
    pub fn save(&self) {
        if platform::save_json(Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunSummary {
        RunSummary {
            final_score: score,
            level: 2,
            pins_placed: (score / 10) as u32,
            new_high_score: false,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&run(0), 0.0), None);
        assert!(scores.is_empty());
        assert_eq!(scores.best(), 0);
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&run(50), 1.0), Some(1));
        assert_eq!(scores.record(&run(120), 2.0), Some(1));
        assert_eq!(scores.record(&run(80), 3.0), Some(2));
        assert_eq!(scores.best(), 120);
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![120, 80, 50]);
        assert_eq!(scores.entries[1].pins_placed, 8);
    }

    #[test]
    fn test_full_board_trims() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.record(&run(i * 10), i as f64);
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.record(&run(15), 99.0), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }
}
