//! High score leaderboard system
//!
//! Tracks the top 10 runs, best score first and fewer misses breaking ties.
//! Persisted to a JSON file; storage failures are logged and ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Initials are stored uppercase, at most this many characters
pub const INITIALS_LEN: usize = 3;

/// Leaderboard as seen by the game loop
pub trait HighScoreStore {
    /// Would this run make the board?
    fn is_high_score(&self, score: u32, misses: u32) -> bool;
    /// Record a run. Returns the 1-based rank, or None if it didn't place.
    fn add_score(&mut self, initials: &str, score: u32, misses: u32) -> Option<usize>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub initials: String,
    pub score: u32,
    pub misses: u32,
    /// Unix time (seconds) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Strict ordering: higher score, then fewer misses
    fn beats(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score || (self.score == other.score && self.misses < other.misses)
    }
}

/// High score leaderboard, stored as a bare JSON list of entries
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, score: u32, misses: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        let candidate = HighScoreEntry {
            initials: String::new(),
            score,
            misses,
            timestamp: 0.0,
        };
        self.entries
            .last()
            .map(|worst| candidate.beats(worst))
            .unwrap_or(true)
    }

    /// Insert a run, keeping the board sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn insert(&mut self, initials: &str, score: u32, misses: u32, timestamp: f64) -> Option<usize> {
        let entry = HighScoreEntry {
            initials: normalize_initials(initials),
            score,
            misses,
            timestamp,
        };

        // Ties with an existing entry go after it
        let pos = self
            .entries
            .iter()
            .position(|e| entry.beats(e))
            .unwrap_or(self.entries.len());
        if pos >= MAX_HIGH_SCORES {
            return None;
        }

        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Get the top `count` entries
    pub fn top(&self, count: usize) -> &[HighScoreEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from disk, starting fresh when missing or corrupt
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<HighScores>(path) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| {
                    b.score.cmp(&a.score).then(a.misses.cmp(&b.misses))
                });
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(PersistError::Missing { .. }) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("{e}; starting with an empty leaderboard");
                Self::new()
            }
        }
    }

    /// Save high scores to disk
    pub fn save(&self, path: &Path) {
        match persistence::save_json(path, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {e}"),
        }
    }
}

fn normalize_initials(initials: &str) -> String {
    initials
        .trim()
        .chars()
        .take(INITIALS_LEN)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Current wall-clock time as Unix seconds
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Leaderboard backed by a JSON file, saved after every accepted run
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
    scores: HighScores,
}

impl HighScoreFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = HighScores::load(&path);
        Self { path, scores }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl HighScoreStore for HighScoreFile {
    fn is_high_score(&self, score: u32, misses: u32) -> bool {
        self.scores.qualifies(score, misses)
    }

    fn add_score(&mut self, initials: &str, score: u32, misses: u32) -> Option<usize> {
        let rank = self.scores.insert(initials, score, misses, now_secs());
        if rank.is_some() {
            self.scores.save(&self.path);
        }
        rank
    }
}

impl HighScoreStore for HighScores {
    fn is_high_score(&self, score: u32, misses: u32) -> bool {
        self.qualifies(score, misses)
    }

    fn add_score(&mut self, initials: &str, score: u32, misses: u32) -> Option<usize> {
        self.insert(initials, score, misses, now_secs())
    }
}
