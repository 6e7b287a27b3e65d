//! Progressive level distribution
//!
//! Splits a beat map into levels with triangular weighting: level `i` gets
//! `i` parts out of `max_level * (max_level + 1) / 2`, so later levels are longer.

use serde::{Deserialize, Serialize};

/// Slice of the beat map belonging to one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Index of the level's first beat in the beat map
    pub start_index: u32,
    pub beat_count: u32,
}

impl LevelEntry {
    /// Completed-beat count at which this level is finished
    pub fn end_index(&self) -> u32 {
        self.start_index + self.beat_count
    }
}

/// Per-level table, computed once per beat map
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelTable {
    entries: Vec<LevelEntry>,
}

impl LevelTable {
    /// Entry for a 1-based level number
    pub fn level(&self, level: u32) -> Option<&LevelEntry> {
        level
            .checked_sub(1)
            .and_then(|i| self.entries.get(i as usize))
    }

    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    pub fn max_level(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Sum of all level beat counts
    pub fn total_beats(&self) -> u32 {
        self.entries.iter().map(|e| e.beat_count).sum()
    }
}

/// Distribute `total_beats` over levels `1..=max_level`.
///
/// Each level is floored independently with a minimum of one beat. Beats lost
/// to flooring are appended to the last level. When `total_beats < max_level`
/// the one-beat minimums overshoot the total and nothing is taken back.
pub fn distribute(total_beats: u32, max_level: u32) -> LevelTable {
    if max_level == 0 {
        return LevelTable::default();
    }
    let total_parts = u64::from(max_level) * (u64::from(max_level) + 1) / 2;
    let mut entries = Vec::with_capacity(max_level as usize);
    let mut cumulative: u32 = 0;

    for level in 1..=max_level {
        let share = u64::from(total_beats) * u64::from(level) / total_parts;
        let beat_count = (share as u32).max(1);
        entries.push(LevelEntry {
            start_index: cumulative,
            beat_count,
        });
        cumulative += beat_count;

        log::debug!(
            "Level {}: {} beats ({:.1}%) - start index {}",
            level,
            beat_count,
            level as f64 / total_parts as f64 * 100.0,
            cumulative - beat_count
        );
    }

    if let Some(last) = entries.last_mut() {
        if let Some(leftover) = total_beats.checked_sub(cumulative).filter(|n| *n > 0) {
            last.beat_count += leftover;
            log::debug!(
                "Added {} leftover beats to level {} (now {})",
                leftover,
                max_level,
                last.beat_count
            );
        }
    }

    let table = LevelTable { entries };
    log::debug!(
        "Total beats distributed: {}/{}",
        table.total_beats(),
        total_beats
    );
    table
}
