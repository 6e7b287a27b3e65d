//! Session state and core game types
//!
//! Score, misses and level progression for one play session.

use serde::{Deserialize, Serialize};

use super::levels::LevelTable;
use crate::settings::Difficulty;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Difficulty selection, waiting for a click
    #[default]
    Menu,
    /// Song running, notes falling
    Playing,
    /// Result screen, waiting for a click
    GameOver,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Lose,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Win => "YOU WIN!",
            GameResult::Lose => "YOU LOSE!",
        }
    }
}

/// One play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u32,
    pub misses: u32,
    /// Beats resolved so far, hit or missed
    pub completed_beats: u32,
    /// 1-based
    pub current_level: u32,
    pub phase: GamePhase,
    pub result: Option<GameResult>,
    pub difficulty: Difficulty,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl GameSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            score: 0,
            misses: 0,
            completed_beats: 0,
            current_level: 1,
            phase: GamePhase::Menu,
            result: None,
            difficulty,
        }
    }

    /// Clear counters and enter Playing. Difficulty is kept.
    pub fn start(&mut self) {
        *self = Self {
            phase: GamePhase::Playing,
            ..Self::new(self.difficulty)
        };
    }

    /// A note was hit
    pub fn record_hit(&mut self) {
        self.score += 1;
        self.completed_beats += 1;
    }

    /// `count` notes fell off the field
    pub fn record_misses(&mut self, count: u32) {
        self.misses += count;
        self.completed_beats += count;
    }

    /// End the run if it is lost or finished. The miss limit is checked first,
    /// so a run that finishes on its 11th miss is a loss.
    pub fn check_game_over(&mut self, total_beats: u32, miss_limit: u32) -> Option<GameResult> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let result = if self.misses > miss_limit {
            GameResult::Lose
        } else if self.completed_beats >= total_beats {
            GameResult::Win
        } else {
            return None;
        };
        self.phase = GamePhase::GameOver;
        self.result = Some(result);
        Some(result)
    }

    /// Advance at most one level once the current level's beats are all
    /// resolved. Returns the new level.
    pub fn check_level_up(&mut self, levels: &LevelTable) -> Option<u32> {
        if self.current_level >= levels.max_level() {
            return None;
        }
        let entry = levels.level(self.current_level)?;
        if self.completed_beats >= entry.end_index() {
            self.current_level += 1;
            return Some(self.current_level);
        }
        None
    }

    /// Back to the menu with a fresh session. Difficulty is kept.
    pub fn return_to_menu(&mut self) {
        *self = Self::new(self.difficulty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels::distribute;

    fn playing() -> GameSession {
        let mut session = GameSession::new(Difficulty::Medium);
        session.start();
        session
    }

    #[test]
    fn test_start_resets_counters() {
        let mut session = playing();
        session.record_hit();
        session.record_misses(3);
        session.current_level = 4;
        session.phase = GamePhase::GameOver;
        session.result = Some(GameResult::Lose);

        session.start();
        assert_eq!(session.score, 0);
        assert_eq!(session.misses, 0);
        assert_eq!(session.completed_beats, 0);
        assert_eq!(session.current_level, 1);
        assert_eq!(session.result, None);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_menu_discards_finished_run() {
        let mut session = playing();
        session.record_hit();
        session.record_misses(11);
        session.check_game_over(30, 10);

        session.return_to_menu();
        assert_eq!(session, GameSession::new(Difficulty::Medium));
    }

    #[test]
    fn test_eleven_misses_lose() {
        let mut session = playing();
        for _ in 0..10 {
            session.record_misses(1);
            assert_eq!(session.check_game_over(100, 10), None);
        }
        session.record_misses(1);
        assert_eq!(session.check_game_over(100, 10), Some(GameResult::Lose));
        assert_eq!(session.phase, GamePhase::GameOver);
        // Already over: no second transition
        assert_eq!(session.check_game_over(100, 10), None);
    }

    #[test]
    fn test_all_beats_completed_wins() {
        let mut session = playing();
        session.completed_beats = 20;
        assert_eq!(session.check_game_over(20, 10), Some(GameResult::Win));
        assert_eq!(session.result, Some(GameResult::Win));
    }

    #[test]
    fn test_miss_check_takes_precedence() {
        let mut session = playing();
        session.record_misses(11);
        assert_eq!(session.completed_beats, 11);
        assert_eq!(session.check_game_over(11, 10), Some(GameResult::Lose));
    }

    #[test]
    fn test_level_up_one_step_per_check() {
        // 55 beats: level i has exactly i beats
        let levels = distribute(55, 10);
        let mut session = playing();

        session.record_hit();
        assert_eq!(session.check_level_up(&levels), Some(2));

        // Level 2 ends at 3 completed beats; jump past levels 2 and 3
        session.record_misses(5);
        assert_eq!(session.check_level_up(&levels), Some(3));
        assert_eq!(session.check_level_up(&levels), Some(4));
        assert_eq!(session.check_level_up(&levels), None);

        session.completed_beats = 55;
        while session.check_level_up(&levels).is_some() {}
        assert_eq!(session.current_level, 10);
    }
}
