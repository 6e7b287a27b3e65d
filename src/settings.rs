//! Game settings and tuning
//!
//! Persisted as JSON next to the high score file. Missing fields fall back to
//! the defaults in [`crate::consts`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence;
use crate::sim::flick::FlickTuning;

/// Difficulty levels, selected with the rotary encoder in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Custom => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "custom" => Some(Difficulty::Custom),
            _ => None,
        }
    }

    /// Menu index (0-3)
    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::Custom => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wraps any encoder position onto the four entries
    pub fn from_position(position: i32) -> Self {
        Self::ALL[position.rem_euclid(Self::ALL.len() as i32) as usize]
    }

    /// Note height in pixels; the hit window is half of this
    pub fn note_height(&self) -> f64 {
        match self {
            Difficulty::Easy => 12.0,
            Difficulty::Medium => 9.0,
            Difficulty::Hard | Difficulty::Custom => 6.0,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Input polling interval (seconds)
    pub input_interval: f64,
    /// Display refresh rate; the visual cadence is `1 / fps`
    pub fps: f64,

    // === Playfield ===
    pub display_height: f64,
    pub hit_y: f64,
    /// Note fall speed (pixels per frame)
    pub fall_speed: f64,

    // === Rules ===
    pub miss_limit: u32,
    pub max_level: u32,
    /// Difficulty highlighted when the menu first opens
    pub difficulty: Difficulty,

    // === Motion ===
    pub flick: FlickTuning,
    pub calibration_samples: usize,

    // === Audio ===
    /// Track number handed to the audio module on game start
    pub track: u16,
    /// Volume set at startup (0 - VOLUME_MAX)
    pub volume: u8,

    /// Where the leaderboard is stored
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_interval: INPUT_INTERVAL,
            fps: FPS,

            display_height: DISPLAY_HEIGHT,
            hit_y: HIT_Y,
            fall_speed: FALL_SPEED,

            miss_limit: MISS_LIMIT,
            max_level: MAX_LEVEL,
            difficulty: Difficulty::Easy,

            flick: FlickTuning::default(),
            calibration_samples: CALIBRATION_SAMPLES,

            track: DEFAULT_TRACK,
            volume: DEFAULT_VOLUME,

            high_score_path: PathBuf::from("high_scores.json"),
        }
    }
}

impl Settings {
    /// Visual cadence interval (seconds)
    pub fn visual_interval(&self) -> f64 {
        1.0 / self.fps
    }

    /// Seconds a note needs to fall from the top to the hit line
    pub fn fall_time(&self) -> f64 {
        self.hit_y / (self.fall_speed * self.fps)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(persistence::PersistError::Missing { .. }) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) {
        match persistence::save_json(path, self) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }

    /// Replace values that would stall the loop or divide by zero
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.fps.is_finite() && self.fps > 0.0) {
            log::warn!("Invalid fps {}, using {}", self.fps, defaults.fps);
            self.fps = defaults.fps;
        }
        if !(self.fall_speed.is_finite() && self.fall_speed > 0.0) {
            log::warn!(
                "Invalid fall speed {}, using {}",
                self.fall_speed,
                defaults.fall_speed
            );
            self.fall_speed = defaults.fall_speed;
        }
        if !(self.input_interval.is_finite() && self.input_interval >= 0.0) {
            self.input_interval = defaults.input_interval;
        }
        self.volume = self.volume.min(VOLUME_MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hardware() {
        let s = Settings::default();
        assert!((s.visual_interval() - 1.0 / 30.0).abs() < 1e-12);
        // 56px at 1.5px/frame * 30fps
        assert!((s.fall_time() - 56.0 / 45.0).abs() < 1e-12);
        assert_eq!(s.miss_limit, 10);
        assert_eq!(s.max_level, 10);
    }

    #[test]
    fn test_difficulty_from_position_wraps() {
        assert_eq!(Difficulty::from_position(0), Difficulty::Easy);
        assert_eq!(Difficulty::from_position(3), Difficulty::Custom);
        assert_eq!(Difficulty::from_position(5), Difficulty::Medium);
        assert_eq!(Difficulty::from_position(-1), Difficulty::Custom);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_index(d.index()), Some(d));
        }
        assert_eq!(Difficulty::from_index(4), None);
    }

    #[test]
    fn test_note_heights() {
        assert_eq!(Difficulty::Easy.note_height(), 12.0);
        assert_eq!(Difficulty::Medium.note_height(), 9.0);
        assert_eq!(Difficulty::Hard.note_height(), 6.0);
        assert_eq!(Difficulty::Custom.note_height(), 6.0);
        assert_eq!(Difficulty::from_str("MED"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("insane"), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"fps": 60.0, "flick": {"threshold": 2.0}, "volume": 99}"#).unwrap();

        let s = Settings::load(&path);
        assert_eq!(s.fps, 60.0);
        assert_eq!(s.flick.threshold, 2.0);
        assert_eq!(s.flick.lowpass_alpha, 0.6);
        assert_eq!(s.volume, VOLUME_MAX);
        assert_eq!(s.hit_y, HIT_Y);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            difficulty: Difficulty::Hard,
            track: 7,
            ..Default::default()
        };
        settings.save(&path);
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        let corrupt = dir.path().join("bad.json");
        std::fs::write(&corrupt, "{{{").unwrap();
        assert_eq!(Settings::load(&corrupt), Settings::default());
    }
}
