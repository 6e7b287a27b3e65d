//! Beat Flick - real-time core of a four-lane rhythm game
//!
//! Core modules:
//! - `sim`: Game logic (state machine, note timing, level table, flick filter)
//! - `beatmap`: Beat map loading and normalization
//! - `renderer`: Display collaborator contract plus a headless implementation
//! - `audio`: Audio playback collaborator contract
//! - `platform`: Button/rotary/accelerometer/pixel abstractions
//! - `persistence`: JSON save/load helpers
//! - `highscores`: Top-10 leaderboard
//! - `autoplay`: Simulated player for headless demo runs

pub mod audio;
pub mod autoplay;
pub mod beatmap;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

#[cfg(test)]
pub(crate) mod testing;

pub use beatmap::{BeatEvent, BeatMap, NoteKind};
pub use highscores::{HighScoreStore, HighScores};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Input polling cadence (seconds)
    pub const INPUT_INTERVAL: f64 = 0.005;
    /// Display refresh rate (frames per second)
    pub const FPS: f64 = 30.0;

    /// Display dimensions (pixels)
    pub const DISPLAY_WIDTH: u32 = 128;
    pub const DISPLAY_HEIGHT: f64 = 64.0;
    /// Number of note lanes (one button per lane)
    pub const LANES: usize = 4;
    /// Vertical position of the hit line
    pub const HIT_Y: f64 = 56.0;
    /// Note fall speed (pixels per frame)
    pub const FALL_SPEED: f64 = 1.5;

    /// Number of levels a beat map is split into
    pub const MAX_LEVEL: u32 = 10;
    /// More misses than this ends the run
    pub const MISS_LIMIT: u32 = 10;

    /// Audio module volume range is 0..=VOLUME_MAX
    pub const VOLUME_MAX: u8 = 30;
    pub const DEFAULT_VOLUME: u8 = 20;
    pub const DEFAULT_TRACK: u16 = 1;

    /// Raw accelerometer samples averaged at startup
    pub const CALIBRATION_SAMPLES: usize = 20;
}
