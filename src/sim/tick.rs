//! Cadence-gated loop plumbing
//!
//! The host loop calls the state machine as often as it likes. Each kind of
//! work runs on its own cadence: when at least one interval has passed since it
//! last fired, it fires once. Missed intervals are skipped, never queued.

use crate::audio::AudioOutput;
use crate::highscores::HighScoreStore;
use crate::platform::{Accelerometer, ButtonInput, PixelIndicator, RotaryInput};
use crate::renderer::Renderer;

/// A fixed polling interval on a monotonic clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    interval: f64,
    last_fire: Option<f64>,
}

impl Cadence {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn last_fire(&self) -> Option<f64> {
        self.last_fire
    }

    /// True (and re-armed from `now`) when the interval has elapsed
    pub fn ready(&mut self, now: f64) -> bool {
        let due = self
            .last_fire
            .map(|last| now - last >= self.interval)
            .unwrap_or(true);
        if due {
            self.last_fire = Some(now);
        }
        due
    }
}

/// Everything the core talks to during one update
pub struct Devices<'a> {
    pub buttons: &'a mut dyn ButtonInput,
    pub rotary: &'a mut dyn RotaryInput,
    pub accel: &'a mut dyn Accelerometer,
    pub display: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioOutput,
    pub pixel: &'a mut dyn PixelIndicator,
    /// Leaderboard offered each finished run, if one is attached
    pub scores: Option<&'a mut dyn HighScoreStore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_fires() {
        let mut cadence = Cadence::new(0.005);
        assert_eq!(cadence.interval(), 0.005);
        assert_eq!(cadence.last_fire(), None);
        assert!(cadence.ready(123.0));
        assert!(!cadence.ready(123.001));
    }

    #[test]
    fn test_fires_once_after_stall() {
        let mut cadence = Cadence::new(1.0 / 30.0);
        assert!(cadence.ready(0.0));
        // Host stalled for ten intervals: one fire, no backlog
        assert!(cadence.ready(0.5));
        assert!(!cadence.ready(0.51));
        assert!(!cadence.ready(0.52));
        assert!(cadence.ready(0.54));
        assert_eq!(cadence.last_fire(), Some(0.54));
    }
}
