//! Audio playback collaborator
//!
//! The core only sends one-way commands to an external player module; it never
//! waits for or reads back an acknowledgment.

use crate::consts::VOLUME_MAX;

/// Commands the game sends to the player module
pub trait AudioOutput {
    /// Start a track from the beginning
    fn play(&mut self, track: u16);
    fn pause(&mut self);
    fn resume(&mut self);
    /// Absolute volume, 0 - VOLUME_MAX
    fn set_volume(&mut self, level: u8);
    /// One volume step up
    fn volume_up(&mut self);
    /// One volume step down
    fn volume_down(&mut self);
}

/// Playback state as far as the sender can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing(u16),
    Paused(u16),
}

/// Audio output for headless runs: tracks what a real module would be doing
/// and logs each command.
#[derive(Debug, Clone)]
pub struct HeadlessAudio {
    playback: Playback,
    volume: u8,
}

impl Default for HeadlessAudio {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_VOLUME)
    }
}

impl HeadlessAudio {
    pub fn new(volume: u8) -> Self {
        Self {
            playback: Playback::Stopped,
            volume: volume.min(VOLUME_MAX),
        }
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

impl AudioOutput for HeadlessAudio {
    fn play(&mut self, track: u16) {
        log::info!("Audio: play track {}", track);
        self.playback = Playback::Playing(track);
    }

    fn pause(&mut self) {
        if let Playback::Playing(track) = self.playback {
            log::info!("Audio: pause track {}", track);
            self.playback = Playback::Paused(track);
        }
    }

    fn resume(&mut self) {
        if let Playback::Paused(track) = self.playback {
            log::info!("Audio: resume track {}", track);
            self.playback = Playback::Playing(track);
        }
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level.min(VOLUME_MAX);
        log::debug!("Audio: volume {}", self.volume);
    }

    fn volume_up(&mut self) {
        self.volume = (self.volume + 1).min(VOLUME_MAX);
        log::debug!("Audio: volume up -> {}", self.volume);
    }

    fn volume_down(&mut self) {
        self.volume = self.volume.saturating_sub(1);
        log::debug!("Audio: volume down -> {}", self.volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = HeadlessAudio::new(29);
        audio.volume_up();
        audio.volume_up();
        assert_eq!(audio.volume(), VOLUME_MAX);

        audio.set_volume(1);
        audio.volume_down();
        audio.volume_down();
        assert_eq!(audio.volume(), 0);

        audio.set_volume(200);
        assert_eq!(audio.volume(), VOLUME_MAX);
    }

    #[test]
    fn test_pause_resume_only_while_loaded() {
        let mut audio = HeadlessAudio::default();
        audio.pause();
        assert_eq!(audio.playback(), Playback::Stopped);

        audio.play(3);
        audio.pause();
        assert_eq!(audio.playback(), Playback::Paused(3));
        audio.resume();
        assert_eq!(audio.playback(), Playback::Playing(3));
    }
}
