//! Shared test doubles

use crate::audio::AudioOutput;
use crate::beatmap::{BeatEvent, BeatMap, NoteKind};
use crate::highscores::HighScores;
use crate::platform::{PixelIndicator, ScriptedAccel, ScriptedButtons, ScriptedRotary};
use crate::renderer::HeadlessRenderer;
use crate::sim::tick::Devices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Play(u16),
    Pause,
    Resume,
    SetVolume(u8),
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl AudioOutput for RecordingAudio {
    fn play(&mut self, track: u16) {
        self.calls.push(AudioCall::Play(track));
    }
    fn pause(&mut self) {
        self.calls.push(AudioCall::Pause);
    }
    fn resume(&mut self) {
        self.calls.push(AudioCall::Resume);
    }
    fn set_volume(&mut self, level: u8) {
        self.calls.push(AudioCall::SetVolume(level));
    }
    fn volume_up(&mut self) {
        self.calls.push(AudioCall::VolumeUp);
    }
    fn volume_down(&mut self) {
        self.calls.push(AudioCall::VolumeDown);
    }
}

#[derive(Debug, Default)]
pub struct RecordingPixel {
    pub colors: Vec<(u8, u8, u8)>,
}

impl PixelIndicator for RecordingPixel {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.colors.push((r, g, b));
    }
}

/// Every collaborator, faked
#[derive(Default)]
pub struct Rig {
    pub buttons: ScriptedButtons,
    pub rotary: ScriptedRotary,
    pub accel: ScriptedAccel,
    pub display: HeadlessRenderer,
    pub audio: RecordingAudio,
    pub pixel: RecordingPixel,
    pub scores: HighScores,
}

impl Rig {
    pub fn devices(&mut self) -> Devices<'_> {
        Devices {
            buttons: &mut self.buttons,
            rotary: &mut self.rotary,
            accel: &mut self.accel,
            display: &mut self.display,
            audio: &mut self.audio,
            pixel: &mut self.pixel,
            scores: Some(&mut self.scores),
        }
    }
}

/// Beat map from `(time, lane, kind)` triples
pub fn beat_map(beats: &[(f64, u8, NoteKind)]) -> BeatMap {
    BeatMap::new(
        beats
            .iter()
            .map(|&(time, lane, kind)| BeatEvent { time, lane, kind })
            .collect(),
    )
}
