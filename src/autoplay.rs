//! Demo player
//!
//! Watches the headless display and works the virtual buttons and
//! accelerometer the way a person would: press a lane when its note crosses the
//! hit line, flick for flick notes. Each note is hit with probability `skill`,
//! decided once per note from a seeded RNG so runs are reproducible.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::beatmap::NoteKind;
use crate::platform::{ScriptedAccel, ScriptedButtons};
use crate::renderer::HeadlessRenderer;
use crate::sim::notes::NoteId;

/// Acceleration added on top of rest for a flick
pub const FLICK_IMPULSE: f64 = 10.0;

pub struct AutoPlayer {
    rng: Pcg32,
    skill: f64,
    hit_y: f64,
    note_height: f64,
    /// Distance from the hit line (px) at which the player reacts
    reach: f64,
    rest_z: f64,
    decisions: BTreeMap<NoteId, bool>,
    pub buttons: ScriptedButtons,
    pub accel: ScriptedAccel,
}

impl AutoPlayer {
    pub fn new(seed: u64, skill: f64, hit_y: f64, reach: f64, rest_z: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            skill: skill.clamp(0.0, 1.0),
            hit_y,
            note_height: 0.0,
            reach,
            rest_z,
            decisions: BTreeMap::new(),
            buttons: ScriptedButtons::default(),
            accel: ScriptedAccel { z: rest_z },
        }
    }

    /// Note height of the running session, needed to find note centers
    pub fn set_note_height(&mut self, note_height: f64) {
        self.note_height = note_height;
    }

    /// Look at the display and set buttons/accelerometer for the next poll
    pub fn observe(&mut self, display: &HeadlessRenderer) {
        self.buttons.release_all();
        let mut flick = false;

        for (id, sprite) in display.sprites() {
            let center = sprite.y + self.note_height / 2.0;
            if (center - self.hit_y).abs() > self.reach {
                continue;
            }
            let (rng, skill) = (&mut self.rng, self.skill);
            let hit = *self
                .decisions
                .entry(id)
                .or_insert_with(|| rng.random_bool(skill));
            if !hit {
                continue;
            }
            match sprite.kind {
                NoteKind::Tap => self.buttons.press(sprite.lane as usize),
                NoteKind::Flick => flick = true,
            }
        }

        self.accel.z = if flick {
            self.rest_z + FLICK_IMPULSE
        } else {
            self.rest_z
        };

        let live: Vec<NoteId> = display.sprites().map(|(id, _)| id).collect();
        self.decisions.retain(|id, _| live.contains(id));
    }

    /// Press one button (menu navigation)
    pub fn click(&mut self, lane: usize) {
        self.buttons.press(lane);
    }
}
