//! Falling notes and hit judgment
//!
//! Notes fall at a constant rate, so a note's position is recomputed from its
//! age rather than integrated per frame. Rendering learns about notes only
//! through [`NoteEvent`]s drained after each call.

use crate::beatmap::NoteKind;
use crate::settings::{Difficulty, Settings};

/// Flick notes get a 50% larger hit window
pub const FLICK_WINDOW_SCALE: f64 = 1.5;

/// Stable identifier of a spawned note, also used as the render handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(pub u32);

/// Why a note left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveReason {
    Hit,
    Missed,
    /// Field cleared on a state change
    Cleared,
}

/// Notification for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteEvent {
    Spawned { id: NoteId, lane: u8, kind: NoteKind },
    Moved { id: NoteId, y: f64 },
    Removed { id: NoteId, reason: RemoveReason },
}

/// A note currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNote {
    pub id: NoteId,
    pub lane: u8,
    pub kind: NoteKind,
    /// Top edge, pixels from the top of the display
    pub y: f64,
    /// Seconds since spawn
    age: f64,
}

/// Display geometry the tracker needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub display_height: f64,
    pub hit_y: f64,
    /// Pixels per frame
    pub speed: f64,
    pub fps: f64,
}

impl FieldGeometry {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            display_height: settings.display_height,
            hit_y: settings.hit_y,
            speed: settings.fall_speed,
            fps: settings.fps,
        }
    }

    /// Fall rate in pixels per second
    pub fn fall_rate(&self) -> f64 {
        self.speed * self.fps
    }

    /// Seconds from spawn until a note's top edge reaches the hit line
    pub fn fall_time(&self) -> f64 {
        self.hit_y / self.fall_rate()
    }
}

/// Owns every active note for one session
#[derive(Debug, Clone)]
pub struct NoteTracker {
    geometry: FieldGeometry,
    note_height: f64,
    /// Spawn order, which is also lane scan order for hits
    notes: Vec<ActiveNote>,
    next_id: u32,
    events: Vec<NoteEvent>,
}

impl NoteTracker {
    pub fn new(geometry: FieldGeometry, difficulty: Difficulty) -> Self {
        Self {
            geometry,
            note_height: difficulty.note_height(),
            notes: Vec::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Set the hit-window height for the next session
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.note_height = difficulty.note_height();
        log::debug!(
            "Difficulty set to {}, note height {}px",
            difficulty.as_str(),
            self.note_height
        );
    }

    pub fn note_height(&self) -> f64 {
        self.note_height
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    pub fn notes(&self) -> &[ActiveNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Put a new note at the top of `lane`
    pub fn spawn(&mut self, lane: u8, kind: NoteKind) -> NoteId {
        self.spawn_late(lane, kind, 0.0)
    }

    /// Put a new note in `lane` that should have appeared `late` seconds ago,
    /// already as far down as it would have fallen by now
    pub fn spawn_late(&mut self, lane: u8, kind: NoteKind, late: f64) -> NoteId {
        let id = NoteId(self.next_id);
        self.next_id += 1;
        let age = late.max(0.0);
        let y = self.geometry.fall_rate() * age;
        self.notes.push(ActiveNote {
            id,
            lane,
            kind,
            y,
            age,
        });
        self.events.push(NoteEvent::Spawned { id, lane, kind });
        if y > 0.0 {
            self.events.push(NoteEvent::Moved { id, y });
        }
        id
    }

    /// Move every note by `dt` seconds of fall. Returns how many notes fell
    /// off the bottom of the display (each counted once, then removed).
    pub fn advance(&mut self, dt: f64) -> u32 {
        let rate = self.geometry.fall_rate();
        let bottom = self.geometry.display_height;
        let mut missed = 0;

        let events = &mut self.events;
        self.notes.retain_mut(|note| {
            note.age += dt;
            note.y = rate * note.age;
            if note.y > bottom {
                events.push(NoteEvent::Removed {
                    id: note.id,
                    reason: RemoveReason::Missed,
                });
                missed += 1;
                false
            } else {
                events.push(NoteEvent::Moved {
                    id: note.id,
                    y: note.y,
                });
                true
            }
        });

        missed
    }

    /// Judge one input in `lane`. Consumes the first note in the lane whose
    /// center is inside its window and whose kind matches the input.
    pub fn hit(&mut self, lane: u8, is_flick: bool) -> bool {
        let wanted = if is_flick { NoteKind::Flick } else { NoteKind::Tap };
        let found = self
            .notes
            .iter()
            .position(|n| n.lane == lane && n.kind == wanted && self.in_window(n));

        match found {
            Some(i) => {
                let note = self.notes.remove(i);
                self.events.push(NoteEvent::Removed {
                    id: note.id,
                    reason: RemoveReason::Hit,
                });
                true
            }
            None => false,
        }
    }

    fn in_window(&self, note: &ActiveNote) -> bool {
        let half = self.note_height / 2.0;
        let window = match note.kind {
            NoteKind::Tap => half,
            NoteKind::Flick => half * FLICK_WINDOW_SCALE,
        };
        let center = note.y + half;
        let hit_y = self.geometry.hit_y;
        (hit_y - window..=hit_y + window).contains(&center)
    }

    /// Drop every note (state change)
    pub fn clear(&mut self) {
        for note in self.notes.drain(..) {
            self.events.push(NoteEvent::Removed {
                id: note.id,
                reason: RemoveReason::Cleared,
            });
        }
    }

    /// Take pending render notifications
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, NoteEvent> {
        self.events.drain(..)
    }
}
