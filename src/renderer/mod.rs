//! Display collaborator
//!
//! Screens are drawn by the board; the core tells it what to show. Notes are
//! identified by their [`NoteId`], which doubles as the render handle.

pub mod headless;

pub use headless::HeadlessRenderer;

use crate::beatmap::NoteKind;
use crate::settings::Difficulty;
use crate::sim::notes::{NoteEvent, NoteId};
use crate::sim::state::GameResult;

pub trait Renderer {
    /// Title and difficulty list with `selected` highlighted
    fn show_menu(&mut self, selected: Difficulty);
    /// Lanes and hit line
    fn show_game(&mut self);
    fn show_game_over(&mut self, result: GameResult, score: u32, misses: u32);
    fn update_scoreboard(&mut self, score: u32, misses: u32, level: u32);

    fn note_spawned(&mut self, id: NoteId, lane: u8, kind: NoteKind);
    fn note_removed(&mut self, id: NoteId);
    fn note_moved(&mut self, id: NoteId, y: f64);

    /// Route a tracker notification to the matching call
    fn apply(&mut self, event: NoteEvent) {
        match event {
            NoteEvent::Spawned { id, lane, kind } => self.note_spawned(id, lane, kind),
            NoteEvent::Moved { id, y } => self.note_moved(id, y),
            NoteEvent::Removed { id, .. } => self.note_removed(id),
        }
    }
}
