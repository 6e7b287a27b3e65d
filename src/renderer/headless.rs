//! Headless renderer
//!
//! Keeps the last screen and the visible notes in memory so a demo or test can
//! look at what a real display would show. Screen changes are logged once,
//! not every frame.

use std::collections::BTreeMap;

use super::Renderer;
use crate::beatmap::NoteKind;
use crate::settings::Difficulty;
use crate::sim::notes::NoteId;
use crate::sim::state::GameResult;

/// What the display is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Blank,
    Menu(Difficulty),
    Game,
    GameOver(GameResult),
}

/// A note as drawn on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSprite {
    pub lane: u8,
    pub kind: NoteKind,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    screen: Screen,
    sprites: BTreeMap<NoteId, NoteSprite>,
    scoreboard: (u32, u32, u32),
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Visible notes in spawn order
    pub fn sprites(&self) -> impl Iterator<Item = (NoteId, &NoteSprite)> {
        self.sprites.iter().map(|(id, s)| (*id, s))
    }

    /// Last (score, misses, level) drawn
    pub fn scoreboard(&self) -> (u32, u32, u32) {
        self.scoreboard
    }

    /// Number of scoreboard redraws
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn switch(&mut self, screen: Screen) {
        if self.screen != screen {
            log::info!("Display: {:?}", screen);
            self.screen = screen;
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn show_menu(&mut self, selected: Difficulty) {
        self.switch(Screen::Menu(selected));
    }

    fn show_game(&mut self) {
        self.scoreboard = (0, 0, 1);
        self.switch(Screen::Game);
    }

    fn show_game_over(&mut self, result: GameResult, score: u32, misses: u32) {
        self.scoreboard.0 = score;
        self.scoreboard.1 = misses;
        self.switch(Screen::GameOver(result));
    }

    fn update_scoreboard(&mut self, score: u32, misses: u32, level: u32) {
        if self.scoreboard != (score, misses, level) {
            log::debug!("Score: {} Miss: {} Level: {}", score, misses, level);
        }
        self.scoreboard = (score, misses, level);
        self.frames += 1;
    }

    fn note_spawned(&mut self, id: NoteId, lane: u8, kind: NoteKind) {
        self.sprites.insert(id, NoteSprite { lane, kind, y: 0.0 });
    }

    fn note_removed(&mut self, id: NoteId) {
        self.sprites.remove(&id);
    }

    fn note_moved(&mut self, id: NoteId, y: f64) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.y = y;
        }
    }
}
