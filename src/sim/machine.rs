//! Top-level game controller
//!
//! `Menu -> Playing -> GameOver -> Menu`, driven by two cadences:
//! - input (buttons, rotary, accelerometer), every `input_interval`
//! - visual (spawning, falling, judging misses, redraw), every frame

use super::flick::FlickDetector;
use super::levels::{LevelTable, distribute};
use super::notes::{FieldGeometry, NoteTracker};
use super::scheduler::BeatScheduler;
use super::state::{GamePhase, GameResult, GameSession};
use super::tick::{Cadence, Devices};
use crate::beatmap::BeatMap;
use crate::consts::LANES;
use crate::platform::{Accelerometer, BUTTON_COUNT, ButtonEdges, GREEN, RED, RotaryReading};
use crate::renderer::Renderer;
use crate::settings::{Difficulty, Settings};

/// Initials recorded for leaderboard entries (the board has no entry UI)
pub const DEFAULT_INITIALS: &str = "AAA";

pub struct GameStateMachine {
    settings: Settings,
    session: GameSession,
    beat_map: BeatMap,
    levels: LevelTable,
    scheduler: BeatScheduler,
    notes: NoteTracker,
    flick: FlickDetector,
    buttons: ButtonEdges,
    input_cadence: Cadence,
    visual_cadence: Cadence,
    /// Monotonic time at which the song started
    song_start: f64,
    /// Monotonic time of the last note advance
    last_advance: f64,
}

impl GameStateMachine {
    /// Create the machine, calibrating the flick filter from resting samples
    pub fn new(settings: Settings, accel: &mut dyn Accelerometer) -> Self {
        let samples: Vec<f64> = (0..settings.calibration_samples)
            .map(|_| accel.read_z())
            .collect();
        let flick = FlickDetector::calibrate(settings.flick, samples);
        Self::with_detector(settings, flick)
    }

    /// Create the machine around an already-seeded flick filter
    pub fn with_detector(settings: Settings, flick: FlickDetector) -> Self {
        let geometry = FieldGeometry::from_settings(&settings);
        let difficulty = settings.difficulty;
        Self {
            session: GameSession::new(difficulty),
            beat_map: BeatMap::default(),
            levels: distribute(0, settings.max_level),
            scheduler: BeatScheduler::new(geometry.fall_time()),
            notes: NoteTracker::new(geometry, difficulty),
            flick,
            buttons: ButtonEdges::new(),
            input_cadence: Cadence::new(settings.input_interval),
            visual_cadence: Cadence::new(settings.visual_interval()),
            song_start: 0.0,
            last_advance: 0.0,
            settings,
        }
    }

    /// Use a new song. Recomputes the level table.
    pub fn assign_beat_map(&mut self, beat_map: BeatMap) {
        self.levels = distribute(beat_map.len() as u32, self.settings.max_level);
        for (i, entry) in self.levels.entries().iter().enumerate() {
            log::debug!(
                "Level {}: {} beats - start index {}",
                i + 1,
                entry.beat_count,
                entry.start_index
            );
        }
        self.beat_map = beat_map;
    }

    /// Power-on: initial volume and the menu screen
    pub fn boot(&mut self, io: &mut Devices<'_>) {
        io.audio.set_volume(self.settings.volume);
        io.display.show_menu(self.session.difficulty);
    }

    /// Run whichever cadences are due at `now` (monotonic seconds)
    pub fn update(&mut self, now: f64, io: &mut Devices<'_>) {
        if self.input_cadence.ready(now) {
            self.input_tick(now, io);
        }
        if self.visual_cadence.ready(now) {
            self.visual_tick(now, io);
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn beat_map(&self) -> &BeatMap {
        &self.beat_map
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn notes(&self) -> &NoteTracker {
        &self.notes
    }

    /// Flick filter, for runtime calibration
    pub fn flick_mut(&mut self) -> &mut FlickDetector {
        &mut self.flick
    }

    /// Seconds since the song started
    pub fn song_time(&self, now: f64) -> f64 {
        now - self.song_start
    }

    // === Input cadence ===

    fn input_tick(&mut self, now: f64, io: &mut Devices<'_>) {
        let clicked = self.buttons.update(io.buttons.pressed());
        let any_click = clicked.iter().any(|&c| c);
        let flicked = self.flick.process(io.accel.read_z(), now);

        match self.session.phase {
            GamePhase::Menu => {
                self.menu_rotary(io.rotary.poll());
                if any_click {
                    self.start_game(now, io);
                }
            }
            GamePhase::Playing => {
                playing_rotary(io.rotary.poll(), io);
                self.playing_input(now, clicked, flicked, io);
            }
            GamePhase::GameOver => {
                if any_click {
                    self.session.return_to_menu();
                    log::info!("Returning to menu");
                }
            }
        }
    }

    fn menu_rotary(&mut self, reading: RotaryReading) {
        if reading.changed {
            self.session.difficulty = Difficulty::from_position(reading.position);
            log::info!(
                "Difficulty: {} (position {})",
                self.session.difficulty.as_str(),
                reading.position
            );
        }
    }

    fn start_game(&mut self, now: f64, io: &mut Devices<'_>) {
        self.session.start();
        self.notes.set_difficulty(self.session.difficulty);
        self.notes.clear();
        self.flush_notes(io.display);
        self.scheduler.reset();

        io.display.show_game();
        self.song_start = now;
        self.last_advance = now;
        io.audio.play(self.settings.track);

        log::info!(
            "Starting level 1 with {} beats ({}, {} beats total)",
            self.levels.level(1).map(|e| e.beat_count).unwrap_or(0),
            self.session.difficulty.as_str(),
            self.beat_map.len()
        );
    }

    fn playing_input(
        &mut self,
        now: f64,
        clicked: [bool; BUTTON_COUNT],
        flicked: bool,
        io: &mut Devices<'_>,
    ) {
        for (lane, _) in clicked.iter().enumerate().filter(|(_, c)| **c) {
            if self.notes.hit(lane as u8, false) {
                self.register_hit(io);
            }
        }

        if flicked {
            log::debug!("Flick at song time {:.3}", self.song_time(now));
            // One flick consumes at most one flick note, lowest lane first
            if (0..LANES as u8).any(|lane| self.notes.hit(lane, true)) {
                self.register_hit(io);
            }
        }

        self.flush_notes(io.display);
    }

    fn register_hit(&mut self, io: &mut Devices<'_>) {
        self.session.record_hit();
        let (r, g, b) = GREEN;
        io.pixel.set_color(r, g, b);
    }

    // === Visual cadence ===

    fn visual_tick(&mut self, now: f64, io: &mut Devices<'_>) {
        match self.session.phase {
            GamePhase::Menu => {
                self.notes.clear();
                self.flush_notes(io.display);
                io.display.show_menu(self.session.difficulty);
            }
            GamePhase::Playing => self.update_game(now, io),
            GamePhase::GameOver => {
                self.notes.clear();
                self.flush_notes(io.display);
                let result = self.session.result.unwrap_or(GameResult::Lose);
                io.display
                    .show_game_over(result, self.session.score, self.session.misses);
            }
        }
    }

    fn update_game(&mut self, now: f64, io: &mut Devices<'_>) {
        let dt = now - self.last_advance;
        self.last_advance = now;
        let missed = self.notes.advance(dt);

        // New notes are placed by their own spawn time, not advanced by `dt`
        let song_now = self.song_time(now);
        self.scheduler
            .advance(self.beat_map.events(), song_now, &mut self.notes);
        self.flush_notes(io.display);

        if missed > 0 {
            let (r, g, b) = RED;
            io.pixel.set_color(r, g, b);
            self.session.record_misses(missed);
        }

        let total = self.beat_map.len() as u32;
        if let Some(result) = self.session.check_game_over(total, self.settings.miss_limit) {
            self.finish(result, io);
            return;
        }

        if let Some(level) = self.session.check_level_up(&self.levels) {
            log::info!(
                "Level up! Now on level {} with {} beats (completed {})",
                level,
                self.levels.level(level).map(|e| e.beat_count).unwrap_or(0),
                self.session.completed_beats
            );
        }

        io.display.update_scoreboard(
            self.session.score,
            self.session.misses,
            self.session.current_level,
        );
    }

    fn finish(&mut self, result: GameResult, io: &mut Devices<'_>) {
        let s = &self.session;
        match result {
            GameResult::Lose => log::info!("Game over - you lose! Misses: {}", s.misses),
            GameResult::Win => log::info!(
                "Game over - you win! Score: {}, misses: {}",
                s.score,
                s.misses
            ),
        }
        io.audio.pause();

        if let Some(store) = io.scores.as_mut() {
            if store.is_high_score(s.score, s.misses) {
                match store.add_score(DEFAULT_INITIALS, s.score, s.misses) {
                    Some(rank) => log::info!("New high score! Rank {}", rank),
                    None => log::debug!("Score did not place"),
                }
            }
        }
    }

    fn flush_notes(&mut self, display: &mut dyn Renderer) {
        for event in self.notes.drain_events() {
            display.apply(event);
        }
    }
}

fn playing_rotary(reading: RotaryReading, io: &mut Devices<'_>) {
    if !reading.changed || reading.delta == 0 {
        return;
    }
    log::debug!("Rotary delta {}", reading.delta);
    for _ in 0..reading.delta.unsigned_abs() {
        if reading.delta > 0 {
            io.audio.volume_up();
        } else {
            io.audio.volume_down();
        }
    }
}
