//! Beat spawn scheduling
//!
//! A note must appear `fall_time` seconds before its beat so it lands on the
//! hit line in time. The cursor only moves forward.

use super::notes::NoteTracker;
use crate::beatmap::BeatEvent;

#[derive(Debug, Clone)]
pub struct BeatScheduler {
    cursor: usize,
    fall_time: f64,
}

impl BeatScheduler {
    pub fn new(fall_time: f64) -> Self {
        Self {
            cursor: 0,
            fall_time,
        }
    }

    /// Rewind to the first beat for a new session
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn fall_time(&self) -> f64 {
        self.fall_time
    }

    /// Index of the next beat to spawn
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Spawn time of a beat in song seconds
    pub fn spawn_time(&self, beat: &BeatEvent) -> f64 {
        beat.time - self.fall_time
    }

    /// Spawn every beat whose spawn time has arrived, each placed where it
    /// would be had it spawned exactly on time. Returns the number spawned.
    pub fn advance(&mut self, beats: &[BeatEvent], song_elapsed: f64, notes: &mut NoteTracker) -> usize {
        let start = self.cursor;
        while let Some(beat) = beats.get(self.cursor) {
            if song_elapsed < self.spawn_time(beat) {
                break;
            }
            notes.spawn_late(beat.lane, beat.kind, song_elapsed - self.spawn_time(beat));
            self.cursor += 1;
        }
        self.cursor - start
    }

    /// True once every beat has been handed out
    pub fn is_finished(&self, beats: &[BeatEvent]) -> bool {
        self.cursor >= beats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::NoteKind;
    use crate::settings::Difficulty;
    use crate::sim::notes::FieldGeometry;

    fn tracker() -> NoteTracker {
        NoteTracker::new(
            FieldGeometry {
                display_height: 64.0,
                hit_y: 56.0,
                speed: 1.5,
                fps: 30.0,
            },
            Difficulty::Easy,
        )
    }

    fn beat(time: f64, lane: u8) -> BeatEvent {
        BeatEvent {
            time,
            lane,
            kind: NoteKind::Tap,
        }
    }

    #[test]
    fn test_spawns_fall_time_early() {
        let beats = [beat(2.0, 0), beat(2.5, 1), beat(4.0, 2)];
        let mut notes = tracker();
        let mut sched = BeatScheduler::new(1.0);

        assert_eq!(sched.advance(&beats, 0.5, &mut notes), 0);
        assert_eq!(sched.advance(&beats, 1.0, &mut notes), 1);
        assert_eq!(notes.notes()[0].lane, 0);

        // Early exit at the first beat that is not due yet
        assert_eq!(sched.advance(&beats, 2.0, &mut notes), 1);
        assert_eq!(sched.cursor(), 2);
        assert!(!sched.is_finished(&beats));

        assert_eq!(sched.advance(&beats, 10.0, &mut notes), 1);
        assert!(sched.is_finished(&beats));
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn test_late_spawn_keeps_wall_clock_position() {
        let beats = [beat(2.0, 0), beat(2.1, 1)];
        let mut notes = tracker();
        let mut sched = BeatScheduler::new(1.0);
        assert_eq!(sched.fall_time(), 1.0);

        // Host stalled until 1.2s: both beats were due (at 1.0s and 1.1s)
        assert_eq!(sched.advance(&beats, 1.2, &mut notes), 2);
        let ys: Vec<f64> = notes.notes().iter().map(|n| n.y).collect();
        assert!((ys[0] - 45.0 * 0.2).abs() < 1e-9);
        assert!((ys[1] - 45.0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_cursor_never_rewinds() {
        let beats = [beat(1.0, 0), beat(1.0, 1)];
        let mut notes = tracker();
        let mut sched = BeatScheduler::new(0.5);

        assert_eq!(sched.advance(&beats, 0.5, &mut notes), 2);
        // Going back in time does not respawn anything
        assert_eq!(sched.advance(&beats, 0.0, &mut notes), 0);
        assert_eq!(notes.len(), 2);

        sched.reset();
        assert_eq!(sched.cursor(), 0);
    }

    #[test]
    fn test_negative_spawn_time_spawns_at_start() {
        let beats = [beat(0.2, 3)];
        let mut notes = tracker();
        let mut sched = BeatScheduler::new(1.244);
        assert_eq!(sched.advance(&beats, 0.0, &mut notes), 1);
        // Already well down the field so it still lands on time
        assert!((notes.notes()[0].y - 45.0 * 1.044).abs() < 1e-9);
    }
}
