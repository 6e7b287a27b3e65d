//! Beat map loading
//!
//! A beat map is a JSON array of entries. Each entry is one of:
//! - `[time, lane]` (legacy, kind defaults to tap)
//! - `[time, lane, "tap" | "flick"]`
//! - `{ "time": .., "lane": .., "kind": .. }` (kind optional)
//!
//! Times are seconds from song start. Lanes are numbered `1..=LANES` in files,
//! left to right, and become `0..LANES` once loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::LANES;

/// How a note has to be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Button press in the note's lane
    #[default]
    Tap,
    /// Accelerometer flick gesture
    Flick,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Tap => "tap",
            NoteKind::Flick => "flick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tap" => Some(NoteKind::Tap),
            "flick" => Some(NoteKind::Flick),
            _ => None,
        }
    }
}

/// A single beat the player must react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Seconds from song start at which the note reaches the hit line
    pub time: f64,
    /// 0-based lane
    pub lane: u8,
    pub kind: NoteKind,
}

#[derive(Debug, Error)]
pub enum BeatMapError {
    #[error("failed to read beat map {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("malformed beat map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("beat {index}: lane {lane} is outside 1..={}", LANES)]
    Lane { index: usize, lane: i64 },
    #[error("beat {index}: time {time} is not a finite, non-negative number")]
    Time { index: usize, time: f64 },
    #[error("beat {index}: unknown note kind {kind:?}")]
    Kind { index: usize, kind: String },
}

/// Wire shape of one entry, before validation
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBeat {
    Typed(f64, i64, String),
    Legacy(f64, i64),
    Object {
        time: f64,
        lane: i64,
        #[serde(default)]
        kind: Option<String>,
    },
}

impl RawBeat {
    fn into_event(self, index: usize) -> Result<BeatEvent, BeatMapError> {
        let (time, lane, kind) = match self {
            RawBeat::Typed(time, lane, kind) => (time, lane, Some(kind)),
            RawBeat::Legacy(time, lane) => (time, lane, None),
            RawBeat::Object { time, lane, kind } => (time, lane, kind),
        };

        if !time.is_finite() || time < 0.0 {
            return Err(BeatMapError::Time { index, time });
        }
        if !(1..=LANES as i64).contains(&lane) {
            return Err(BeatMapError::Lane { index, lane });
        }
        let kind = match kind {
            None => NoteKind::Tap,
            Some(k) => NoteKind::from_str(&k).ok_or(BeatMapError::Kind { index, kind: k })?,
        };

        Ok(BeatEvent {
            time,
            lane: (lane - 1) as u8,
            kind,
        })
    }
}

/// Time-ordered list of beats for one song
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatMap {
    events: Vec<BeatEvent>,
}

impl BeatMap {
    /// Build a beat map from already-parsed events, sorting by time if needed
    pub fn new(mut events: Vec<BeatEvent>) -> Self {
        if !events.windows(2).all(|w| w[0].time <= w[1].time) {
            log::warn!("Beat map is not time-ordered, sorting {} beats", events.len());
            events.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        Self { events }
    }

    pub fn from_json_str(json: &str) -> Result<Self, BeatMapError> {
        let raw: Vec<RawBeat> = serde_json::from_str(json)?;
        let events = raw
            .into_iter()
            .enumerate()
            .map(|(i, beat)| beat.into_event(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(events))
    }

    pub fn load(path: &Path) -> Result<Self, BeatMapError> {
        let json = std::fs::read_to_string(path).map_err(|source| BeatMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json_str(&json)?;
        log::info!("Loaded beat map {} ({} beats)", path.display(), map.len());
        Ok(map)
    }

    pub fn events(&self) -> &[BeatEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BeatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last beat (0 for an empty map)
    pub fn duration(&self) -> f64 {
        self.events.last().map(|e| e.time).unwrap_or(0.0)
    }
}
