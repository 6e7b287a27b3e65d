//! Game core
//!
//! Everything here is driven by the caller's clock and talks to hardware only
//! through the traits in `platform`, `renderer` and `audio`:
//! - `flick`: accelerometer filter that turns a jerk into a flick event
//! - `levels`: splits a beat map into progressively longer levels
//! - `notes`: falling notes, hit windows and miss detection
//! - `scheduler`: spawns each beat early enough to land on time
//! - `state`: score, misses, level and phase of one run
//! - `tick`: cadence gating and the device bundle
//! - `machine`: the state machine tying it together

pub mod flick;
pub mod levels;
pub mod machine;
pub mod notes;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use flick::{FlickDetector, FlickTuning};
pub use levels::{LevelEntry, LevelTable, distribute};
pub use machine::{DEFAULT_INITIALS, GameStateMachine};
pub use notes::{ActiveNote, FieldGeometry, NoteEvent, NoteId, NoteTracker, RemoveReason};
pub use scheduler::BeatScheduler;
pub use state::{GamePhase, GameResult, GameSession};
pub use tick::{Cadence, Devices};
