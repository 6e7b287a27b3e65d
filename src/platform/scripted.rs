//! Virtual devices for headless runs
//!
//! Their state is set directly by whoever drives the game (a demo player or a
//! test) and read back by the core like real hardware.

use super::{Accelerometer, BUTTON_COUNT, ButtonInput, RotaryInput, RotaryReading};

#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    pub pressed: [bool; BUTTON_COUNT],
}

impl ScriptedButtons {
    pub fn press(&mut self, lane: usize) {
        self.pressed[lane] = true;
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; BUTTON_COUNT];
    }
}

impl ButtonInput for ScriptedButtons {
    fn pressed(&mut self) -> [bool; BUTTON_COUNT] {
        self.pressed
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedRotary {
    position: i32,
    pending: i32,
}

impl ScriptedRotary {
    /// Turn by `detents` (positive = clockwise)
    pub fn turn(&mut self, detents: i32) {
        self.position += detents;
        self.pending += detents;
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

impl RotaryInput for ScriptedRotary {
    fn poll(&mut self) -> RotaryReading {
        let delta = std::mem::take(&mut self.pending);
        RotaryReading {
            position: self.position,
            delta,
            changed: delta != 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedAccel {
    pub z: f64,
}

impl Accelerometer for ScriptedAccel {
    fn read_z(&mut self) -> f64 {
        self.z
    }
}
