//! Platform abstraction layer
//!
//! The game core never touches hardware. Boards provide:
//! - Buttons (one per lane, current pressed state)
//! - Rotary encoder (absolute position and per-poll delta)
//! - Accelerometer (vertical axis)
//! - RGB status pixel
//!
//! Edge detection for buttons happens here, on the core's side.

pub mod scripted;

pub use scripted::{ScriptedAccel, ScriptedButtons, ScriptedRotary};

use crate::consts::LANES;

/// One button per lane
pub const BUTTON_COUNT: usize = LANES;

/// Current physical state of the buttons (true = pressed)
pub trait ButtonInput {
    fn pressed(&mut self) -> [bool; BUTTON_COUNT];
}

/// What the encoder reported on one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotaryReading {
    /// Absolute detent position
    pub position: i32,
    /// Detents moved since the previous poll
    pub delta: i32,
    pub changed: bool,
}

pub trait RotaryInput {
    fn poll(&mut self) -> RotaryReading;
}

/// Vertical acceleration source
pub trait Accelerometer {
    fn read_z(&mut self) -> f64;
}

/// Single RGB indicator
pub trait PixelIndicator {
    fn set_color(&mut self, r: u8, g: u8, b: u8);
}

pub const GREEN: (u8, u8, u8) = (0, 255, 0);
pub const RED: (u8, u8, u8) = (255, 0, 0);

/// Turns pressed states into clicks: a click fires on the press transition
/// only, never while a button is held.
#[derive(Debug, Clone, Default)]
pub struct ButtonEdges {
    previous: [bool; BUTTON_COUNT],
}

impl ButtonEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, pressed: [bool; BUTTON_COUNT]) -> [bool; BUTTON_COUNT] {
        let mut clicked = [false; BUTTON_COUNT];
        for (i, &now) in pressed.iter().enumerate() {
            clicked[i] = now && !self.previous[i];
        }
        self.previous = pressed;
        clicked
    }
}

/// Pixel that remembers and logs its color
#[derive(Debug, Clone, Default)]
pub struct LogPixel {
    color: (u8, u8, u8),
}

impl LogPixel {
    pub fn color(&self) -> (u8, u8, u8) {
        self.color
    }
}

impl PixelIndicator for LogPixel {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        if self.color != (r, g, b) {
            log::debug!("Pixel: #{:02x}{:02x}{:02x}", r, g, b);
        }
        self.color = (r, g, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_only_on_press_transition() {
        let mut edges = ButtonEdges::new();
        assert_eq!(edges.update([true, false, false, false]), [true, false, false, false]);
        // Held: no repeat
        assert_eq!(edges.update([true, false, false, false]), [false; BUTTON_COUNT]);
        // Release then press again
        assert_eq!(edges.update([false, false, false, false]), [false; BUTTON_COUNT]);
        assert_eq!(edges.update([true, true, false, false]), [true, true, false, false]);
    }
}
