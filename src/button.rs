//! Logical gamepad buttons and their bitmask encoding.
//!
//! The table stores per-slot button state as a `u32` bitmask with one bit
//! per logical button. Bit positions follow declaration order, so scans
//! over [`GamepadButton::ALL`] report buttons deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 12 logical buttons tracked per gamepad slot.
///
/// Logical buttons are independent of the physical controller layout;
/// backends translate their native button codes into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
}

impl GamepadButton {
    /// Every button in declaration order. Scan order for first-match
    /// queries like [`crate::Gamepads::any_button_pressed`].
    pub const ALL: [GamepadButton; 12] = [
        GamepadButton::Up,
        GamepadButton::Down,
        GamepadButton::Left,
        GamepadButton::Right,
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::LeftBumper,
        GamepadButton::RightBumper,
        GamepadButton::Back,
        GamepadButton::Start,
    ];

    /// The bitmask bit for this button.
    pub const fn flag(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for GamepadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamepadButton::Up => write!(f, "Up"),
            GamepadButton::Down => write!(f, "Down"),
            GamepadButton::Left => write!(f, "Left"),
            GamepadButton::Right => write!(f, "Right"),
            GamepadButton::A => write!(f, "A"),
            GamepadButton::B => write!(f, "B"),
            GamepadButton::X => write!(f, "X"),
            GamepadButton::Y => write!(f, "Y"),
            GamepadButton::LeftBumper => write!(f, "LB"),
            GamepadButton::RightBumper => write!(f, "RB"),
            GamepadButton::Back => write!(f, "Back"),
            GamepadButton::Start => write!(f, "Start"),
        }
    }
}
