//! Gamepad button state for egui immediate-mode UIs.
//!
//! Tracks up to [`GAMEPAD_MAX`] gamepad slots, each holding a current and
//! a previous-frame button bitmask over 12 logical buttons. Comparing
//! the two masks yields down / just-pressed / just-released queries
//! without any event history.
//!
//! Device enumeration and raw input live behind the [`GamepadBackend`]
//! trait: [`GilrsBackend`] polls real controllers through gilrs, while
//! [`ManualBackend`] lets the host feed [`Gamepads::button`] from its
//! own event loop.
//!
//! ```
//! use egui_gamepads::{GamepadButton, Gamepads, ManualBackend, Slot};
//!
//! let mut pads = Gamepads::new(egui::Context::default(), Box::new(ManualBackend), None, ())?;
//!
//! // Once per frame: rotate masks, then feed the new frame's raw state.
//! pads.update();
//! pads.button(0, GamepadButton::A, true);
//!
//! assert!(pads.is_button_down(Slot::Index(0), GamepadButton::A));
//! assert!(pads.is_button_pressed(Slot::Any, GamepadButton::A));
//! # Ok::<(), egui_gamepads::GamepadError>(())
//! ```

pub mod backend;
pub mod button;
pub mod table;

pub use backend::{GamepadBackend, GilrsBackend, ManualBackend};
pub use button::GamepadButton;
pub use table::{
    GamepadError, GamepadSettings, Gamepads, PadStates, Slot, GAMEPAD_MAX, GAMEPAD_NAME_LEN,
};
