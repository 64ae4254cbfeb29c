//! Pluggable input backends.
//!
//! A backend owns the platform side of gamepad support: device
//! enumeration, connect/disconnect tracking and raw button delivery.
//! The table invokes it at fixed points of the slot lifecycle:
//!
//! 1. [`GamepadBackend::init`] - once, during [`crate::Gamepads::new`]
//! 2. [`GamepadBackend::update`] - once per frame, after mask rotation
//! 3. [`GamepadBackend::teardown`] - once, when the table is dropped
//!
//! Backends are selected at construction time; [`GilrsBackend`] is the
//! default polling implementation, [`ManualBackend`] leaves input
//! delivery entirely to the host.

pub mod gilrs;
pub mod manual;

pub use self::gilrs::GilrsBackend;
pub use self::manual::ManualBackend;

use crate::table::{GamepadError, PadStates};

/// Platform hooks the gamepad table calls into.
pub trait GamepadBackend {
    /// Perform device setup and mark the slots that have a device.
    ///
    /// A returned error aborts table construction.
    fn init(&mut self, pads: &mut PadStates) -> Result<(), GamepadError>;

    /// Repopulate the current frame's button state via
    /// [`PadStates::button`]. Runs after the table rotated its masks.
    fn update(&mut self, pads: &mut PadStates);

    /// Hardware-reported name for a slot, overriding the stored default.
    fn name(&self, slot: usize) -> Option<String> {
        let _ = slot;
        None
    }

    /// Release backend resources before the table clears its slots.
    fn teardown(&mut self) {}
}
