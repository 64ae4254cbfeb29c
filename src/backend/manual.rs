//! No-op backend for hosts that deliver input themselves.

use super::GamepadBackend;
use crate::table::{GamepadError, PadStates};

/// Backend without a device layer.
///
/// Every slot stays available and the host feeds raw state through
/// [`crate::Gamepads::button`] from its own event loop. Also the backend
/// of choice for tests, since nothing touches real hardware.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualBackend;

impl GamepadBackend for ManualBackend {
    fn init(&mut self, _pads: &mut PadStates) -> Result<(), GamepadError> {
        Ok(())
    }

    fn update(&mut self, _pads: &mut PadStates) {}
}
