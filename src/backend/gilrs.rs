//! gilrs-based polling backend.
//!
//! Assigns connected gilrs gamepads to table slots in ascending order
//! and polls their button state once per frame. Connect and disconnect
//! events move slot assignments; a reconnecting pad reclaims its old
//! slot when it is still free.

use gilrs::{Button, Event, EventType, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

use super::GamepadBackend;
use crate::button::GamepadButton;
use crate::table::{GamepadError, PadStates, GAMEPAD_MAX};

/// Default input backend built on [`gilrs`].
pub struct GilrsBackend {
    // Created in `init`, absent until then and after `teardown`.
    gilrs: Option<Gilrs>,
    slots: [Option<GamepadId>; GAMEPAD_MAX],
}

impl GilrsBackend {
    pub fn new() -> Self {
        Self {
            gilrs: None,
            slots: [None; GAMEPAD_MAX],
        }
    }
}

impl Default for GilrsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadBackend for GilrsBackend {
    fn init(&mut self, pads: &mut PadStates) -> Result<(), GamepadError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(GamepadError::BackendInit(e.to_string()));
            }
        };

        for (id, gamepad) in gilrs.gamepads() {
            match claim_slot(&mut self.slots, id) {
                Some(slot) => {
                    info!("Gamepad {} ({}) assigned to slot {}", id, gamepad.name(), slot);
                }
                None => {
                    warn!("No free slot for gamepad {} ({})", id, gamepad.name());
                }
            }
        }
        for index in 0..pads.count() {
            pads.set_available(index, self.slots[index].is_some());
        }

        self.gilrs = Some(gilrs);
        Ok(())
    }

    fn update(&mut self, pads: &mut PadStates) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };

        // Drain the event queue first; connect and disconnect move slot
        // assignments, button state is polled below.
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected => match claim_slot(&mut self.slots, id) {
                    Some(slot) => info!("Gamepad {} connected, slot {}", id, slot),
                    None => warn!("Gamepad {} connected but all slots are taken", id),
                },
                EventType::Disconnected => {
                    if let Some(slot) = release_slot(&mut self.slots, id) {
                        warn!("Gamepad {} disconnected, releasing slot {}", id, slot);
                    }
                }
                other => debug!("Ignoring gilrs event: {:?}", other),
            }
        }

        for (index, assigned) in self.slots.iter().enumerate() {
            let Some(id) = assigned else {
                pads.set_available(index, false);
                continue;
            };
            let gamepad = gilrs.gamepad(*id);
            pads.set_available(index, gamepad.is_connected());
            if !gamepad.is_connected() {
                continue;
            }
            for button in GamepadButton::ALL {
                pads.button(index, button, gamepad.is_pressed(source_button(button)));
            }
        }
    }

    fn name(&self, slot: usize) -> Option<String> {
        let id = self.slots.get(slot).copied().flatten()?;
        let gilrs = self.gilrs.as_ref()?;
        let gamepad = gilrs.gamepad(id);
        gamepad.is_connected().then(|| gamepad.name().to_string())
    }

    fn teardown(&mut self) {
        info!("Shutting down gilrs backend");
        self.slots = [None; GAMEPAD_MAX];
        self.gilrs = None;
    }
}

/// Assign `id` to its existing slot or the lowest free one.
fn claim_slot(slots: &mut [Option<GamepadId>; GAMEPAD_MAX], id: GamepadId) -> Option<usize> {
    if let Some(slot) = slots.iter().position(|s| *s == Some(id)) {
        return Some(slot);
    }
    let slot = slots.iter().position(Option::is_none)?;
    slots[slot] = Some(id);
    Some(slot)
}

fn release_slot(slots: &mut [Option<GamepadId>; GAMEPAD_MAX], id: GamepadId) -> Option<usize> {
    let slot = slots.iter().position(|s| *s == Some(id))?;
    slots[slot] = None;
    Some(slot)
}

/// The gilrs button a logical button is polled from.
fn source_button(button: GamepadButton) -> Button {
    match button {
        GamepadButton::Up => Button::DPadUp,
        GamepadButton::Down => Button::DPadDown,
        GamepadButton::Left => Button::DPadLeft,
        GamepadButton::Right => Button::DPadRight,
        GamepadButton::A => Button::South,
        GamepadButton::B => Button::East,
        GamepadButton::X => Button::North,
        GamepadButton::Y => Button::West,
        GamepadButton::LeftBumper => Button::LeftTrigger,
        GamepadButton::RightBumper => Button::RightTrigger,
        GamepadButton::Back => Button::Select,
        GamepadButton::Start => Button::Start,
    }
}
