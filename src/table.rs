//! Fixed-slot gamepad state table.
//!
//! Holds [`GAMEPAD_MAX`] slots, each with an availability flag, a display
//! name and two generations of button bitmasks (current and previous
//! frame). Press/release edges fall out of comparing the two masks, so
//! the table keeps no history beyond one frame.
//!
//! # Frame protocol
//!
//! ```text
//! Gamepads::update() ──► rotate masks ──► backend.update() ──► queries
//!                        (prev = cur,     (calls button())     (down /
//!                         cur = 0)                              pressed /
//!                                                               released)
//! ```
//!
//! The host calls [`Gamepads::update`] once per rendered frame, then reads
//! state through the query methods while building the UI.

use crate::backend::GamepadBackend;
use crate::button::GamepadButton;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Number of gamepad slots the table tracks.
pub const GAMEPAD_MAX: usize = 4;

/// Maximum stored name length in bytes, terminator included.
pub const GAMEPAD_NAME_LEN: usize = 16;

/// Table settings.
#[derive(Clone, Debug)]
pub struct GamepadSettings {
    /// Prefix for default slot names; the 1-based slot number is appended.
    pub name_prefix: String,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        Self {
            name_prefix: "Controller ".to_string(),
        }
    }
}

/// Table errors.
#[derive(Debug, thiserror::Error)]
pub enum GamepadError {
    #[error("Failed to initialize gamepad backend: {0}")]
    BackendInit(String),
}

/// Selects which slot a query applies to.
///
/// [`Slot::Any`] ORs the result over every slot, replacing the
/// "-1 means any gamepad" convention common in C input layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Match any slot.
    Any,
    /// A specific slot index. Out-of-range indices query as empty.
    Index(usize),
}

impl From<usize> for Slot {
    fn from(index: usize) -> Self {
        Slot::Index(index)
    }
}

#[derive(Clone, Debug, Default)]
struct GamepadSlot {
    available: bool,
    name: String,
    buttons: u32,
    buttons_prev: u32,
}

/// The slot array as backends see it during `init` and `update`.
///
/// Split out from [`Gamepads`] so a backend can mutate slot state while
/// the table still owns the backend itself.
#[derive(Debug)]
pub struct PadStates {
    slots: [GamepadSlot; GAMEPAD_MAX],
}

impl PadStates {
    fn new(name_prefix: &str) -> Self {
        let mut slots: [GamepadSlot; GAMEPAD_MAX] = Default::default();
        for (index, slot) in slots.iter_mut().enumerate() {
            slot.available = true;
            slot.name = bounded_name(&format!("{}{}", name_prefix, index + 1));
        }
        Self { slots }
    }

    /// Slot capacity, not the number of connected devices.
    pub fn count(&self) -> usize {
        GAMEPAD_MAX
    }

    /// Report a raw press or release for the current frame.
    ///
    /// No-op for out-of-range indices and unavailable slots.
    pub fn button(&mut self, index: usize, button: GamepadButton, down: bool) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if !slot.available {
            return;
        }
        if down {
            slot.buttons |= button.flag();
        } else {
            slot.buttons &= !button.flag();
        }
    }

    /// Flip a slot's availability. No-op for out-of-range indices.
    pub fn set_available(&mut self, index: usize, available: bool) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.available != available {
            debug!("Slot {} availability changed to {}", index, available);
        }
        slot.available = available;
    }

    /// Replace a slot's display name, truncated to the stored bound.
    pub fn set_name(&mut self, index: usize, name: &str) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.name = bounded_name(name);
        }
    }

    pub fn is_available(&self, slot: Slot) -> bool {
        match slot {
            Slot::Any => self.slots.iter().any(|s| s.available),
            Slot::Index(index) => self.slots.get(index).is_some_and(|s| s.available),
        }
    }

    fn slot_down(&self, index: usize, button: GamepadButton) -> bool {
        self.slots
            .get(index)
            .is_some_and(|s| s.available && s.buttons & button.flag() != 0)
    }

    fn slot_pressed(&self, index: usize, button: GamepadButton) -> bool {
        self.slots.get(index).is_some_and(|s| {
            s.available && s.buttons_prev & button.flag() == 0 && s.buttons & button.flag() != 0
        })
    }

    fn slot_released(&self, index: usize, button: GamepadButton) -> bool {
        self.slots.get(index).is_some_and(|s| {
            s.available && s.buttons & button.flag() == 0 && s.buttons_prev & button.flag() != 0
        })
    }

    fn first_pressed(&self, index: usize) -> Option<(usize, GamepadButton)> {
        GamepadButton::ALL
            .iter()
            .find(|&&button| self.slot_pressed(index, button))
            .map(|&button| (index, button))
    }

    /// Snapshot current masks into the previous generation. Called once
    /// after backend init so pre-set state triggers no first-frame edge.
    fn settle(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.buttons_prev = slot.buttons;
        }
    }

    fn rotate(&mut self) {
        // Unavailable slots keep their stale masks; every query gates on
        // the availability flag, so the stale bits are unobservable.
        for slot in self.slots.iter_mut().filter(|s| s.available) {
            slot.buttons_prev = slot.buttons;
            slot.buttons = 0;
        }
    }

    fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = GamepadSlot::default();
        }
    }
}

/// Tracks button state for up to [`GAMEPAD_MAX`] gamepads.
///
/// Raw input arrives from a [`GamepadBackend`] chosen at construction;
/// the GUI side reads per-frame state through the query methods. `U` is
/// an arbitrary host payload carried alongside the table.
pub struct Gamepads<U = ()> {
    pads: PadStates,
    backend: Box<dyn GamepadBackend>,
    ctx: egui::Context,
    user_data: U,
}

impl<U> Gamepads<U> {
    /// Build a table wired to `backend`.
    ///
    /// All slots start available with default names (`"{prefix}{n}"`,
    /// 1-based); the backend's `init` then adjusts availability and
    /// names to match the devices it finds. A backend init failure
    /// aborts construction.
    pub fn new(
        ctx: egui::Context,
        mut backend: Box<dyn GamepadBackend>,
        settings: Option<GamepadSettings>,
        user_data: U,
    ) -> Result<Self, GamepadError> {
        let settings = settings.unwrap_or_default();
        info!("Initializing gamepad table with settings: {:?}", settings);

        let mut pads = PadStates::new(&settings.name_prefix);
        backend.init(&mut pads)?;

        for index in 0..GAMEPAD_MAX {
            if let Some(name) = backend.name(index) {
                pads.set_name(index, &name);
            }
        }
        pads.settle();

        info!("Gamepad table initialized with {} slots", GAMEPAD_MAX);
        Ok(Self {
            pads,
            backend,
            ctx,
            user_data,
        })
    }

    /// Advance to the next frame.
    ///
    /// Rotates every available slot's mask into the previous generation,
    /// clears the current one, then lets the backend repopulate it.
    pub fn update(&mut self) {
        self.pads.rotate();
        self.backend.update(&mut self.pads);
        for index in 0..GAMEPAD_MAX {
            if let Some(name) = self.backend.name(index) {
                self.pads.set_name(index, &name);
            }
        }
    }

    /// Report a press or release for the current frame.
    ///
    /// This is how hosts without a polling backend feed input; no-op for
    /// out-of-range indices and unavailable slots.
    pub fn button(&mut self, index: usize, button: GamepadButton, down: bool) {
        self.pads.button(index, button, down);
    }

    /// Flip a slot's availability, e.g. from a host-observed disconnect.
    pub fn set_available(&mut self, index: usize, available: bool) {
        self.pads.set_available(index, available);
    }

    /// Whether the button is held this frame.
    pub fn is_button_down(&self, slot: Slot, button: GamepadButton) -> bool {
        match slot {
            Slot::Any => (0..GAMEPAD_MAX).any(|i| self.pads.slot_down(i, button)),
            Slot::Index(index) => self.pads.slot_down(index, button),
        }
    }

    /// Whether the button went from released to held this frame.
    pub fn is_button_pressed(&self, slot: Slot, button: GamepadButton) -> bool {
        match slot {
            Slot::Any => (0..GAMEPAD_MAX).any(|i| self.pads.slot_pressed(i, button)),
            Slot::Index(index) => self.pads.slot_pressed(index, button),
        }
    }

    /// Whether the button went from held to released this frame.
    pub fn is_button_released(&self, slot: Slot, button: GamepadButton) -> bool {
        match slot {
            Slot::Any => (0..GAMEPAD_MAX).any(|i| self.pads.slot_released(i, button)),
            Slot::Index(index) => self.pads.slot_released(index, button),
        }
    }

    /// First button pressed this frame, scanning slots in ascending
    /// order and buttons in [`GamepadButton::ALL`] order.
    pub fn any_button_pressed(&self, slot: Slot) -> Option<(usize, GamepadButton)> {
        match slot {
            Slot::Any => (0..GAMEPAD_MAX).find_map(|i| self.pads.first_pressed(i)),
            Slot::Index(index) => self.pads.first_pressed(index),
        }
    }

    /// Whether the slot (or, for [`Slot::Any`], any slot) is available.
    pub fn is_available(&self, slot: Slot) -> bool {
        self.pads.is_available(slot)
    }

    /// Slot capacity, not the number of connected devices.
    pub fn count(&self) -> usize {
        self.pads.count()
    }

    /// Display name of an available slot, `None` otherwise.
    pub fn name(&self, index: usize) -> Option<&str> {
        let slot = self.pads.slots.get(index)?;
        slot.available.then_some(slot.name.as_str())
    }

    /// The egui context this table was built for.
    pub fn ctx(&self) -> &egui::Context {
        &self.ctx
    }

    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.user_data
    }
}

impl<U> Drop for Gamepads<U> {
    fn drop(&mut self) {
        self.backend.teardown();
        self.pads.clear();
    }
}

fn bounded_name(name: &str) -> String {
    let mut out = String::with_capacity(GAMEPAD_NAME_LEN);
    for c in name.chars() {
        if out.len() + c.len_utf8() > GAMEPAD_NAME_LEN - 1 {
            break;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ManualBackend;
    use crate::button::GamepadButton;

    fn table() -> Gamepads {
        Gamepads::new(egui::Context::default(), Box::new(ManualBackend), None, ())
            .expect("manual backend init cannot fail")
    }

    struct FailingBackend;

    impl GamepadBackend for FailingBackend {
        fn init(&mut self, _pads: &mut PadStates) -> Result<(), GamepadError> {
            Err(GamepadError::BackendInit("no devices".to_string()))
        }

        fn update(&mut self, _pads: &mut PadStates) {}
    }

    struct NamingBackend;

    impl GamepadBackend for NamingBackend {
        fn init(&mut self, _pads: &mut PadStates) -> Result<(), GamepadError> {
            Ok(())
        }

        fn update(&mut self, _pads: &mut PadStates) {}

        fn name(&self, slot: usize) -> Option<String> {
            (slot == 0).then(|| "Deck Controller".to_string())
        }
    }

    #[test]
    fn test_init_defaults() {
        let pads = table();
        assert_eq!(pads.count(), GAMEPAD_MAX);
        for index in 0..GAMEPAD_MAX {
            assert!(pads.is_available(Slot::Index(index)));
            assert_eq!(pads.name(index), Some(format!("Controller {}", index + 1).as_str()));
        }
    }

    #[test]
    fn test_no_edge_after_init() {
        let pads = table();
        for index in 0..GAMEPAD_MAX {
            for button in GamepadButton::ALL {
                assert!(!pads.is_button_pressed(Slot::Index(index), button));
                assert!(!pads.is_button_released(Slot::Index(index), button));
            }
        }
        assert_eq!(pads.any_button_pressed(Slot::Any), None);
    }

    #[test]
    fn test_button_bit_isolation() {
        let mut pads = table();
        pads.update();
        pads.button(0, GamepadButton::A, true);

        assert!(pads.is_button_down(Slot::Index(0), GamepadButton::A));
        assert!(pads.is_button_down(Slot::Any, GamepadButton::A));
        for button in GamepadButton::ALL {
            if button != GamepadButton::A {
                assert!(!pads.is_button_down(Slot::Index(0), button));
            }
        }
        assert!(!pads.is_button_down(Slot::Index(1), GamepadButton::A));
    }

    #[test]
    fn test_update_idempotence() {
        let mut pads = table();
        pads.update();
        pads.update();
        for index in 0..GAMEPAD_MAX {
            for button in GamepadButton::ALL {
                assert!(!pads.is_button_down(Slot::Index(index), button));
                assert!(!pads.is_button_pressed(Slot::Index(index), button));
                assert!(!pads.is_button_released(Slot::Index(index), button));
            }
        }
    }

    #[test]
    fn test_press_edge_only_on_first_frame() {
        let mut pads = table();

        pads.update();
        pads.button(0, GamepadButton::B, true);
        assert!(pads.is_button_pressed(Slot::Index(0), GamepadButton::B));

        // Held into the next frame: down, but no longer an edge.
        pads.update();
        pads.button(0, GamepadButton::B, true);
        assert!(pads.is_button_down(Slot::Index(0), GamepadButton::B));
        assert!(!pads.is_button_pressed(Slot::Index(0), GamepadButton::B));
    }

    #[test]
    fn test_release_edge() {
        let mut pads = table();

        pads.update();
        pads.button(0, GamepadButton::Start, true);
        pads.update();
        assert!(pads.is_button_released(Slot::Index(0), GamepadButton::Start));
        assert!(pads.is_button_released(Slot::Any, GamepadButton::Start));

        pads.update();
        assert!(!pads.is_button_released(Slot::Index(0), GamepadButton::Start));
    }

    #[test]
    fn test_unavailable_slot_queries_false() {
        let mut pads = table();
        pads.update();
        pads.button(2, GamepadButton::A, true);
        pads.set_available(2, false);

        // Stale mask still holds the A bit, but nothing observes it.
        assert!(!pads.is_button_down(Slot::Index(2), GamepadButton::A));
        assert!(!pads.is_button_pressed(Slot::Index(2), GamepadButton::A));
        assert_eq!(pads.name(2), None);
        assert!(!pads.is_available(Slot::Index(2)));
        assert!(pads.is_available(Slot::Any));
    }

    #[test]
    fn test_unavailable_slot_ignores_button_reports() {
        let mut pads = table();
        pads.set_available(1, false);
        pads.update();
        pads.button(1, GamepadButton::X, true);

        pads.set_available(1, true);
        assert!(!pads.is_button_down(Slot::Index(1), GamepadButton::X));
    }

    #[test]
    fn test_any_button_pressed_scan_order() {
        let mut pads = table();
        pads.update();
        pads.button(1, GamepadButton::Up, true);
        pads.button(0, GamepadButton::A, true);

        // Lowest slot index wins, then button declaration order.
        assert_eq!(pads.any_button_pressed(Slot::Any), Some((0, GamepadButton::A)));
        assert_eq!(
            pads.any_button_pressed(Slot::Index(1)),
            Some((1, GamepadButton::Up))
        );
    }

    #[test]
    fn test_any_button_pressed_declaration_order_within_slot() {
        let mut pads = table();
        pads.update();
        pads.button(0, GamepadButton::Start, true);
        pads.button(0, GamepadButton::Up, true);

        assert_eq!(pads.any_button_pressed(Slot::Any), Some((0, GamepadButton::Up)));
    }

    #[test]
    fn test_out_of_range_index_is_safe() {
        let mut pads = table();
        pads.update();
        pads.button(GAMEPAD_MAX, GamepadButton::A, true);

        assert!(!pads.is_button_down(Slot::Index(GAMEPAD_MAX), GamepadButton::A));
        assert!(!pads.is_button_pressed(Slot::Index(GAMEPAD_MAX), GamepadButton::A));
        assert!(!pads.is_button_released(Slot::Index(GAMEPAD_MAX), GamepadButton::A));
        assert!(!pads.is_available(Slot::Index(usize::MAX)));
        assert_eq!(pads.any_button_pressed(Slot::Index(GAMEPAD_MAX)), None);
        assert_eq!(pads.name(GAMEPAD_MAX), None);
    }

    #[test]
    fn test_count_ignores_availability() {
        let mut pads = table();
        for index in 0..GAMEPAD_MAX {
            pads.set_available(index, false);
        }
        assert_eq!(pads.count(), GAMEPAD_MAX);
        assert!(!pads.is_available(Slot::Any));
    }

    #[test]
    fn test_backend_init_failure_propagates() {
        let result = Gamepads::new(
            egui::Context::default(),
            Box::new(FailingBackend),
            None,
            (),
        );
        assert!(matches!(result, Err(GamepadError::BackendInit(_))));
    }

    #[test]
    fn test_backend_name_override() {
        let pads: Gamepads = Gamepads::new(
            egui::Context::default(),
            Box::new(NamingBackend),
            None,
            (),
        )
        .unwrap();
        assert_eq!(pads.name(0), Some("Deck Controller"));
        assert_eq!(pads.name(1), Some("Controller 2"));
    }

    #[test]
    fn test_custom_prefix_and_truncation() {
        let settings = GamepadSettings {
            name_prefix: "Spieler Nummer ".to_string(),
        };
        let pads: Gamepads = Gamepads::new(
            egui::Context::default(),
            Box::new(ManualBackend),
            Some(settings),
            (),
        )
        .unwrap();

        // "Spieler Nummer 1" is 16 bytes, one over the stored bound.
        assert_eq!(pads.name(0), Some("Spieler Nummer "));
        assert!(pads.name(0).unwrap().len() < GAMEPAD_NAME_LEN);
    }

    #[test]
    fn test_user_data_round_trip() {
        let mut pads: Gamepads<u32> = Gamepads::new(
            egui::Context::default(),
            Box::new(ManualBackend),
            None,
            7,
        )
        .unwrap();
        assert_eq!(*pads.user_data(), 7);
        *pads.user_data_mut() = 9;
        assert_eq!(*pads.user_data(), 9);
    }

    #[test]
    fn test_slot_from_usize() {
        assert_eq!(Slot::from(3), Slot::Index(3));
        let slot: Slot = 0.into();
        assert_eq!(slot, Slot::Index(0));
    }
}
