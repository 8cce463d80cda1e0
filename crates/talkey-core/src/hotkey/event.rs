use crate::TriggerIdentity;

use std::time::Instant;

use global_hotkey::HotKeyState;

/// Which edge of a key press was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    /// The key went down.
    KeyDown,
    /// The key came back up.
    KeyUp,
}

impl From<HotKeyState> for KeyEdge {
    fn from(state: HotKeyState) -> Self {
        match state {
            HotKeyState::Pressed => KeyEdge::KeyDown,
            HotKeyState::Released => KeyEdge::KeyUp,
        }
    }
}

/// A trigger edge tagged with the identity it was registered under.
///
/// Created by the registry for every OS callback and consumed immediately by
/// the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyEvent {
    /// Identity resolved at registration time.
    pub identity: TriggerIdentity,
    /// Down or up.
    pub edge: KeyEdge,
    /// Monotonic time the OS delivered the event.
    pub timestamp: Instant,
}
