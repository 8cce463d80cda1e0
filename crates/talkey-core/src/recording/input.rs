use crate::{HotkeyEvent, KeyEdge, TriggerIdentity};

use std::time::Instant;

/// Everything the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderInput {
    /// A trigger key went down.
    KeyDown {
        /// Trigger the key is registered as.
        identity: TriggerIdentity,
        /// When the OS delivered the edge.
        at: Instant,
    },
    /// A trigger key came back up.
    KeyUp {
        /// Trigger the key is registered as.
        identity: TriggerIdentity,
        /// When the OS delivered the edge.
        at: Instant,
    },
    /// The cancel key was pressed while the cancel watch was enabled.
    EscapePressed,
}

impl From<HotkeyEvent> for RecorderInput {
    fn from(event: HotkeyEvent) -> Self {
        match event.edge {
            KeyEdge::KeyDown => RecorderInput::KeyDown {
                identity: event.identity,
                at: event.timestamp,
            },
            KeyEdge::KeyUp => RecorderInput::KeyUp {
                identity: event.identity,
                at: event.timestamp,
            },
        }
    }
}
