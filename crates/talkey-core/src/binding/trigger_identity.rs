use std::fmt;

/// Which logical trigger a registered hotkey stands for.
///
/// Derived from the configured bindings on every registration cycle and
/// stamped onto each [`HotkeyEvent`](crate::HotkeyEvent) by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerIdentity {
    /// Toggle and push-to-talk use the same key; tap/hold is decided by timing.
    Shared,
    /// The exclusive toggle key.
    ToggleOnly,
    /// The exclusive push-to-talk key.
    PushToTalkOnly,
}

impl fmt::Display for TriggerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerIdentity::Shared => write!(f, "shared"),
            TriggerIdentity::ToggleOnly => write!(f, "toggle"),
            TriggerIdentity::PushToTalkOnly => write!(f, "push-to-talk"),
        }
    }
}
