use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};

/// Role a binding plays when it is not shared with the other trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerRole {
    /// Press once to start, press again to stop.
    Toggle,
    /// Record only while the key is held.
    PushToTalk,
}

/// Immutable description of one logical trigger.
///
/// Replaced wholesale whenever the configuration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBinding {
    modifiers: Modifiers,
    key: Code,
    role: TriggerRole,
}

impl TriggerBinding {
    /// Create a binding from a modifier set and key.
    pub fn new(modifiers: Modifiers, key: Code, role: TriggerRole) -> Self {
        Self {
            modifiers,
            key,
            role,
        }
    }

    /// Shorthand for a [`TriggerRole::Toggle`] binding.
    pub fn toggle(modifiers: Modifiers, key: Code) -> Self {
        Self::new(modifiers, key, TriggerRole::Toggle)
    }

    /// Shorthand for a [`TriggerRole::PushToTalk`] binding.
    pub fn push_to_talk(modifiers: Modifiers, key: Code) -> Self {
        Self::new(modifiers, key, TriggerRole::PushToTalk)
    }

    /// Parse an accelerator string such as `"ctrl+shift+Space"`.
    #[track_caller]
    pub fn parse(input: &str, role: TriggerRole) -> CoreResult<Self> {
        let hotkey = HotKey::from_str(input).map_err(|e| CoreError::InvalidBinding {
            input: input.to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self::new(hotkey.mods, hotkey.key, role))
    }

    /// Modifier keys that must be held.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The non-modifier key.
    pub fn key(&self) -> Code {
        self.key
    }

    /// The role this binding was configured for.
    pub fn role(&self) -> TriggerRole {
        self.role
    }

    /// True when both bindings use the same key combination, regardless of role.
    pub fn shares_keys_with(&self, other: &TriggerBinding) -> bool {
        self.modifiers == other.modifiers && self.key == other.key
    }

    /// The OS hotkey for this combination.
    pub fn hotkey(&self) -> HotKey {
        HotKey::new(Some(self.modifiers), self.key)
    }
}

impl fmt::Display for TriggerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::SUPER, "Super"),
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
        ];

        for (modifier, name) in names {
            if self.modifiers.contains(modifier) {
                write!(f, "{}+", name)?;
            }
        }

        write!(f, "{:?}", self.key)
    }
}
