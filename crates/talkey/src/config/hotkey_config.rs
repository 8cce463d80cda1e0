use crate::config::{
    DEFAULT_TAP_THRESHOLD_MS, default_tap_threshold_ms, default_toggle_binding,
};

use serde::{Deserialize, Serialize};

/// Trigger key configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Accelerator for the tap-to-toggle trigger, e.g. `"ctrl+shift+Space"`.
    #[serde(default = "default_toggle_binding")]
    pub toggle: String,

    /// Accelerator for the hold-to-talk trigger. Unset (or empty) means the
    /// toggle key does both jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_to_talk: Option<String>,

    /// Presses of a shared key shorter than this are taps, in milliseconds.
    #[serde(default = "default_tap_threshold_ms")]
    pub tap_threshold_ms: u64,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle_binding(),
            push_to_talk: None,
            tap_threshold_ms: DEFAULT_TAP_THRESHOLD_MS,
        }
    }
}
