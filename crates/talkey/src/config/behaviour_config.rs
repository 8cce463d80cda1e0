use crate::config::{DEFAULT_RELOAD_INTERVAL_MS, default_reload_interval_ms};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// How often the config file is checked for edits, in milliseconds.
    #[serde(default = "default_reload_interval_ms")]
    pub reload_interval_ms: u64,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            reload_interval_ms: DEFAULT_RELOAD_INTERVAL_MS,
        }
    }
}
