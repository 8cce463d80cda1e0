mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    hotkey_config::HotkeyConfig,
};

pub(crate) const DEFAULT_TOGGLE_BINDING: &str = "ctrl+shift+Space";
pub(crate) const DEFAULT_TAP_THRESHOLD_MS: u64 = 200;
pub(crate) const DEFAULT_RELOAD_INTERVAL_MS: u64 = 1000;

pub(crate) fn default_toggle_binding() -> String {
    DEFAULT_TOGGLE_BINDING.to_string()
}

pub(crate) fn default_tap_threshold_ms() -> u64 {
    DEFAULT_TAP_THRESHOLD_MS
}

pub(crate) fn default_reload_interval_ms() -> u64 {
    DEFAULT_RELOAD_INTERVAL_MS
}
