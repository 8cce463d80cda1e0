//! Configuration management for talkey.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations. Trigger accelerators are kept as
//! strings on disk and parsed into bindings on demand, so a typo in one
//! field reports a readable error instead of failing the whole file.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, BehaviourConfig, HotkeyConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use talkey_core::{TriggerBinding, TriggerBindings, TriggerRole};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Trigger key settings.
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    /// Audio device configuration.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Application behavior settings.
    #[serde(default)]
    pub behaviour: BehaviourConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            info!(config_path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Read and parse a configuration file.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML text. Missing sections take their defaults.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Parse the configured accelerators into trigger bindings.
    ///
    /// An unset or blank push-to-talk accelerator means the toggle key
    /// serves both roles.
    #[track_caller]
    pub fn bindings(&self) -> AppResult<TriggerBindings> {
        let toggle = TriggerBinding::parse(&self.hotkeys.toggle, TriggerRole::Toggle)?;

        let push_to_talk = match self.hotkeys.push_to_talk.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(accelerator) => Some(TriggerBinding::parse(accelerator, TriggerRole::PushToTalk)?),
        };

        Ok(TriggerBindings::new(toggle, push_to_talk))
    }

    /// Presses of a shared trigger shorter than this are taps.
    pub fn tap_threshold(&self) -> Duration {
        Duration::from_millis(self.hotkeys.tap_threshold_ms)
    }

    /// How often the config file is checked for edits.
    pub fn reload_interval(&self) -> Duration {
        // A zero interval would spin the watcher.
        Duration::from_millis(self.behaviour.reload_interval_ms.max(50))
    }

    /// Settings that differ from `current` but are only read at startup.
    ///
    /// Triggers, tap threshold and reload interval apply live; the audio
    /// device is opened once.
    pub fn restart_required(&self, current: &Config) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.audio.selected_device != current.audio.selected_device {
            changed.push("audio.selected_device");
        }
        changed
    }

    /// Save configuration to disk using atomic write pattern.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Write to a temporary file first, then rename over `path`.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(())
    }

    /// Location of `config.toml`, creating its directory if needed.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "talkey", "Talkey").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config::default();
        config.save()?;

        info!(toggle = %config.hotkeys.toggle, "Default config created");

        Ok(config)
    }
}
