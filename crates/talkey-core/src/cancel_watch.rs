//! Gated listener for the cancel key.
//!
//! The Escape key is only claimed system-wide while a toggled recording is
//! active, so it keeps its normal meaning in other applications the rest of
//! the time. The gate is closed before the OS registration is released: an
//! Escape press already queued behind the disable is dropped as stale
//! rather than applied to a later session.

use crate::{CoreError, CoreResult, HotkeyBackend};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, HotKeyState,
    hotkey::{Code, HotKey},
};
use tracing::{debug, info, instrument, warn};

/// How a raw OS event relates to the cancel watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelSignal {
    /// Not a cancel-key press; route it to the trigger registry.
    NotCancelKey,
    /// A cancel press while the watch is enabled.
    Accepted,
    /// A cancel-key event that arrived while the watch is disabled, or its release edge.
    Stale,
}

/// Enable/disable-able listener for one cancellation key.
pub struct CancelWatch<B: HotkeyBackend> {
    backend: B,
    hotkey: HotKey,
    enabled: bool,
    registered: bool,
}

impl<B: HotkeyBackend> CancelWatch<B> {
    /// Watch for a bare Escape press.
    pub fn escape(backend: B) -> Self {
        Self::new(backend, HotKey::new(None, Code::Escape))
    }

    /// Watch for an arbitrary key combination.
    pub fn new(backend: B, hotkey: HotKey) -> Self {
        Self {
            backend,
            hotkey,
            enabled: false,
            registered: false,
        }
    }

    /// The key combination this watch claims.
    pub fn hotkey(&self) -> HotKey {
        self.hotkey
    }

    /// True while cancel presses are forwarded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open the gate and claim the cancel key. Idempotent.
    ///
    /// The gate opens even if the OS refuses the key; the error reports that
    /// cancel presses will not arrive for this session.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn enable(&mut self) -> CoreResult<()> {
        if self.enabled {
            return Ok(());
        }
        self.enabled = true;

        if !self.registered {
            self.backend
                .register(self.hotkey)
                .map_err(|e| CoreError::CancelKeyUnavailable {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            self.registered = true;
        }

        info!("Cancel watch enabled");

        Ok(())
    }

    /// Close the gate and release the cancel key. Idempotent.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn disable(&mut self) -> CoreResult<()> {
        if !self.enabled && !self.registered {
            return Ok(());
        }
        self.enabled = false;

        if self.registered {
            self.registered = false;
            self.backend
                .unregister(self.hotkey)
                .map_err(|e| CoreError::UnregisterFailed {
                    binding: "Escape".to_string(),
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        info!("Cancel watch disabled");

        Ok(())
    }

    /// Classify a raw OS event.
    pub fn classify(&self, raw: &GlobalHotKeyEvent) -> CancelSignal {
        if raw.id != self.hotkey.id() {
            return CancelSignal::NotCancelKey;
        }

        match (self.enabled, raw.state) {
            (true, HotKeyState::Pressed) => CancelSignal::Accepted,
            (true, HotKeyState::Released) => CancelSignal::Stale,
            (false, _) => {
                debug!("Stale cancel signal dropped");
                CancelSignal::Stale
            }
        }
    }
}

impl<B: HotkeyBackend> Drop for CancelWatch<B> {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            warn!(error = %e, "Failed to release cancel key on drop");
        }
    }
}
