//! Talkey Core Library
//!
//! One key, two behaviours: tap it to toggle recording on, hold it to talk.
//! The tap/hold decision is made at key-up from the measured press length.
//! While a toggled recording runs, Escape cancels it.
//!
//! # Example
//!
//! ```
//! use talkey_core::{RecorderInput, RecordingMode, RecordingStateMachine, TriggerIdentity};
//!
//! use std::time::{Duration, Instant};
//!
//! let mut machine = RecordingStateMachine::default();
//! let t0 = Instant::now();
//!
//! machine.handle(RecorderInput::KeyDown { identity: TriggerIdentity::Shared, at: t0 });
//! let tap = machine.handle(RecorderInput::KeyUp {
//!     identity: TriggerIdentity::Shared,
//!     at: t0 + Duration::from_millis(120),
//! });
//!
//! assert_eq!(tap.mode(), RecordingMode::Toggled);
//! ```

mod binding;
mod cancel_watch;
mod collaborator;
mod controller;
mod error;
mod hotkey;
mod recording;

pub use {
    binding::{TriggerBinding, TriggerBindings, TriggerIdentity, TriggerRole},
    cancel_watch::{CancelSignal, CancelWatch},
    collaborator::{AudioSource, CapturedAudio, Finalizer},
    controller::RecordingController,
    error::{CoreError, Result as CoreResult},
    hotkey::{HotkeyBackend, HotkeyEvent, HotkeyRegistry, KeyEdge, RegistrationReport},
    recording::{
        DEFAULT_TAP_THRESHOLD, IgnoreReason, RecorderCommand, RecorderInput, RecordingMode,
        RecordingSession, RecordingStateMachine, Transition,
    },
};

#[cfg(test)]
mod tests;
