use crate::TriggerIdentity;

use error_location::ErrorLocation;
use thiserror::Error;

/// Trigger and recording errors with source location tracking.
///
/// None of these are fatal. Registry conflicts are reported to the caller,
/// collaborator failures are logged and leave the recording session `Idle`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The OS refused to register a trigger (usually claimed by another process).
    #[error("Binding conflict for {identity} trigger {binding}: {reason} {location}")]
    BindingConflict {
        /// Identity the binding would have been registered under.
        identity: TriggerIdentity,
        /// Human-readable form of the binding.
        binding: String,
        /// Reason reported by the OS backend.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Releasing an OS registration failed.
    #[error("Failed to unregister {binding}: {reason} {location}")]
    UnregisterFailed {
        /// Human-readable form of the binding.
        binding: String,
        /// Reason reported by the OS backend.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The cancel key could not be registered while a toggled recording is active.
    #[error("Cancel key unavailable: {reason} {location}")]
    CancelKeyUnavailable {
        /// Reason reported by the OS backend.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An accelerator string could not be parsed into a binding.
    #[error("Invalid binding {input:?}: {reason} {location}")]
    InvalidBinding {
        /// The accelerator string as supplied.
        input: String,
        /// Parser error message.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio capture collaborator failed to start or stop.
    #[error("Audio capture failed: {reason} {location}")]
    CaptureFailed {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Captured audio could not be handed to the finalization stage.
    #[error("Audio hand-off failed: {reason} {location}")]
    HandoffFailed {
        /// Description of the hand-off failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
