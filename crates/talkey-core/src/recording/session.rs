use crate::TriggerIdentity;

use std::{fmt, time::Instant};

use uuid::Uuid;

/// Coarse recording mode, used for reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Not recording.
    Idle,
    /// Recording while a key is held (or while a shared key's tap/hold is undecided).
    Holding,
    /// Recording that persists across key release.
    Toggled,
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingMode::Idle => write!(f, "Idle"),
            RecordingMode::Holding => write!(f, "Holding"),
            RecordingMode::Toggled => write!(f, "Toggled"),
        }
    }
}

/// The single recording session owned by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingSession {
    /// Not currently recording.
    #[default]
    Idle,
    /// Capturing while the trigger is down.
    Holding {
        /// Trigger that started the session.
        identity: TriggerIdentity,
        /// Key-down instant; only kept for the shared trigger.
        pressed_at: Option<Instant>,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Capturing until the trigger is pressed again or the session is cancelled.
    Toggled {
        /// Trigger that started the session.
        identity: TriggerIdentity,
        /// Key-down instant; only kept for the shared trigger.
        pressed_at: Option<Instant>,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingSession {
    /// Current mode.
    pub fn mode(&self) -> RecordingMode {
        match self {
            RecordingSession::Idle => RecordingMode::Idle,
            RecordingSession::Holding { .. } => RecordingMode::Holding,
            RecordingSession::Toggled { .. } => RecordingMode::Toggled,
        }
    }

    /// Trigger that owns the session, if any.
    pub fn active_identity(&self) -> Option<TriggerIdentity> {
        match self {
            RecordingSession::Idle => None,
            RecordingSession::Holding { identity, .. }
            | RecordingSession::Toggled { identity, .. } => Some(*identity),
        }
    }

    /// Key-down instant of the shared trigger press that started the session.
    pub fn pressed_at(&self) -> Option<Instant> {
        match self {
            RecordingSession::Idle => None,
            RecordingSession::Holding { pressed_at, .. }
            | RecordingSession::Toggled { pressed_at, .. } => *pressed_at,
        }
    }

    /// Session ID, if recording.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            RecordingSession::Idle => None,
            RecordingSession::Holding { session_id, .. }
            | RecordingSession::Toggled { session_id, .. } => Some(*session_id),
        }
    }
}
