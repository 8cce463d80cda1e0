use crate::{KeyEdge, RecorderCommand, RecordingMode, TriggerIdentity};

use uuid::Uuid;

/// Why an input did not change the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event does not fit the current state (e.g. a trigger that does not
    /// own the active session).
    UnexpectedEventForState {
        /// Identity carried by the event.
        identity: TriggerIdentity,
        /// Edge carried by the event.
        edge: KeyEdge,
    },
    /// The cancel key arrived while no toggled recording was active.
    StaleCancelSignal,
    /// Key releases never affect a toggled recording.
    ReleaseWhileToggled,
    /// A release with no matching press, such as the release that follows a
    /// toggle-off press.
    UnmatchedRelease,
    /// Auto-repeat of the key that is already held.
    RepeatedPress,
}

/// Result of feeding one input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The session changed; `commands` must be executed in order.
    Accepted {
        /// Session the transition belongs to.
        session_id: Uuid,
        /// Mode before the input.
        from: RecordingMode,
        /// Mode after the input.
        to: RecordingMode,
        /// Side effects to execute.
        commands: Vec<RecorderCommand>,
    },
    /// Nothing changed.
    Ignored {
        /// Mode the machine stayed in.
        mode: RecordingMode,
        /// Why the input was ignored.
        reason: IgnoreReason,
    },
}

impl Transition {
    /// Commands to execute; empty when ignored.
    pub fn commands(&self) -> &[RecorderCommand] {
        match self {
            Transition::Accepted { commands, .. } => commands,
            Transition::Ignored { .. } => &[],
        }
    }

    /// Mode after the input was processed.
    pub fn mode(&self) -> RecordingMode {
        match self {
            Transition::Accepted { to, .. } => *to,
            Transition::Ignored { mode, .. } => *mode,
        }
    }

    /// True when the input changed the session.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Transition::Accepted { .. })
    }
}
