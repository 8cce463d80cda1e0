//! Tap/hold recording state machine.
//!
//! Consumes trigger edges and cancel presses, owns the single
//! [`RecordingSession`], and answers every input with a [`Transition`]
//! describing the commands to run. It never fails and never blocks: capture
//! and finalization happen in the controller.
//!
//! A press of the shared trigger starts capture immediately. The tap/hold
//! decision is made synchronously at key-up by comparing the key-up instant
//! with the key-down instant of the same press; no timer is involved.
//!
//! The machine also remembers which trigger keys are physically down, so an
//! OS auto-repeat key-down is ignored in every state, not only while holding.

use crate::{
    IgnoreReason, KeyEdge, RecorderCommand, RecorderInput, RecordingMode, RecordingSession,
    Transition, TriggerIdentity,
};

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

/// Releases of the shared trigger shorter than this are taps.
///
/// Deliberate taps land around 100-150 ms; holding the key long enough to
/// say a single word takes well over 400 ms.
pub const DEFAULT_TAP_THRESHOLD: Duration = Duration::from_millis(200);

/// The recording state machine.
///
/// Not thread-safe: feed it from a single event-dispatch thread, in delivery order.
#[derive(Debug)]
pub struct RecordingStateMachine {
    session: RecordingSession,
    tap_threshold: Duration,
    keys_down: Vec<TriggerIdentity>,
}

impl Default for RecordingStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_THRESHOLD)
    }
}

impl RecordingStateMachine {
    /// Create an idle machine with the given tap threshold.
    pub fn new(tap_threshold: Duration) -> Self {
        Self {
            session: RecordingSession::Idle,
            tap_threshold,
            keys_down: Vec::new(),
        }
    }

    /// The current session.
    pub fn session(&self) -> RecordingSession {
        self.session
    }

    /// The current mode.
    pub fn mode(&self) -> RecordingMode {
        self.session.mode()
    }

    /// Threshold separating taps from holds on the shared trigger.
    pub fn tap_threshold(&self) -> Duration {
        self.tap_threshold
    }

    /// Change the tap threshold. Takes effect from the next key-up.
    pub fn set_tap_threshold(&mut self, tap_threshold: Duration) {
        self.tap_threshold = tap_threshold;
    }

    /// Feed one input and get back what happened.
    pub fn handle(&mut self, input: RecorderInput) -> Transition {
        if self.track_key(input) {
            return self.ignore(IgnoreReason::RepeatedPress);
        }

        match (self.session, input) {
            (RecordingSession::Idle, RecorderInput::KeyDown { identity, at }) => {
                self.press_from_idle(identity, at)
            }

            (
                RecordingSession::Holding {
                    identity: active,
                    pressed_at,
                    session_id,
                },
                RecorderInput::KeyUp { identity, at },
            ) if identity == active => self.release_held(active, pressed_at, session_id, at),

            (
                RecordingSession::Toggled {
                    identity: active,
                    session_id,
                    ..
                },
                RecorderInput::KeyDown { identity, .. },
            ) if identity == active => {
                info!(session_id = %session_id, identity = %identity, "Toggled recording stopped");
                self.finish(
                    session_id,
                    vec![
                        RecorderCommand::StopCaptureAndFinalize { session_id },
                        RecorderCommand::DisableCancelWatch,
                    ],
                )
            }

            (RecordingSession::Toggled { session_id, .. }, RecorderInput::EscapePressed) => {
                info!(session_id = %session_id, "Toggled recording cancelled");
                self.finish(
                    session_id,
                    vec![
                        RecorderCommand::StopCaptureAndDiscard { session_id },
                        RecorderCommand::DisableCancelWatch,
                    ],
                )
            }

            (RecordingSession::Toggled { .. }, RecorderInput::KeyUp { .. }) => {
                self.ignore(IgnoreReason::ReleaseWhileToggled)
            }

            (RecordingSession::Idle, RecorderInput::KeyUp { .. }) => {
                self.ignore(IgnoreReason::UnmatchedRelease)
            }

            (_, RecorderInput::EscapePressed) => self.ignore(IgnoreReason::StaleCancelSignal),

            (_, RecorderInput::KeyDown { identity, .. }) => {
                self.ignore(IgnoreReason::UnexpectedEventForState {
                    identity,
                    edge: KeyEdge::KeyDown,
                })
            }

            (_, RecorderInput::KeyUp { identity, .. }) => {
                self.ignore(IgnoreReason::UnexpectedEventForState {
                    identity,
                    edge: KeyEdge::KeyUp,
                })
            }
        }
    }

    /// Force the active session to end without finalizing it.
    ///
    /// Used before reconfiguring triggers and at shutdown. Returns `None`
    /// when already idle.
    pub fn abort(&mut self) -> Option<Transition> {
        // Identities may be re-derived after this, so held keys are forgotten.
        self.keys_down.clear();

        match self.session {
            RecordingSession::Idle => None,
            RecordingSession::Holding { session_id, .. } => {
                warn!(session_id = %session_id, "Aborting held recording");
                Some(self.finish(
                    session_id,
                    vec![RecorderCommand::StopCaptureAndDiscard { session_id }],
                ))
            }
            RecordingSession::Toggled { session_id, .. } => {
                warn!(session_id = %session_id, "Aborting toggled recording");
                Some(self.finish(
                    session_id,
                    vec![
                        RecorderCommand::StopCaptureAndDiscard { session_id },
                        RecorderCommand::DisableCancelWatch,
                    ],
                ))
            }
        }
    }

    /// Drop the session without emitting commands, for when capture never started.
    pub fn reset(&mut self) -> RecordingMode {
        let previous = self.session.mode();
        self.session = RecordingSession::Idle;
        previous
    }

    /// True when `input` is a key-down for a key that is already down.
    fn track_key(&mut self, input: RecorderInput) -> bool {
        match input {
            RecorderInput::KeyDown { identity, .. } => {
                if self.keys_down.contains(&identity) {
                    return true;
                }
                self.keys_down.push(identity);
                false
            }
            RecorderInput::KeyUp { identity, .. } => {
                self.keys_down.retain(|&down| down != identity);
                false
            }
            RecorderInput::EscapePressed => false,
        }
    }

    fn press_from_idle(&mut self, identity: TriggerIdentity, at: Instant) -> Transition {
        let session_id = Uuid::new_v4();
        let start = RecorderCommand::StartCapture { session_id };

        let (session, commands) = match identity {
            TriggerIdentity::PushToTalkOnly => (
                RecordingSession::Holding {
                    identity,
                    pressed_at: None,
                    session_id,
                },
                vec![start],
            ),
            TriggerIdentity::ToggleOnly => (
                RecordingSession::Toggled {
                    identity,
                    pressed_at: None,
                    session_id,
                },
                vec![start, RecorderCommand::EnableCancelWatch],
            ),
            TriggerIdentity::Shared => (
                RecordingSession::Holding {
                    identity,
                    pressed_at: Some(at),
                    session_id,
                },
                vec![start],
            ),
        };

        info!(session_id = %session_id, identity = %identity, mode = %session.mode(), "Recording started");

        self.transition(session_id, session, commands)
    }

    fn release_held(
        &mut self,
        identity: TriggerIdentity,
        pressed_at: Option<Instant>,
        session_id: Uuid,
        released_at: Instant,
    ) -> Transition {
        let Some(pressed_at) = pressed_at else {
            info!(session_id = %session_id, identity = %identity, "Push-to-talk released");
            return self.finish(
                session_id,
                vec![RecorderCommand::StopCaptureAndFinalize { session_id }],
            );
        };

        let held_for = released_at.saturating_duration_since(pressed_at);

        if held_for < self.tap_threshold {
            info!(
                session_id = %session_id,
                held_ms = held_for.as_millis(),
                "Tap detected, recording toggled on"
            );
            self.transition(
                session_id,
                RecordingSession::Toggled {
                    identity,
                    pressed_at: Some(pressed_at),
                    session_id,
                },
                vec![RecorderCommand::EnableCancelWatch],
            )
        } else {
            info!(
                session_id = %session_id,
                held_ms = held_for.as_millis(),
                "Hold released"
            );
            self.finish(
                session_id,
                vec![RecorderCommand::StopCaptureAndFinalize { session_id }],
            )
        }
    }

    fn finish(&mut self, session_id: Uuid, commands: Vec<RecorderCommand>) -> Transition {
        self.transition(session_id, RecordingSession::Idle, commands)
    }

    fn transition(
        &mut self,
        session_id: Uuid,
        next: RecordingSession,
        commands: Vec<RecorderCommand>,
    ) -> Transition {
        let from = self.session.mode();
        self.session = next;

        debug!(
            session_id = %session_id,
            from = %from,
            to = %next.mode(),
            commands = commands.len(),
            "State transition"
        );

        Transition::Accepted {
            session_id,
            from,
            to: next.mode(),
            commands,
        }
    }

    fn ignore(&self, reason: IgnoreReason) -> Transition {
        let mode = self.session.mode();

        match reason {
            IgnoreReason::UnexpectedEventForState { identity, edge } => {
                warn!(mode = %mode, identity = %identity, edge = ?edge, "Unexpected event for state, ignored");
            }
            _ => debug!(mode = %mode, reason = ?reason, "Input ignored"),
        }

        Transition::Ignored { mode, reason }
    }
}
