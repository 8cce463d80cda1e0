mod command;
mod input;
mod machine;
mod session;
mod transition;

pub use {
    command::RecorderCommand,
    input::RecorderInput,
    machine::{DEFAULT_TAP_THRESHOLD, RecordingStateMachine},
    session::{RecordingMode, RecordingSession},
    transition::{IgnoreReason, Transition},
};
