use crate::AppCommand;

use std::panic::Location;

use error_location::ErrorLocation;
use talkey_core::{CapturedAudio, CoreError, CoreResult, Finalizer};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Hands finished sessions to the async pipeline without blocking.
///
/// Runs on the event-loop thread, so a full or closed channel is reported
/// as an error rather than waited on.
pub struct PipelineFinalizer {
    command_tx: mpsc::Sender<AppCommand>,
}

impl PipelineFinalizer {
    /// Wrap the sending half of the pipeline channel.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }
}

impl Finalizer for PipelineFinalizer {
    #[track_caller]
    fn finalize(&self, session_id: Uuid, audio: CapturedAudio) -> CoreResult<()> {
        debug!(session_id = %session_id, sample_count = audio.samples.len(), "Queueing session for finalization");

        self.command_tx
            .try_send(AppCommand::Finalize { session_id, audio })
            .map_err(|e| CoreError::HandoffFailed {
                reason: format!("Failed to queue session {}: {}", session_id, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    fn discard(&self, session_id: Uuid, audio: CapturedAudio) -> CoreResult<()> {
        let sample_count = audio.samples.len();
        drop(audio);

        self.command_tx
            .try_send(AppCommand::Discard {
                session_id,
                sample_count,
            })
            .map_err(|e| CoreError::HandoffFailed {
                reason: format!("Failed to report discarded session {}: {}", session_id, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
