use crate::{CapturedAudio, CoreResult};

use uuid::Uuid;

/// The finalization collaborator.
///
/// Both methods hand the buffer off and return; the controller never waits
/// for the work behind them.
pub trait Finalizer {
    /// Hand a completed session to transcription.
    fn finalize(&self, session_id: Uuid, audio: CapturedAudio) -> CoreResult<()>;

    /// Drop a cancelled session. Must never lead to transcription.
    fn discard(&self, session_id: Uuid, audio: CapturedAudio) -> CoreResult<()>;
}
