use talkey_core::CapturedAudio;

use uuid::Uuid;

/// Work handed from the recording controller to the async pipeline.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// A completed session ready for transcription.
    Finalize {
        /// Session the audio belongs to.
        session_id: Uuid,
        /// The captured buffer.
        audio: CapturedAudio,
    },
    /// A cancelled session. The audio has already been dropped.
    Discard {
        /// Session that was cancelled.
        session_id: Uuid,
        /// How many samples were thrown away.
        sample_count: usize,
    },
}
