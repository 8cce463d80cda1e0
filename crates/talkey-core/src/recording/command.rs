use uuid::Uuid;

/// Side effects emitted by the state machine, executed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// Start capturing audio immediately.
    StartCapture {
        /// Session the capture belongs to.
        session_id: Uuid,
    },
    /// Stop capturing and hand the audio to the finalization stage.
    StopCaptureAndFinalize {
        /// Session being finalized.
        session_id: Uuid,
    },
    /// Stop capturing and drop the audio without finalizing it.
    StopCaptureAndDiscard {
        /// Session being discarded.
        session_id: Uuid,
    },
    /// Start listening for the cancel key.
    EnableCancelWatch,
    /// Stop listening for the cancel key.
    DisableCancelWatch,
}
