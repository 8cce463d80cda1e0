use crate::{AppCommand, PipelineFinalizer};

use talkey_core::{CapturedAudio, CoreError, Finalizer};
use tokio::sync::mpsc;
use uuid::Uuid;

fn audio() -> CapturedAudio {
    CapturedAudio::new(vec![0.25; 800], 16_000, 1)
}

/// WHAT: Finalize queues the session with its audio
/// WHY: The async pipeline must receive exactly what was captured
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_open_channel_when_finalizing_then_audio_queued() {
    // Given: A finalizer over an open channel
    let (command_tx, mut command_rx) = mpsc::channel(4);
    let finalizer = PipelineFinalizer::new(command_tx);
    let session_id = Uuid::new_v4();

    // When: Finalizing
    finalizer.finalize(session_id, audio()).unwrap();

    // Then: The command carries the session and buffer
    let command = command_rx.recv().await.unwrap();
    assert!(matches!(
        &command,
        AppCommand::Finalize { session_id: id, audio: received }
            if *id == session_id && *received == audio()
    ));
}

/// WHAT: Discard never forwards the audio
/// WHY: Cancelled recordings must not reach transcription
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_open_channel_when_discarding_then_only_count_queued() {
    // Given: A finalizer over an open channel
    let (command_tx, mut command_rx) = mpsc::channel(4);
    let finalizer = PipelineFinalizer::new(command_tx);
    let session_id = Uuid::new_v4();

    // When: Discarding
    finalizer.discard(session_id, audio()).unwrap();

    // Then: Only the sample count travels
    let command = command_rx.recv().await.unwrap();
    assert!(matches!(
        command,
        AppCommand::Discard { session_id: id, sample_count: 800 } if id == session_id
    ));
}

/// WHAT: A closed pipeline is a hand-off error, not a block
/// WHY: The event-loop thread must never wait on the async side
#[test]
fn given_closed_channel_when_finalizing_then_handoff_failed() {
    // Given: The receiving side is gone
    let (command_tx, command_rx) = mpsc::channel(1);
    drop(command_rx);
    let finalizer = PipelineFinalizer::new(command_tx);

    // When: Finalizing
    let result = finalizer.finalize(Uuid::new_v4(), audio());

    // Then: HandoffFailed
    assert!(matches!(result, Err(CoreError::HandoffFailed { .. })));
}

/// WHAT: A full pipeline is reported instead of waited on
/// WHY: try_send keeps the hotkey path responsive under backlog
#[test]
#[allow(clippy::unwrap_used)]
fn given_full_channel_when_finalizing_then_handoff_failed() {
    // Given: A channel with its single slot taken
    let (command_tx, _command_rx) = mpsc::channel(1);
    let finalizer = PipelineFinalizer::new(command_tx);
    finalizer.finalize(Uuid::new_v4(), audio()).unwrap();

    // When: A second session arrives
    let result = finalizer.finalize(Uuid::new_v4(), audio());

    // Then: HandoffFailed
    assert!(matches!(result, Err(CoreError::HandoffFailed { .. })));
}
