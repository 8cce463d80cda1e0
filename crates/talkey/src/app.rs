use crate::{AppCommand, AppResult, LoopEvent};

use std::time::Duration;

use talkey_core::CapturedAudio;
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// What a finished session produced, as logged at hand-off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    /// Session the audio belongs to.
    pub session_id: Uuid,
    /// Recorded length.
    pub duration: Duration,
    /// Interleaved sample count.
    pub sample_count: usize,
    /// Largest absolute amplitude.
    pub peak: f32,
}

impl SessionSummary {
    /// Measure a captured buffer.
    pub fn new(session_id: Uuid, audio: &CapturedAudio) -> Self {
        Self {
            session_id,
            duration: audio.duration(),
            sample_count: audio.samples.len(),
            peak: audio.peak(),
        }
    }

    /// True when nothing above the noise floor was captured.
    pub fn is_silent(&self) -> bool {
        self.sample_count == 0 || self.peak < SILENCE_PEAK
    }
}

const SILENCE_PEAK: f32 = 0.01;

/// Async side of the application.
///
/// Runs on the tokio runtime thread and receives finished sessions from
/// the recording controller on the main thread. Shutdown is signalled back
/// through `loop_proxy` because the controller owns the OS key
/// registrations and must release them on its own thread.
pub struct App {
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) loop_proxy: EventLoopProxy<LoopEvent>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the hand-off loop until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Talkey starting");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(AppCommand::Finalize { session_id, audio }) => {
                            self.finalize(session_id, audio);
                        }
                        Some(AppCommand::Discard { session_id, sample_count }) => {
                            info!(session_id = %session_id, sample_count, "Session discarded");
                        }
                        None => {
                            info!("Command channel closed, shutting down");
                            break;
                        }
                    }
                }

                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => info!("Ctrl-C received"),
                        Err(e) => error!(error = ?e, "Failed to listen for Ctrl-C"),
                    }
                    break;
                }
            }
        }

        let _ = self.shutdown_tx.send(true);

        if self.loop_proxy.send_event(LoopEvent::Shutdown).is_err() {
            warn!("Event loop already closed");
        }

        info!("Talkey shut down successfully");

        Ok(())
    }

    #[instrument(skip(self, audio))]
    fn finalize(&self, session_id: Uuid, audio: CapturedAudio) {
        let summary = SessionSummary::new(session_id, &audio);

        if summary.is_silent() {
            warn!(
                session_id = %session_id,
                duration_ms = summary.duration.as_millis(),
                "Session captured no speech"
            );
            return;
        }

        info!(
            session_id = %session_id,
            duration_ms = summary.duration.as_millis(),
            sample_count = summary.sample_count,
            sample_rate = audio.sample_rate,
            channels = audio.channels,
            peak = summary.peak,
            "Session ready for transcription"
        );
    }
}
