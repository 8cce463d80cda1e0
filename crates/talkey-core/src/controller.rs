//! Wires the state machine to its collaborators.
//!
//! The controller is the single owner of the recording state machine, the
//! trigger registry, the cancel watch and the capture/finalize
//! collaborators. It runs on the event-dispatch thread: raw OS events go in
//! through [`RecordingController::on_hotkey`], the machine decides, and the
//! controller executes the resulting commands in order.

use crate::{
    AudioSource, CancelSignal, CancelWatch, CoreResult, Finalizer, HotkeyBackend, HotkeyEvent,
    HotkeyRegistry, RecorderCommand, RecorderInput, RecordingMode, RecordingSession,
    RecordingStateMachine, RegistrationReport, Transition, TriggerBinding, TriggerBindings,
    TriggerIdentity,
};

use std::{
    sync::mpsc::{self, Receiver},
    time::{Duration, Instant},
};

use global_hotkey::GlobalHotKeyEvent;
use tracing::{debug, error, info, instrument, warn};

/// Owns one recording pipeline end to end.
pub struct RecordingController<B, A, F>
where
    B: HotkeyBackend,
    A: AudioSource,
    F: Finalizer,
{
    machine: RecordingStateMachine,
    registry: HotkeyRegistry<B>,
    cancel_watch: CancelWatch<B>,
    audio: A,
    finalizer: F,
    pending: Receiver<HotkeyEvent>,
    /// Registrations from the last clean `configure`.
    applied: Option<Vec<(TriggerBinding, TriggerIdentity)>>,
}

impl<B, A, F> RecordingController<B, A, F>
where
    B: HotkeyBackend,
    A: AudioSource,
    F: Finalizer,
{
    /// Take ownership of the pipeline parts and start trigger delivery.
    ///
    /// Triggers are not registered until [`configure`](Self::configure) is
    /// called. The cancel key is reserved so no trigger can shadow it.
    pub fn new(
        mut registry: HotkeyRegistry<B>,
        cancel_watch: CancelWatch<B>,
        machine: RecordingStateMachine,
        audio: A,
        finalizer: F,
    ) -> Self {
        let (event_tx, pending) = mpsc::channel();
        registry.reserve(cancel_watch.hotkey());
        registry.start(move |event| {
            let _ = event_tx.send(event);
        });

        Self {
            machine,
            registry,
            cancel_watch,
            audio,
            finalizer,
            pending,
            applied: None,
        }
    }

    /// Current recording mode.
    pub fn mode(&self) -> RecordingMode {
        self.machine.mode()
    }

    /// Current recording session.
    pub fn session(&self) -> RecordingSession {
        self.machine.session()
    }

    /// Number of live trigger registrations.
    pub fn registration_count(&self) -> usize {
        self.registry.registration_count()
    }

    /// True while cancel presses are forwarded to the machine.
    pub fn is_cancel_watch_enabled(&self) -> bool {
        self.cancel_watch.is_enabled()
    }

    /// Change the tap threshold of the shared trigger.
    pub fn set_tap_threshold(&mut self, tap_threshold: Duration) {
        info!(tap_threshold_ms = tap_threshold.as_millis(), "Tap threshold updated");
        self.machine.set_tap_threshold(tap_threshold);
    }

    /// Re-derive trigger identities and re-register with the OS.
    ///
    /// When the bindings need exactly the registrations already live, nothing
    /// changes and an in-flight session keeps running. Otherwise the session
    /// is discarded first so no capture is orphaned by the identity change.
    #[instrument(skip(self, bindings))]
    pub fn configure(&mut self, bindings: &TriggerBindings) -> RegistrationReport {
        let wanted = bindings.classify();
        if self.applied.as_ref() == Some(&wanted) {
            debug!("Trigger bindings unchanged, registrations kept");
            return self.registry.current_report();
        }

        if let Some(transition) = self.machine.abort() {
            warn!("Triggers reconfigured mid-session, recording discarded");
            if let Err(e) = self.execute(transition.commands()) {
                error!(error = ?e, "Failed to discard session before reconfiguring");
            }
        }

        let report = self.registry.configure(bindings);
        // A refused key is retried on the next configure, even if unchanged.
        self.applied = report.is_clean().then_some(wanted);
        report
    }

    /// Route one raw OS hotkey event, returning what each resulting input did.
    ///
    /// Cancel-key events go through the cancel watch, everything else
    /// through the trigger registry. An empty result means the event did
    /// not belong to this pipeline or was a stale cancel.
    pub fn on_hotkey(&mut self, raw: GlobalHotKeyEvent, at: Instant) -> Vec<CoreResult<Transition>> {
        match self.cancel_watch.classify(&raw) {
            CancelSignal::Accepted => return vec![self.handle(RecorderInput::EscapePressed)],
            CancelSignal::Stale => return Vec::new(),
            CancelSignal::NotCancelKey => {}
        }

        if !self.registry.dispatch(raw, at) {
            debug!(hotkey_id = raw.id, "Hotkey event not for a registered trigger");
        }

        let events: Vec<HotkeyEvent> = self.pending.try_iter().collect();
        events
            .into_iter()
            .map(|event| self.handle(RecorderInput::from(event)))
            .collect()
    }

    /// Feed one input to the machine and execute its commands.
    ///
    /// Errors come only from collaborators; the session itself is always
    /// left consistent.
    #[instrument(skip(self))]
    pub fn handle(&mut self, input: RecorderInput) -> CoreResult<Transition> {
        let transition = self.machine.handle(input);
        self.execute(transition.commands())?;
        Ok(transition)
    }

    /// End any session, release every registration and stop delivery. Idempotent.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        if let Some(transition) = self.machine.abort()
            && let Err(e) = self.execute(transition.commands())
        {
            error!(error = ?e, "Failed to discard session at shutdown");
        }

        self.registry.stop();
        self.applied = None;

        if let Err(e) = self.cancel_watch.disable() {
            warn!(error = ?e, "Failed to release cancel key at shutdown");
        }
    }

    fn execute(&mut self, commands: &[RecorderCommand]) -> CoreResult<()> {
        let mut first_error = None;

        for &command in commands {
            let Err(e) = self.run(command) else {
                continue;
            };

            if let RecorderCommand::StartCapture { session_id } = command {
                // Nothing is recording, so the session cannot continue.
                error!(session_id = %session_id, error = ?e, "Capture failed to start, session dropped");
                self.machine.reset();
                if let Err(disable_err) = self.cancel_watch.disable() {
                    warn!(error = ?disable_err, "Failed to release cancel key");
                }
                return Err(e);
            }

            error!(command = ?command, error = ?e, "Recorder command failed");
            first_error.get_or_insert(e);
        }

        first_error.map_or(Ok(()), Err)
    }

    fn run(&mut self, command: RecorderCommand) -> CoreResult<()> {
        match command {
            RecorderCommand::StartCapture { .. } => self.audio.start(),
            RecorderCommand::StopCaptureAndFinalize { session_id } => {
                let audio = self.audio.stop()?;
                debug!(session_id = %session_id, sample_count = audio.samples.len(), "Handing off audio");
                self.finalizer.finalize(session_id, audio)
            }
            RecorderCommand::StopCaptureAndDiscard { session_id } => {
                let audio = self.audio.stop()?;
                debug!(session_id = %session_id, sample_count = audio.samples.len(), "Discarding audio");
                self.finalizer.discard(session_id, audio)
            }
            RecorderCommand::EnableCancelWatch => self.cancel_watch.enable(),
            RecorderCommand::DisableCancelWatch => self.cancel_watch.disable(),
        }
    }
}
