//! System-wide trigger registration.
//!
//! Owns the lifecycle of the OS hotkey registrations for the configured
//! triggers and turns raw `global-hotkey` callbacks into identity-tagged
//! [`HotkeyEvent`]s.

use crate::{
    CoreError, HotkeyBackend, HotkeyEvent, KeyEdge, TriggerBinding, TriggerBindings,
    TriggerIdentity,
};

use std::{panic::Location, time::Instant};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, hotkey::HotKey};
use tracing::{debug, info, instrument, warn};

type EventSink = Box<dyn FnMut(HotkeyEvent) + Send>;

/// One live OS registration.
#[derive(Debug, Clone, Copy)]
struct Registration {
    binding: TriggerBinding,
    identity: TriggerIdentity,
    hotkey_id: u32,
}

/// Outcome of a [`HotkeyRegistry::configure`] call.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Triggers that are now registered with the OS.
    pub registered: Vec<(TriggerIdentity, TriggerBinding)>,
    /// Triggers the OS refused; they stay unregistered until the binding changes.
    pub conflicts: Vec<CoreError>,
}

impl RegistrationReport {
    /// True when every requested trigger was registered.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Registers 1 or 2 system-wide triggers and stamps their events with a
/// [`TriggerIdentity`].
pub struct HotkeyRegistry<B: HotkeyBackend> {
    backend: B,
    registrations: Vec<Registration>,
    reserved: Vec<HotKey>,
    sink: Option<EventSink>,
}

impl<B: HotkeyBackend> HotkeyRegistry<B> {
    /// Create an empty registry over an OS backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registrations: Vec::new(),
            reserved: Vec::new(),
            sink: None,
        }
    }

    /// Keep `hotkey` out of every future registration.
    ///
    /// A binding on a reserved key is reported as
    /// [`CoreError::InvalidBinding`] instead of being registered.
    pub fn reserve(&mut self, hotkey: HotKey) {
        if !self.reserved.contains(&hotkey) {
            self.reserved.push(hotkey);
        }
    }

    /// Replace all registrations with the ones `bindings` needs.
    ///
    /// Existing registrations are released first. A binding the OS refuses
    /// is reported as [`CoreError::BindingConflict`] and does not prevent the
    /// other binding from being registered. Only successful registrations
    /// are retained, so a failed attempt leaves nothing dangling.
    #[track_caller]
    #[instrument(skip(self, bindings), fields(shared = bindings.is_shared()))]
    pub fn configure(&mut self, bindings: &TriggerBindings) -> RegistrationReport {
        self.unregister_all();

        let mut report = RegistrationReport::default();

        for (binding, identity) in bindings.classify() {
            let hotkey = binding.hotkey();

            if self.reserved.contains(&hotkey) {
                warn!(identity = %identity, binding = %binding, "Trigger uses a reserved key");
                report.conflicts.push(CoreError::InvalidBinding {
                    input: binding.to_string(),
                    reason: "key is reserved for cancelling a recording".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
                continue;
            }

            match self.backend.register(hotkey) {
                Ok(()) => {
                    info!(identity = %identity, binding = %binding, "Trigger registered");
                    self.registrations.push(Registration {
                        binding,
                        identity,
                        hotkey_id: hotkey.id(),
                    });
                    report.registered.push((identity, binding));
                }
                Err(e) => {
                    warn!(identity = %identity, binding = %binding, error = %e, "Trigger registration refused");
                    report.conflicts.push(CoreError::BindingConflict {
                        identity,
                        binding: binding.to_string(),
                        reason: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        report
    }

    /// Begin delivering events to `on_event`, replacing any previous consumer.
    ///
    /// Events are delivered synchronously from [`dispatch`](Self::dispatch),
    /// so delivery order is the order raw events are dispatched.
    pub fn start<F>(&mut self, on_event: F)
    where
        F: FnMut(HotkeyEvent) + Send + 'static,
    {
        self.sink = Some(Box::new(on_event));
        debug!("Hotkey event delivery started");
    }

    /// Release every registration and stop delivering events. Idempotent.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        self.unregister_all();

        if self.sink.take().is_some() {
            info!("Hotkey event delivery stopped");
        }
    }

    /// Translate a raw OS event and hand it to the consumer.
    ///
    /// Returns `true` when an event was delivered. Events for unknown hotkey
    /// ids, or arriving before [`start`](Self::start) / after
    /// [`stop`](Self::stop), are dropped.
    pub fn dispatch(&mut self, raw: GlobalHotKeyEvent, at: Instant) -> bool {
        let Some(event) = self.translate(raw, at) else {
            return false;
        };

        match self.sink.as_mut() {
            Some(sink) => {
                sink(event);
                true
            }
            None => {
                debug!(identity = %event.identity, "Hotkey event dropped, delivery not started");
                false
            }
        }
    }

    /// Resolve a raw OS event to an identity-tagged event.
    pub fn translate(&self, raw: GlobalHotKeyEvent, at: Instant) -> Option<HotkeyEvent> {
        self.registrations
            .iter()
            .find(|registration| registration.hotkey_id == raw.id)
            .map(|registration| HotkeyEvent {
                identity: registration.identity,
                edge: KeyEdge::from(raw.state),
                timestamp: at,
            })
    }

    /// The live registrations as a conflict-free report.
    pub fn current_report(&self) -> RegistrationReport {
        RegistrationReport {
            registered: self
                .registrations
                .iter()
                .map(|registration| (registration.identity, registration.binding))
                .collect(),
            conflicts: Vec::new(),
        }
    }

    /// Number of live OS registrations.
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Identity a given OS hotkey id is registered under, if any.
    pub fn identity_of(&self, hotkey_id: u32) -> Option<TriggerIdentity> {
        self.registrations
            .iter()
            .find(|registration| registration.hotkey_id == hotkey_id)
            .map(|registration| registration.identity)
    }

    fn unregister_all(&mut self) {
        for registration in self.registrations.drain(..) {
            // Forgotten either way; the OS drops it with the process.
            if let Err(e) = self.backend.unregister(registration.binding.hotkey()) {
                warn!(
                    binding = %registration.binding,
                    error = %e,
                    "Failed to unregister trigger"
                );
            } else {
                debug!(binding = %registration.binding, "Trigger unregistered");
            }
        }
    }
}

impl<B: HotkeyBackend> Drop for HotkeyRegistry<B> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
