use crate::{
    CoreError, RecordingMode, Transition, TriggerBinding, TriggerBindings,
    tests::fakes::{Harness, distinct_bindings, escape, press, release, shared_bindings},
};

use std::time::{Duration, Instant};

use global_hotkey::hotkey::{Code, Modifiers};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// WHAT: Scenario A end to end - tap, then press again
/// WHY: Exactly one finalize reaches the collaborator and the cancel key is released
#[test]
fn given_shared_binding_when_tapped_then_pressed_again_then_one_finalize() {
    // Given: Shared ⌘⇧Space
    let mut harness = Harness::new();
    let bindings = shared_bindings();
    harness.controller.configure(&bindings);
    let key = bindings.toggle.hotkey();
    let t0 = Instant::now();

    // When: Tap of 120ms
    harness.controller.on_hotkey(press(key), t0);
    harness.controller.on_hotkey(release(key), t0 + ms(120));

    // Then: Toggled, still capturing, Escape claimed
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);
    assert!(harness.audio.is_running());
    assert!(harness.controller.is_cancel_watch_enabled());
    assert!(harness.backend.is_registered(escape()));

    // When: Pressed again at 500ms and released
    harness.controller.on_hotkey(press(key), t0 + ms(500));
    harness.controller.on_hotkey(release(key), t0 + ms(580));

    // Then: Idle, one finalize, Escape released
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.finalized().len(), 1);
    assert!(harness.finalizer.discarded().is_empty());
    assert!(!harness.audio.is_running());
    assert!(!harness.backend.is_registered(escape()));
}

/// WHAT: Scenario B end to end - 350ms hold
/// WHY: A hold finalizes at key-up and never claims the cancel key
#[test]
fn given_shared_binding_when_held_350ms_then_finalized_without_cancel_watch() {
    // Given: Shared bindings
    let mut harness = Harness::new();
    let bindings = shared_bindings();
    harness.controller.configure(&bindings);
    let key = bindings.toggle.hotkey();
    let t0 = Instant::now();

    // When: Held for 350ms
    harness.controller.on_hotkey(press(key), t0);
    let results = harness.controller.on_hotkey(release(key), t0 + ms(350));

    // Then: Idle, finalized once, Escape never registered
    assert_eq!(results.len(), 1);
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.finalized().len(), 1);
    assert!(!harness.controller.is_cancel_watch_enabled());
    assert_eq!(harness.backend.registered_count(), 1);
}

/// WHAT: Scenario C end to end - 5ms push-to-talk
/// WHY: Push-to-talk finalizes regardless of duration
#[test]
#[allow(clippy::unwrap_used)]
fn given_distinct_bindings_when_push_to_talk_pressed_5ms_then_finalized() {
    // Given: Toggle on R, push-to-talk on Space
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    let ptt = bindings.push_to_talk.unwrap().hotkey();
    let t0 = Instant::now();

    // When: Space down then up after 5ms
    harness.controller.on_hotkey(press(ptt), t0);
    harness.controller.on_hotkey(release(ptt), t0 + ms(5));

    // Then: Finalized immediately
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.finalized().len(), 1);
    assert_eq!(harness.audio.starts(), 1);
    assert_eq!(harness.audio.stops(), 1);
}

/// WHAT: Scenario D end to end - toggle then Escape
/// WHY: Cancel discards and never calls finalize
#[test]
fn given_toggle_key_pressed_when_escape_pressed_then_discarded_and_never_finalized() {
    // Given: Recording toggled on by the exclusive toggle key
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(bindings.toggle.hotkey()), t0);
    let session_id = harness.controller.session().session_id();
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);

    // When: Escape is pressed
    let results = harness.controller.on_hotkey(press(escape()), t0 + ms(800));

    // Then: Idle via discard, zero finalize calls, Escape released
    assert_eq!(results.len(), 1);
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert!(harness.finalizer.finalized().is_empty());
    assert_eq!(harness.finalizer.discarded(), session_id.into_iter().collect::<Vec<_>>());
    assert!(!harness.backend.is_registered(escape()));
}

/// WHAT: Escape queued after the watch was disabled is dropped
/// WHY: A stale cancel must never reach the next session
#[test]
fn given_toggle_stopped_when_queued_escape_arrives_then_dropped() {
    // Given: A toggled recording that has just been stopped by its key
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    let toggle = bindings.toggle.hotkey();
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(toggle), t0);
    harness.controller.on_hotkey(release(toggle), t0 + ms(60));
    harness.controller.on_hotkey(press(toggle), t0 + ms(900));
    harness.controller.on_hotkey(release(toggle), t0 + ms(950));

    // When: An Escape press that was already queued is dispatched
    let results = harness.controller.on_hotkey(press(escape()), t0 + ms(901));

    // Then: Nothing happens
    assert!(results.is_empty());
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert!(harness.finalizer.discarded().is_empty());
    assert_eq!(harness.finalizer.finalized().len(), 1);

    // And: The next session is unaffected by it
    harness.controller.on_hotkey(press(toggle), t0 + ms(1_000));
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);
}

/// WHAT: Escape during a hold does nothing
/// WHY: Cancel gating - the watch is never enabled while holding
#[test]
fn given_shared_key_held_when_escape_pressed_then_no_effect() {
    // Given: Shared key held down
    let mut harness = Harness::new();
    let bindings = shared_bindings();
    harness.controller.configure(&bindings);
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(bindings.toggle.hotkey()), t0);

    // When: Escape is pressed
    let results = harness.controller.on_hotkey(press(escape()), t0 + ms(50));

    // Then: Still holding, capture still running
    assert!(results.is_empty());
    assert_eq!(harness.controller.mode(), RecordingMode::Holding);
    assert!(harness.audio.is_running());
}

/// WHAT: Reconfiguring mid-session discards the session first
/// WHY: Identity changes must not orphan a running capture
#[test]
fn given_toggled_session_when_reconfigured_then_discarded_and_reregistered() {
    // Given: Toggled via shared tap
    let mut harness = Harness::new();
    let bindings = shared_bindings();
    harness.controller.configure(&bindings);
    let key = bindings.toggle.hotkey();
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(key), t0);
    harness.controller.on_hotkey(release(key), t0 + ms(90));
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);

    // When: Switching to distinct bindings
    let report = harness.controller.configure(&distinct_bindings());

    // Then: Session discarded, cancel key released, two triggers registered
    assert!(report.is_clean());
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.discarded().len(), 1);
    assert!(harness.finalizer.finalized().is_empty());
    assert!(!harness.audio.is_running());
    assert!(!harness.controller.is_cancel_watch_enabled());
    assert_eq!(harness.controller.registration_count(), 2);
    assert_eq!(harness.backend.registered_count(), 2);
}

/// WHAT: A capture that fails to start leaves the machine idle
/// WHY: The session must not claim to record when nothing is captured
#[test]
fn given_capture_start_fails_when_toggle_pressed_then_idle_and_cancel_watch_closed() {
    // Given: Capture will fail on the next start
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    harness.audio.fail_next_start();

    // When: The toggle key is pressed
    let toggle = bindings.toggle.hotkey();
    let results = harness.controller.on_hotkey(press(toggle), Instant::now());
    harness.controller.on_hotkey(release(toggle), Instant::now());

    // Then: Error reported, session dropped, Escape not claimed
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(CoreError::CaptureFailed { .. })));
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert!(!harness.controller.is_cancel_watch_enabled());
    assert!(!harness.backend.is_registered(escape()));

    // And: The next press works normally
    let results = harness.controller.on_hotkey(press(toggle), Instant::now());
    assert!(matches!(
        results.as_slice(),
        [Ok(Transition::Accepted {
            to: RecordingMode::Toggled,
            ..
        })]
    ));
}

/// WHAT: Shutdown releases everything and is idempotent
/// WHY: No dangling registrations or orphaned sessions at exit
#[test]
fn given_toggled_session_when_shut_down_twice_then_everything_released_once() {
    // Given: A toggled session with Escape claimed
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    harness
        .controller
        .on_hotkey(press(bindings.toggle.hotkey()), Instant::now());
    assert_eq!(harness.backend.registered_count(), 3);

    // When: Shut down twice
    harness.controller.shutdown();
    harness.controller.shutdown();

    // Then: Discarded once, nothing registered, further events ignored
    assert_eq!(harness.finalizer.discarded().len(), 1);
    assert_eq!(harness.backend.registered_count(), 0);
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert!(
        harness
            .controller
            .on_hotkey(press(bindings.toggle.hotkey()), Instant::now())
            .is_empty()
    );
}

/// WHAT: Re-applying identical bindings leaves a live session alone
/// WHY: Config edits unrelated to the triggers must not discard a recording
#[test]
fn given_toggled_session_when_same_bindings_reapplied_then_still_recording() {
    // Given: Toggled via shared tap
    let mut harness = Harness::new();
    let bindings = shared_bindings();
    harness.controller.configure(&bindings);
    let key = bindings.toggle.hotkey();
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(key), t0);
    harness.controller.on_hotkey(release(key), t0 + ms(90));
    let register_calls = harness.backend.register_calls();

    // When: The same bindings are configured again
    let report = harness.controller.configure(&shared_bindings());

    // Then: Nothing discarded, nothing re-registered, session continues
    assert!(report.is_clean());
    assert_eq!(report.registered.len(), 1);
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);
    assert!(harness.finalizer.discarded().is_empty());
    assert!(harness.audio.is_running());
    assert!(harness.controller.is_cancel_watch_enabled());
    assert_eq!(harness.backend.register_calls(), register_calls);

    // And: The session still stops normally
    harness.controller.on_hotkey(press(key), t0 + ms(700));
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.finalized().len(), 1);
}

/// WHAT: A trigger bound to the cancel key is rejected at configure time
/// WHY: Escape events go to the cancel watch, so such a trigger could never fire
#[test]
fn given_trigger_on_escape_when_configured_then_reported_invalid() {
    // Given: A toggle binding on bare Escape
    let mut harness = Harness::new();
    let bindings = TriggerBindings::new(
        TriggerBinding::toggle(Modifiers::empty(), Code::Escape),
        None,
    );

    // When: Configuring
    let report = harness.controller.configure(&bindings);

    // Then: Reported, not registered
    assert!(!report.is_clean());
    assert!(matches!(
        report.conflicts.as_slice(),
        [CoreError::InvalidBinding { .. }]
    ));
    assert!(report.registered.is_empty());
    assert_eq!(harness.controller.registration_count(), 0);
    assert!(!harness.backend.is_registered(escape()));

    // And: Pressing Escape starts nothing
    let t0 = Instant::now();
    assert!(harness.controller.on_hotkey(press(escape()), t0).is_empty());
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.audio.starts(), 0);
}

/// WHAT: Auto-repeat of a held exclusive toggle key does not stop the session
/// WHY: The press that started a toggled recording may still be held down
#[test]
fn given_toggle_key_held_when_os_repeats_key_down_then_still_toggled() {
    // Given: Toggled by the exclusive toggle key, key still down
    let mut harness = Harness::new();
    let bindings = distinct_bindings();
    harness.controller.configure(&bindings);
    let toggle = bindings.toggle.hotkey();
    let t0 = Instant::now();
    harness.controller.on_hotkey(press(toggle), t0);

    // When: Repeats arrive, then the key is released
    harness.controller.on_hotkey(press(toggle), t0 + ms(500));
    harness.controller.on_hotkey(press(toggle), t0 + ms(530));
    harness.controller.on_hotkey(release(toggle), t0 + ms(600));

    // Then: Still recording
    assert_eq!(harness.controller.mode(), RecordingMode::Toggled);
    assert!(harness.finalizer.finalized().is_empty());

    // And: A fresh press stops it
    harness.controller.on_hotkey(press(toggle), t0 + ms(1_500));
    assert_eq!(harness.controller.mode(), RecordingMode::Idle);
    assert_eq!(harness.finalizer.finalized().len(), 1);
}
