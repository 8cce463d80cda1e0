//! Talkey: tap a key to dictate, hold it to talk.

mod app;
mod app_command;
mod audio_capturer;
mod config;
mod config_watcher;
mod error;
mod loop_event;
mod pipeline_finalizer;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    audio_capturer::AudioCapturer,
    config_watcher::ConfigWatcher,
    error::{AppError, Result as AppResult},
    loop_event::LoopEvent,
    pipeline_finalizer::PipelineFinalizer,
};

use crate::config::Config;

use std::{fs, panic::Location, rc::Rc, time::Instant};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager};
use talkey_core::{
    CancelWatch, HotkeyRegistry, RecordingController, RecordingStateMachine,
};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

type Recorder = RecordingController<Rc<GlobalHotKeyManager>, AudioCapturer, PipelineFinalizer>;

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("talkey=debug,talkey_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let event_loop = EventLoopBuilder::<LoopEvent>::with_user_event().build();
    let loop_proxy = event_loop.create_proxy();

    // The controller owns the hotkey manager and the cpal stream, both of
    // which must stay on the main thread.
    let mut recorder: Option<Recorder> = None;
    let mut current_config: Option<Config> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => match start(loop_proxy.clone()) {
                Ok((r, config)) => {
                    recorder = Some(r);
                    current_config = Some(config);
                }
                Err(e) => {
                    error!("Failed to start: {:?}", e);
                    std::process::exit(1);
                }
            },
            Event::UserEvent(LoopEvent::Hotkey { event, at }) => {
                let Some(recorder) = recorder.as_mut() else {
                    return;
                };
                for result in recorder.on_hotkey(event, at) {
                    if let Err(e) = result {
                        error!(error = %e, "Recorder command failed");
                    }
                }
            }
            Event::UserEvent(LoopEvent::ConfigChanged(config)) => {
                let Some(recorder) = recorder.as_mut() else {
                    return;
                };

                if let Some(current) = current_config.as_ref() {
                    for setting in config.restart_required(current) {
                        warn!(setting, "Setting changed, takes effect after restart");
                    }
                }

                match apply_config(recorder, &config) {
                    Ok(()) => current_config = Some(*config),
                    Err(e) => warn!(error = %e, "Config reload rejected, keeping current triggers"),
                }
            }
            Event::UserEvent(LoopEvent::Shutdown) => {
                if let Some(mut recorder) = recorder.take() {
                    recorder.shutdown();
                }
                *control_flow = ControlFlow::ExitWithCode(0);
            }
            _ => {}
        }
    });
}

/// Build the recorder on the main thread and start the background threads.
#[track_caller]
#[instrument(skip(loop_proxy))]
fn start(loop_proxy: EventLoopProxy<LoopEvent>) -> AppResult<(Recorder, Config)> {
    let config = Config::load()?;

    // Registered on the main thread so tao's loop pumps the OS messages
    // that carry hotkey events on Windows.
    let manager = Rc::new(GlobalHotKeyManager::new().map_err(|e| {
        AppError::HotkeyRegistrationFailed {
            reason: format!("Failed to create manager: {}", e),
            location: ErrorLocation::from(Location::caller()),
        }
    })?);

    let capturer = AudioCapturer::new(config.audio.selected_device.as_deref())?;

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut recorder = RecordingController::new(
        HotkeyRegistry::new(Rc::clone(&manager)),
        CancelWatch::escape(manager),
        RecordingStateMachine::new(config.tap_threshold()),
        capturer,
        PipelineFinalizer::new(command_tx),
    );

    apply_config(&mut recorder, &config)?;

    spawn_hotkey_forwarder(loop_proxy.clone())?;

    let config_path = Config::config_path()?;
    let watcher = ConfigWatcher::new(config_path.clone(), fs::read_to_string(&config_path).ok());
    let reload_interval = config.reload_interval();

    std::thread::Builder::new()
        .name("talkey-runtime".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {:?}", e);
                    std::process::exit(1);
                }
            };

            rt.block_on(async {
                let app = App {
                    command_rx,
                    loop_proxy: loop_proxy.clone(),
                    shutdown_tx,
                };

                tokio::join!(
                    watcher.run(reload_interval, loop_proxy, shutdown_rx),
                    async {
                        if let Err(e) = app.run().await {
                            error!(error = ?e, "App error");
                        }
                    }
                );
            });
        })?;

    #[cfg(target_os = "macos")]
    unsafe {
        use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
        CFRunLoopWakeUp(CFRunLoopGetMain());
    }

    Ok((recorder, config))
}

/// Push trigger settings into the recorder.
///
/// Bindings that fail to parse reject the whole config. Keys the OS refuses
/// are logged and the rest stay live. Unchanged bindings keep a running
/// recording alive.
fn apply_config(recorder: &mut Recorder, config: &Config) -> AppResult<()> {
    let bindings = config.bindings()?;

    recorder.set_tap_threshold(config.tap_threshold());
    let report = recorder.configure(&bindings);

    for conflict in &report.conflicts {
        warn!(error = %conflict, "Trigger unavailable, choose a different key");
    }

    info!(
        toggle = %config.hotkeys.toggle,
        push_to_talk = ?config.hotkeys.push_to_talk,
        shared = bindings.is_shared(),
        registered = report.registered.len(),
        "Triggers configured"
    );

    Ok(())
}

/// Forward OS hotkey events into the event loop, stamped on arrival.
///
/// `GlobalHotKeyEvent::receiver()` blocks on `recv()`, so this costs one
/// idle thread. It ends when the event loop is gone.
fn spawn_hotkey_forwarder(loop_proxy: EventLoopProxy<LoopEvent>) -> AppResult<()> {
    std::thread::Builder::new()
        .name("hotkey-forwarder".to_string())
        .spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                let at = Instant::now();
                if loop_proxy
                    .send_event(LoopEvent::Hotkey { event, at })
                    .is_err()
                {
                    break;
                }
            }
        })?;

    Ok(())
}
