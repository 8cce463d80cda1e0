use crate::{AppError, AppResult};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use talkey_core::{AudioSource, CapturedAudio, CoreError, CoreResult};
use tracing::{debug, error, info, instrument, warn};

/// Maximum interleaved samples to buffer.
///
/// 14.4M samples: 5 minutes of 48kHz mono, 2.5 minutes of 48kHz stereo.
/// Oldest samples are dropped past this, so a forgotten toggled session
/// cannot grow without bound.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Microphone capture behind the recorder's audio seam.
///
/// Holds a cpal `Stream`, which is `!Send`: lives on the main thread with
/// the recording controller.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Set before the stream is dropped so a late callback writes nothing.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    /// Open the named input device, or the system default when `None`.
    ///
    /// An unknown name falls back to the default device with a warning.
    #[track_caller]
    #[instrument]
    pub fn new(selected_device: Option<&str>) -> AppResult<Self> {
        let host = cpal::default_host();

        let device = match selected_device.and_then(|name| find_input_device(&host, name)) {
            Some(device) => device,
            None => {
                if let Some(name) = selected_device {
                    warn!(device = name, "Selected audio device not found, using default");
                }
                host.default_input_device()
                    .ok_or_else(|| AppError::AudioDevice {
                        reason: "No microphone found".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?
            }
        };

        let config = device
            .default_input_config()
            .map_err(|e| AppError::AudioDevice {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl AudioSource for AudioCapturer {
    #[track_caller]
    #[instrument(skip(self))]
    fn start(&mut self) -> CoreResult<()> {
        if self.stream.is_some() {
            warn!("Capture already running, restarting");
            self.stream = None;
        }

        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);

        self.shutdown.store(false, Ordering::Release);

        self.samples
            .lock()
            .map_err(|e| CoreError::CaptureFailed {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned buffer still holds valid samples.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    push_samples(&mut buf, data, MAX_BUFFER_SAMPLES);
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| CoreError::CaptureFailed {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| CoreError::CaptureFailed {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop(&mut self) -> CoreResult<CapturedAudio> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Lets an in-flight callback observe the flag on backends
            // whose drop returns before the final callback.
            std::thread::sleep(Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| CoreError::CaptureFailed {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .drain(..)
            .collect();

        debug!(sample_count = samples.len(), "Captured audio samples");

        Ok(CapturedAudio::new(
            samples,
            self.config.sample_rate,
            self.config.channels,
        ))
    }
}

/// Append `data`, dropping the oldest samples beyond `capacity`.
pub(crate) fn push_samples(buf: &mut VecDeque<f32>, data: &[f32], capacity: usize) {
    buf.extend(data.iter().copied());
    let overflow = buf.len().saturating_sub(capacity);
    if overflow > 0 {
        buf.drain(..overflow);
    }
}

#[allow(deprecated)]
fn find_input_device(host: &cpal::Host, name: &str) -> Option<Device> {
    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!(error = %e, "Failed to enumerate input devices");
            return None;
        }
    };

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|device_name| device_name == name))
}
