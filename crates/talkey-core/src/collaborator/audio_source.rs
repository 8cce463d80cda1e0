use crate::CoreResult;

use std::time::Duration;

/// Audio captured during one recording session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedAudio {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Device sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl CapturedAudio {
    /// Wrap captured samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Wall-clock length of the capture.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 || self.channels == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as f64 / f64::from(self.channels);
        Duration::from_secs_f64(frames / f64::from(self.sample_rate))
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

/// The audio capture collaborator.
///
/// `start` must return quickly: it runs on every trigger press, before the
/// tap/hold decision is known.
pub trait AudioSource {
    /// Begin capturing into a fresh buffer.
    fn start(&mut self) -> CoreResult<()>;

    /// Stop capturing and take the buffer.
    fn stop(&mut self) -> CoreResult<CapturedAudio>;
}
