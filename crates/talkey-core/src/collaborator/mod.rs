mod audio_source;
mod finalizer;

pub use {
    audio_source::{AudioSource, CapturedAudio},
    finalizer::Finalizer,
};
