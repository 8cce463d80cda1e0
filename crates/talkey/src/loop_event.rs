use crate::config::Config;

use std::time::Instant;

use global_hotkey::GlobalHotKeyEvent;

/// Events delivered to the main-thread event loop.
#[derive(Debug)]
pub enum LoopEvent {
    /// A raw OS hotkey edge, stamped when it was read off the OS channel.
    Hotkey {
        /// The raw event.
        event: GlobalHotKeyEvent,
        /// Arrival time on the monotonic clock.
        at: Instant,
    },
    /// The config file changed on disk and parsed cleanly.
    ConfigChanged(Box<Config>),
    /// Stop recording, release every key and exit.
    Shutdown,
}
