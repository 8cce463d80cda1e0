//! Polls the config file and forwards clean edits to the event loop.

use crate::{AppResult, LoopEvent, config::Config};

use std::{fs, path::PathBuf, time::Duration};

use tao::event_loop::EventLoopProxy;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Tracks the last-seen contents of one config file.
pub struct ConfigWatcher {
    path: PathBuf,
    last_contents: Option<String>,
}

impl ConfigWatcher {
    /// Watch `path`, treating `current` as already applied.
    pub fn new(path: PathBuf, current: Option<String>) -> Self {
        Self {
            path,
            last_contents: current,
        }
    }

    /// Check the file once.
    ///
    /// Returns the new config when the contents changed and parse cleanly.
    /// A missing file is not a change. A file that fails to parse is
    /// reported once and not retried until it changes again.
    pub fn poll(&mut self) -> AppResult<Option<Config>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if self.last_contents.as_deref() == Some(contents.as_str()) {
            return Ok(None);
        }

        let parsed = Config::parse(&contents);
        self.last_contents = Some(contents);

        let config = parsed?;
        config.bindings()?;

        Ok(Some(config))
    }

    /// Poll every `interval` until shutdown, posting changes to the event loop.
    ///
    /// A changed `behaviour.reload_interval_ms` takes effect from the next tick.
    #[instrument(skip(self, loop_proxy, shutdown_rx))]
    pub async fn run(
        mut self,
        mut interval: Duration,
        loop_proxy: EventLoopProxy<LoopEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll() {
                        Ok(Some(config)) => {
                            info!(path = ?self.path, "Config changed, reloading");
                            let reload_interval = config.reload_interval();
                            if reload_interval != interval {
                                info!(reload_interval_ms = reload_interval.as_millis(), "Reload interval updated");
                                interval = reload_interval;
                                ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
                                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                            }
                            if loop_proxy.send_event(LoopEvent::ConfigChanged(Box::new(config))).is_err() {
                                debug!("Event loop closed, stopping config watcher");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "Ignoring invalid config edit"),
                    }
                }

                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        debug!("Config watcher stopping");
                        break;
                    }
                }
            }
        }
    }
}
