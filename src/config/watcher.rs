//! Hot reloading of the configuration file.
//!
//! The directory holding `themeflux.toml` is watched rather than the file
//! itself, because many editors save by writing a temporary file and renaming
//! it over the original. Bursts of events are collapsed: after the first event
//! the watcher waits until the directory has been quiet for the debounce
//! period, then loads and validates the file once. A valid configuration that
//! differs from the last one is sent to the scheduler as
//! [`SchedulerMessage::Reload`]; an invalid one is reported and ignored.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use super::{Config, load_from_path};
use crate::common::constants::CONFIG_WATCH_DEBOUNCE_MS;
use crate::common::utils::private_path;
use crate::core::SchedulerMessage;

/// Watches the configuration file and forwards valid changes to the scheduler.
pub struct ConfigWatcher {
    config_path: PathBuf,
    scheduler: Sender<SchedulerMessage>,
    current: Config,
    debounce: Duration,
    debug_enabled: bool,
}

impl ConfigWatcher {
    /// `current` is the configuration the scheduler started with; reloads that
    /// produce the same configuration are skipped.
    pub fn new(
        config_path: PathBuf,
        scheduler: Sender<SchedulerMessage>,
        current: Config,
        debug_enabled: bool,
    ) -> Self {
        Self {
            config_path,
            scheduler,
            current,
            debounce: Duration::from_millis(CONFIG_WATCH_DEBOUNCE_MS),
            debug_enabled,
        }
    }

    /// Start watching in a background thread.
    pub fn start(self) -> Result<()> {
        let watch_dir = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .context("Configuration file has no parent directory")?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", watch_dir.display()))?;

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Watching {} for changes", private_path(&self.config_path));
        }

        thread::Builder::new()
            .name("config-watcher".to_string())
            .spawn(move || {
                // The watcher stops when dropped
                let _watcher = watcher;
                self.run(rx);
            })
            .context("Failed to spawn config watcher thread")?;

        Ok(())
    }

    fn run(mut self, events: Receiver<Event>) {
        while let Ok(event) = events.recv() {
            if !self.affects_config(&event) {
                continue;
            }

            // Wait for the burst to settle
            loop {
                match events.recv_timeout(self.debounce) {
                    Ok(_) => continue,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }

            if !self.config_path.exists() {
                // Mid-rename, or deleted; the next event brings it back
                continue;
            }

            if !self.reload() {
                break;
            }
        }

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Config watcher thread exiting");
        }
    }

    fn affects_config(&self, event: &Event) -> bool {
        let Some(config_name) = self.config_path.file_name() else {
            return false;
        };
        event.paths.iter().any(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .zip(config_name.to_str())
                .is_some_and(|(name, config_name)| name.starts_with(config_name))
        })
    }

    /// Returns false once the scheduler is gone.
    fn reload(&mut self) -> bool {
        match load_from_path(&self.config_path) {
            Ok(config) => {
                if config == self.current {
                    if self.debug_enabled {
                        log_pipe!();
                        log_debug!("Configuration file touched but unchanged");
                    }
                    return true;
                }

                log_pipe!();
                log_info!("Configuration file changed, reloading");
                self.current = config.clone();
                self.scheduler
                    .send(SchedulerMessage::Reload(Box::new(config)))
                    .is_ok()
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Ignoring invalid configuration: {e:#}");
                log_indented!("The previous configuration stays active");
                true
            }
        }
    }
}

/// Start watching `config_path` for changes.
pub fn start_config_watcher(
    config_path: PathBuf,
    scheduler: Sender<SchedulerMessage>,
    current: Config,
    debug_enabled: bool,
) -> Result<()> {
    ConfigWatcher::new(config_path, scheduler, current, debug_enabled).start()
}
