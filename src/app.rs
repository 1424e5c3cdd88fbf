//! Application coordinator that manages the daemon lifecycle.
//!
//! Acquires the instance lock, builds the scheduler's collaborators from the
//! configuration, starts the scheduler thread and the helpers that feed it
//! (signals, config watcher, sleep/resume monitor), then waits for shutdown.

use anyhow::{Context, Result};
use std::sync::atomic::Ordering;

use crate::common::utils::private_path;
use crate::config;
use crate::core::{DayNightScheduler, SchedulerParams};
use crate::geo::{GeolocationClient, SunriseCalculator};
use crate::io::dbus::start_sleep_resume_monitor;
use crate::io::lock::{self, LockStatus};
use crate::io::signals::setup_signal_handler;
use crate::notification;
use crate::state::FileFlagStore;
use crate::theme;
use crate::time_source::SystemClock;

/// Runs themeflux in the foreground until a shutdown signal arrives.
///
/// # Examples
///
/// ```no_run
/// use themeflux::ThemeFlux;
///
/// # fn main() -> anyhow::Result<()> {
/// ThemeFlux::new(false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct ThemeFlux {
    debug_enabled: bool,
    create_lock: bool,
}

impl ThemeFlux {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            create_lock: true,
        }
    }

    /// Skip single-instance enforcement.
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Execute the application.
    pub fn run(self) -> Result<()> {
        log_version!();
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Debug mode enabled - showing detailed scheduler operations");
        }

        let config = config::load()?;
        let config_path = config::get_config_path()?;

        let instance_lock = if self.create_lock {
            let path = lock::lock_path();
            match lock::acquire_lock(&path)? {
                LockStatus::Acquired(instance_lock) => {
                    log_block_start!("Lock acquired, starting themeflux...");
                    if self.debug_enabled {
                        log_indented!("Lock file: {}", private_path(instance_lock.path()));
                    }
                    Some(instance_lock)
                }
                LockStatus::HeldBy(pid) => {
                    match pid {
                        Some(pid) => log_error!("themeflux is already running (PID: {pid})"),
                        None => log_error!("themeflux is already running"),
                    }
                    log_indented!("Use 'themeflux reload' to apply configuration changes");
                    log_indented!("Use 'themeflux stop' to terminate it");
                    log_end!();
                    anyhow::bail!("another instance holds {}", private_path(&path));
                }
            }
        } else {
            None
        };

        config.log_config();

        let applier = theme::create_applier(&config).context("Failed to set up theme applier")?;
        let notifier =
            notification::create_sink(config.notifier(), config_path.clone(), self.debug_enabled)
                .context("Failed to set up notifications")?;
        let flags = FileFlagStore::for_config_dir(config::get_custom_config_dir().as_deref())?;
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Theme applier: {}", applier.applier_name());
            log_indented!("Notifications: {}", notifier.sink_name());
            log_indented!("State directory: {}", private_path(flags.dir()));
        }

        let poll_interval = config.poll_interval();
        let scheduler = DayNightScheduler::new(SchedulerParams {
            config: config.clone(),
            location: Box::new(GeolocationClient::new(config.request_timeout())),
            solar: Box::new(SunriseCalculator),
            applier,
            notifier,
            flags: Box::new(flags),
            clock: Box::new(SystemClock),
            debug_enabled: self.debug_enabled,
        });
        let handle = scheduler.start(poll_interval)?;

        let signal_state =
            setup_signal_handler(handle.sender(), config_path.clone(), self.debug_enabled)?;

        if let Err(e) =
            config::start_config_watcher(config_path, handle.sender(), config, self.debug_enabled)
        {
            log_pipe!();
            log_warning!("Config hot reload unavailable: {e:#}");
            log_indented!("Use 'themeflux reload' after editing the configuration");
        }

        start_sleep_resume_monitor(handle.sender(), self.debug_enabled);

        handle.join()?;

        if self.debug_enabled && signal_state.running.load(Ordering::SeqCst) {
            log_pipe!();
            log_debug!("Scheduler stopped without a shutdown signal");
        }

        if let Some(instance_lock) = instance_lock {
            instance_lock.release();
        }

        log_block_start!("Shutdown complete");
        log_end!();
        Ok(())
    }
}
