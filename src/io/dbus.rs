//! Sleep/resume detection via systemd-logind.
//!
//! A laptop that sleeps through sunset wakes up with the wrong theme and
//! would keep it until the next poll. Listening for logind's
//! `PrepareForSleep(false)` lets the scheduler poll right after resume.

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use zbus::blocking::Connection;

use crate::core::SchedulerMessage;

/// D-Bus proxy trait for systemd-logind Manager interface.
#[zbus::proxy(
    interface = "org.freedesktop.login1.Manager",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1"
)]
trait LogindManager {
    /// `start` is true before sleeping and false after resuming.
    #[zbus(signal)]
    fn prepare_for_sleep(&self, start: bool) -> zbus::Result<()>;
}

const MAX_MONITOR_RESTARTS: u8 = 3;
const RESTART_DELAY_MS: u64 = 2000;

/// Start the sleep/resume monitor in a background thread.
///
/// Failures are logged and the daemon keeps running without resume detection.
pub fn start_sleep_resume_monitor(scheduler: Sender<SchedulerMessage>, debug_enabled: bool) {
    let spawned = thread::Builder::new()
        .name("sleep-monitor".to_string())
        .spawn(move || {
            for attempt in 0..=MAX_MONITOR_RESTARTS {
                match monitor_sleep_signals(&scheduler, debug_enabled) {
                    Ok(()) => return,
                    Err(e) => {
                        log_pipe!();
                        log_warning!("Sleep monitor error: {e:#}");
                        if attempt == MAX_MONITOR_RESTARTS {
                            log_indented!("Sleep/resume detection will not be available");
                            return;
                        }
                        log_indented!(
                            "Will restart D-Bus monitor (attempt {}/{})",
                            attempt + 1,
                            MAX_MONITOR_RESTARTS
                        );
                        thread::sleep(Duration::from_millis(RESTART_DELAY_MS));
                    }
                }
            }
        });

    if let Err(e) = spawned {
        log_warning!("Failed to start sleep monitor: {e}");
    }
}

/// Returns `Ok` when the scheduler is gone, `Err` when D-Bus failed.
fn monitor_sleep_signals(scheduler: &Sender<SchedulerMessage>, debug_enabled: bool) -> Result<()> {
    let connection = Connection::system().context("Failed to connect to system D-Bus")?;
    let logind_proxy =
        LogindManagerProxyBlocking::new(&connection).context("Failed to create logind proxy")?;
    let sleep_signals = logind_proxy
        .receive_prepare_for_sleep()
        .context("Failed to subscribe to PrepareForSleep signals")?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Subscribed to systemd-logind PrepareForSleep signals");
    }

    for signal in sleep_signals {
        let args = match signal.args() {
            Ok(args) => args,
            Err(e) => {
                log_warning!("Failed to parse PrepareForSleep signal args: {e}");
                continue;
            }
        };

        if args.start {
            if debug_enabled {
                log_pipe!();
                log_debug!("System entering sleep");
            }
            continue;
        }

        log_pipe!();
        log_info!("System resumed from sleep, checking the theme");
        if scheduler.send(SchedulerMessage::Poll).is_err() {
            return Ok(());
        }
    }

    anyhow::bail!("PrepareForSleep signal stream ended")
}
