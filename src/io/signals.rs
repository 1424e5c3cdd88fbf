//! Unix signal handling.
//!
//! A dedicated thread turns signals into scheduler messages:
//!
//! - `SIGINT`, `SIGTERM`, `SIGHUP`: shut down
//! - `SIGUSR2`: reload the configuration from disk and refresh the theme
//!
//! `themeflux reload` and `themeflux stop` send these signals to the running
//! instance.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use crate::config;
use crate::core::SchedulerMessage;

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown signal arrived
    pub running: Arc<AtomicBool>,
}

/// What a received signal asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Shutdown,
    Reload,
    Ignore,
}

pub fn classify(signal: i32) -> SignalAction {
    match signal {
        SIGINT | SIGTERM | SIGHUP => SignalAction::Shutdown,
        SIGUSR2 => SignalAction::Reload,
        _ => SignalAction::Ignore,
    }
}

/// Install handlers and start the signal thread.
///
/// Reloads read `config_path` and forward the result; a configuration that
/// fails to load is reported and the running one kept.
pub fn setup_signal_handler(
    scheduler: Sender<SchedulerMessage>,
    config_path: PathBuf,
    debug_enabled: bool,
) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("Failed to register signal handlers")?;

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for sig in signals.forever() {
                match classify(sig) {
                    SignalAction::Shutdown => {
                        let message = match sig {
                            SIGINT => "Received interrupt signal, shutting down...",
                            SIGTERM => "Received termination request, shutting down...",
                            _ => "Received hangup signal, shutting down...",
                        };
                        log_pipe!();
                        log_info!("{message}");

                        running_clone.store(false, Ordering::SeqCst);
                        if scheduler.send(SchedulerMessage::Shutdown).is_err() && debug_enabled {
                            log_indented!("Scheduler already stopped");
                        }
                        break;
                    }
                    SignalAction::Reload => {
                        log_pipe!();
                        log_info!("Received configuration reload signal");
                        match config::load_from_path(&config_path) {
                            Ok(config) => {
                                if scheduler
                                    .send(SchedulerMessage::Reload(Box::new(config)))
                                    .is_err()
                                {
                                    break;
                                }
                            }
                            Err(e) => {
                                log_warning!("Reload failed: {e:#}");
                                log_indented!("The previous configuration stays active");
                            }
                        }
                    }
                    SignalAction::Ignore => {}
                }
            }
        })
        .context("Failed to spawn signal handler thread")?;

    Ok(SignalState { running })
}
