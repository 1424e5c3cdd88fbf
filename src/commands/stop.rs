//! Implementation of the stop command.
//!
//! Sends SIGTERM to the running daemon and waits for it to exit.

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::time::{Duration, Instant};

use crate::io::lock::is_process_running;

const STOP_TIMEOUT: Duration = Duration::from_secs(3);
const STOP_POLL: Duration = Duration::from_millis(100);

/// Result of a stop command operation.
#[derive(Debug, PartialEq)]
pub enum StopResult {
    Stopped,
    /// The signal was delivered but the process outlived the timeout
    StillRunning,
}

/// Handle the stop command to terminate a running themeflux instance.
pub fn handle_stop_command(debug_enabled: bool) -> Result<StopResult> {
    log_version!();

    let pid = super::running_pid()?;
    log_block_start!("Stopping themeflux (PID: {pid})...");

    let raw_pid = i32::try_from(pid).context("PID out of range")?;
    kill(Pid::from_raw(raw_pid), Signal::SIGTERM)
        .with_context(|| format!("Failed to signal themeflux (PID: {pid})"))?;
    if debug_enabled {
        log_pipe!();
        log_debug!("SIGTERM sent to process {pid}");
    }

    let result = wait_for_exit(pid, STOP_TIMEOUT);
    match result {
        StopResult::Stopped => {
            log_pipe!();
            log_info!("Process terminated successfully");
        }
        StopResult::StillRunning => {
            log_pipe!();
            log_warning!("Process did not terminate within the expected time");
            log_indented!("The termination signal was sent; it may still be shutting down");
        }
    }
    log_end!();
    Ok(result)
}

fn wait_for_exit(pid: u32, timeout: Duration) -> StopResult {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if !is_process_running(pid) {
            return StopResult::Stopped;
        }
        std::thread::sleep(STOP_POLL);
    }
    if is_process_running(pid) {
        StopResult::StillRunning
    } else {
        StopResult::Stopped
    }
}

/// Display detailed help for the stop command
pub fn display_help() {
    log_version!();
    log_block_start!("stop - Cleanly terminate running themeflux");
    log_block_start!("Usage: themeflux stop");
    log_block_start!("Description:");
    log_indented!("Sends a termination signal to the running themeflux instance");
    log_indented!("and waits up to 3 seconds for it to exit. The current theme");
    log_indented!("stays applied.");
    log_block_start!("Examples:");
    log_indented!("themeflux stop");
    log_indented!("themeflux --debug stop");
    log_end!();
}
