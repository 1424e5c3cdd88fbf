//! Implementation of the reload command.
//!
//! Validates the configuration on disk, then sends SIGUSR2 to the running
//! daemon, which reloads it and re-evaluates the theme immediately.

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::common::utils::private_path;
use crate::config;

/// Handle the reload command.
pub fn handle_reload_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let pid = super::running_pid()?;

    // Fail here rather than in the daemon, where the error is easy to miss
    let config_path = config::get_config_path()?;
    config::load_from_path(&config_path)?;
    if debug_enabled {
        log_pipe!();
        log_debug!("Validated {}", private_path(&config_path));
    }

    let raw_pid = i32::try_from(pid).context("PID out of range")?;
    kill(Pid::from_raw(raw_pid), Signal::SIGUSR2)
        .with_context(|| format!("Failed to signal themeflux (PID: {pid})"))?;

    log_block_start!("Sent reload signal to themeflux (PID: {pid})");
    log_indented!("The configuration will be reloaded and the theme re-evaluated");
    log_end!();
    Ok(())
}

/// Display detailed help for the reload command
pub fn display_help() {
    log_version!();
    log_block_start!("reload - Reload configuration of the running daemon");
    log_block_start!("Usage: themeflux reload");
    log_block_start!("Description:");
    log_indented!("Validates themeflux.toml and asks the running instance to reload it.");
    log_indented!("The theme is re-evaluated right away, even if the period is unchanged.");
    log_indented!("Saving the configuration file has the same effect while themeflux runs.");
    log_block_start!("Examples:");
    log_indented!("themeflux reload");
    log_indented!("themeflux --config ~/.config/themeflux-work reload");
    log_end!();
}
