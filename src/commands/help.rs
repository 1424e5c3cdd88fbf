//! Help command implementation for themeflux.
//!
//! Dispatches to command-specific help, or shows the general command list.

use anyhow::Result;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "reload" => log_block_start!("Usage: themeflux reload"),
        "stop" => log_block_start!("Usage: themeflux stop"),
        "status" => log_block_start!("Usage: themeflux status [--json]"),
        "help" => log_block_start!("Usage: themeflux help [COMMAND]"),
        _ => log_block_start!("Usage: themeflux [OPTIONS] [COMMAND]"),
    }
}

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("help") => display_help_help(),
        Some("reload") => super::reload::display_help(),
        Some("status") => super::status::display_help(),
        Some("stop") => super::stop::display_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {unknown}");
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("help [COMMAND]     Show detailed help for a command");
    log_indented!("reload             Reload configuration and re-apply the theme");
    log_indented!("status [--json]    Show the theme pair for the current time");
    log_indented!("stop               Stop the running daemon");
    log_pipe!();
    log_info!("Use 'themeflux help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'themeflux --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    show_command_usage("help");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("themeflux help");
    log_indented!("themeflux help status");
    log_end!();
}
