//! Binary entry point: parses arguments and dispatches to the daemon or a
//! one-shot command.

use themeflux::args::{CliAction, ParsedArgs};
use themeflux::commands;
use themeflux::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use themeflux::logger::Log;
use themeflux::{ThemeFlux, args, config, log_error_exit};

fn main() {
    let parsed = ParsedArgs::from_env();

    let result = match parsed.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            Log::set_timestamps(debug_enabled);
            config::set_config_dir(config_dir).and_then(|_| ThemeFlux::new(debug_enabled).run())
        }
        CliAction::Reload {
            debug_enabled,
            config_dir,
        } => config::set_config_dir(config_dir)
            .and_then(|_| commands::reload::handle_reload_command(debug_enabled)),
        CliAction::Stop { debug_enabled } => {
            commands::stop::handle_stop_command(debug_enabled).map(|_| ())
        }
        CliAction::Status { json, config_dir } => {
            if json {
                // Keep stdout valid JSON
                Log::set_enabled(false);
            }
            config::set_config_dir(config_dir)
                .and_then(|_| commands::status::handle_status_command(json))
        }
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            Log::set_enabled(true);
            log_error_exit!("{e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
