//! Command-line argument parsing and processing.
//!
//! Supports the standard help, version and debug flags, a custom
//! configuration directory, and the `reload`, `stop`, `status` and `help`
//! subcommands. Unknown arguments lead to the help screen.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon in the foreground
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Ask the running daemon to reload its configuration
    Reload {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Terminate the running daemon
    Stop { debug_enabled: bool },
    /// Print the theme for the current time
    Status {
        json: bool,
        config_dir: Option<String>,
    },
    /// Detailed help, optionally for one command
    Help { command: Option<String> },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

const COMMANDS: [&str; 4] = ["reload", "stop", "status", "help"];

impl ParsedArgs {
    /// Parse command-line arguments, skipping the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut json = false;
        let mut config_dir: Option<String> = None;
        let mut command: Option<String> = None;
        let mut operands: Vec<String> = Vec::new();
        let mut unknown_arg_found = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug_enabled = true,
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--json" => json = true,
                "--config" | "-c" => match iter.next() {
                    Some(dir) if !dir.starts_with('-') => config_dir = Some(dir),
                    _ => {
                        log_error!("--config requires a directory argument");
                        unknown_arg_found = true;
                    }
                },
                flag if flag.starts_with('-') => {
                    log_warning!("Unknown argument: {flag}");
                    unknown_arg_found = true;
                }
                word if command.is_none() => {
                    if COMMANDS.contains(&word) {
                        command = Some(word.to_string());
                    } else {
                        log_warning!("Unknown command: {word}");
                        unknown_arg_found = true;
                    }
                }
                word => operands.push(word.to_string()),
            }
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::ShowHelp
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else {
            match command.as_deref() {
                None if operands.is_empty() => CliAction::Run {
                    debug_enabled,
                    config_dir,
                },
                Some("help") if operands.len() <= 1 => CliAction::Help {
                    command: operands.into_iter().next(),
                },
                Some("reload") if operands.is_empty() => CliAction::Reload {
                    debug_enabled,
                    config_dir,
                },
                Some("stop") if operands.is_empty() => CliAction::Stop { debug_enabled },
                Some("status") if operands.is_empty() => CliAction::Status { json, config_dir },
                _ => {
                    log_error!("Too many arguments");
                    CliAction::ShowHelpDueToError
                }
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_decorated!(env!("CARGO_PKG_DESCRIPTION"));
    log_end!();
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("themeflux [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("reload                 Reload configuration of the running daemon");
    log_indented!("stop                   Stop the running daemon");
    log_indented!("status [--json]        Show the theme for the current time");
    log_indented!("help [COMMAND]         Show detailed help for a command");
    log_pipe!();
    log_info!("Without a command, themeflux runs in the foreground.");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["themeflux"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_flag() {
        let expected = CliAction::Run {
            debug_enabled: true,
            config_dir: None,
        };
        assert_eq!(parse(&["--debug"]), expected);
        assert_eq!(parse(&["-d"]), expected);
    }

    #[test]
    fn test_parse_config_dir() {
        assert_eq!(
            parse(&["--config", "/tmp/tf", "-d"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/tf".to_string()),
            }
        );
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config", "--debug"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-v"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(parse(&["--help", "--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["stop", "--version"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(parse(&["--verbose"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--debug", "--bogus"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse(&["reload"]),
            CliAction::Reload {
                debug_enabled: false,
                config_dir: None,
            }
        );
        assert_eq!(
            parse(&["--debug", "stop"]),
            CliAction::Stop {
                debug_enabled: true
            }
        );
        assert_eq!(
            parse(&["status", "--json", "-c", "/tmp/tf"]),
            CliAction::Status {
                json: true,
                config_dir: Some("/tmp/tf".to_string()),
            }
        );
        assert_eq!(parse(&["help"]), CliAction::Help { command: None });
        assert_eq!(
            parse(&["help", "status"]),
            CliAction::Help {
                command: Some("status".to_string())
            }
        );
    }

    #[test]
    fn test_parse_unknown_command_and_extra_operands() {
        assert_eq!(parse(&["start"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["stop", "now"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["help", "stop", "reload"]), CliAction::ShowHelpDueToError);
    }
}
