//! Structured logging system with visual formatting.
//!
//! This module provides the terminal output used by every part of themeflux.
//! Lines are decorated with Unicode box drawing characters so that a running
//! daemon produces one continuous, readable block of output:
//!
//! ```text
//! ┏ themeflux v0.3.0 ━━╸
//! ┃
//! ┣ Loaded configuration
//! ┃   Poll interval: 10 minutes
//! ┃
//! ┣[INFO] Retrieved geolocation
//! ╹
//! ```
//!
//! The logger supports runtime enable/disable for quiet operation during tests
//! and an optional wall-clock prefix for long running daemon sessions.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static TIMESTAMPS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Main logging interface.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: begins a new conceptual block (state changes, phases,
///   significant events). Prints an empty pipe for spacing, then `┣ message`.
/// - **`log_decorated!`**: continues a block with `┣ message`.
/// - **`log_indented!`**: nested details below a block, `┃   message`.
/// - **`log_pipe!`**: an empty `┃` line. Use it before a semantic level macro
///   that starts a new block; never at the end of a block.
/// - **`log_version!`** / **`log_end!`**: startup header and final `╹` marker.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`**:
///   semantic messages with a colored `[LEVEL]` tag.
/// - **`log_error_exit!`**: a terminating error, closes the block with `┗`.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Prefix every line with the local wall-clock time.
    ///
    /// Enabled in debug mode so that poll cycles can be correlated with
    /// sunrise and sunset times in long daemon logs.
    pub fn set_timestamps(enabled: bool) {
        TIMESTAMPS_ENABLED.store(enabled, Ordering::SeqCst);
    }

    fn timestamp_prefix() -> String {
        if TIMESTAMPS_ENABLED.load(Ordering::SeqCst) {
            format!("[{}] ", chrono::Local::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Semantic level shown as a colored tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
    Critical,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "\x1b[32mINFO\x1b[0m",
            Level::Warning => "\x1b[33mWARNING\x1b[0m",
            Level::Error => "\x1b[31mERROR\x1b[0m",
            Level::Debug => "\x1b[32mDEBUG\x1b[0m",
            Level::Critical => "\x1b[31mCRITICAL\x1b[0m",
        }
    }
}

/// Line decoration applied by the logging macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Header,
    Block,
    Decorated,
    Indented,
    Pipe,
    Level(Level),
    Exit,
    End,
}

/// Render a message in the given style without any timestamp prefix.
pub fn format_line(style: Style, message: &str) -> String {
    match style {
        Style::Header => format!("┏ {message} ━━╸\n"),
        Style::Block => format!("┃\n┣ {message}\n"),
        Style::Decorated => format!("┣ {message}\n"),
        Style::Indented => format!("┃   {message}\n"),
        Style::Pipe => "┃\n".to_string(),
        Style::Level(level) => format!("┣[{}] {message}\n", level.tag()),
        Style::Exit => format!("┃\n┗[{}] {message}\n", Level::Error.tag()),
        Style::End => "╹\n".to_string(),
    }
}

/// Write a styled message to stdout. Used by the exported macros.
pub fn emit(style: Style, message: &str) {
    if !Log::is_enabled() {
        return;
    }

    let prefix = Log::timestamp_prefix();
    let rendered = format_line(style, message);
    let mut out = String::with_capacity(rendered.len() + prefix.len() * 2);
    for line in rendered.split_inclusive('\n') {
        out.push_str(&prefix);
        out.push_str(line);
    }

    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(out.as_bytes());
    let _ = stdout.flush();
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_styled {
    ($style:expr, $fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($style, &format!($fmt $($arg)*))
    };
    ($style:expr, $expr:expr) => {
        $crate::logger::emit($style, &format!("{}", $expr))
    };
}

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_styled!($crate::logger::Style::Decorated, $($arg)+)
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_styled!($crate::logger::Style::Indented, $($arg)+)
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit($crate::logger::Style::Pipe, "")
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_styled!($crate::logger::Style::Block, $($arg)+)
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit(
            $crate::logger::Style::Header,
            concat!("themeflux v", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit($crate::logger::Style::End, "")
    };
}

/// Log an informational message with green `[INFO]` tag.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_styled!(
            $crate::logger::Style::Level($crate::logger::Level::Info),
            $($arg)+
        )
    };
}

/// Log a warning message with yellow `[WARNING]` tag.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_styled!(
            $crate::logger::Style::Level($crate::logger::Level::Warning),
            $($arg)+
        )
    };
}

/// Log an error message with red `[ERROR]` tag.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_styled!(
            $crate::logger::Style::Level($crate::logger::Level::Error),
            $($arg)+
        )
    };
}

/// Log an error that terminates the current flow, closing the block with `┗`.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {
        $crate::__log_styled!($crate::logger::Style::Exit, $($arg)+)
    };
}

/// Log a debug/operational message with green `[DEBUG]` tag.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::__log_styled!(
            $crate::logger::Style::Level($crate::logger::Level::Debug),
            $($arg)+
        )
    };
}

/// Log a critical message with red `[CRITICAL]` tag.
#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)+) => {
        $crate::__log_styled!(
            $crate::logger::Style::Level($crate::logger::Level::Critical),
            $($arg)+
        )
    };
}
