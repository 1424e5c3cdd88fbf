//! Command-line command handlers for themeflux.
//!
//! Each one-shot command lives in its own submodule. `reload` and `stop`
//! talk to the running daemon through signals; `status` works standalone.

pub mod help;
pub mod reload;
pub mod status;
pub mod stop;

use anyhow::Result;

use crate::io::lock;

/// Raised when a command needs the daemon but none is running.
#[derive(Debug)]
pub(crate) struct NotRunningError;

impl std::fmt::Display for NotRunningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "themeflux isn't running")
    }
}

impl std::error::Error for NotRunningError {}

/// PID of the running daemon.
pub(crate) fn running_pid() -> Result<u32> {
    lock::running_instance(&lock::lock_path()).ok_or_else(|| NotRunningError.into())
}
