//! # themeflux
//!
//! Switches an editor between a day and a night theme pair based on the
//! sunrise and sunset at the current location.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`ThemeFlux`] acquires resources and runs the daemon
//! - **Scheduler**: `core` decides day or night and applies transitions
//! - **Collaborators**: `geo` (location, solar times), `theme` (appliers),
//!   `notification` (sinks), `state` (one-shot flags)
//! - **Configuration**: `config` for TOML settings with hot reload
//! - **Commands**: `commands` for the `reload`, `stop`, `status` and `help` subcommands
//! - **Infrastructure**: lock file, signal handling and D-Bus sleep monitoring in `io`

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod app;
pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod geo;
pub mod io;
pub mod notification;
pub mod state;
pub mod theme;
pub mod time_source;

pub use app::ThemeFlux;
pub use crate::core::{DayNightScheduler, Period, PollOutcome, SchedulerHandle, SchedulerParams};
