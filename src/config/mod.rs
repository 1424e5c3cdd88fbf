//! Configuration system for themeflux with validation and hot reloading.
//!
//! Configuration lives in `themeflux.toml` under `XDG_CONFIG_HOME/themeflux/`
//! (or the directory passed with `--config`). A commented default file is
//! created on first run.
//!
//! ```toml
//! #[Geolocation]
//! api_key = ""                # Google Maps Geolocation API key
//! poll_interval = 10          # Minutes between location checks (1-1440)
//! request_timeout = 30        # Seconds before a location request or theme command fails (1-300)
//!
//! #[Switching]
//! transition_offset = 10      # Minutes before sunrise/sunset to switch (0-120)
//! applier = "settings_file"   # How themes are applied: "settings_file" or "command"
//! settings_file = "~/.config/themeflux/editor.json"
//! settings_key = "core.themes"
//! notifier = "auto"           # "auto", "desktop" or "log"
//!
//! [day]
//! ui = "one-light-ui"
//! syntax = "one-light-syntax"
//!
//! [night]
//! ui = "one-dark-ui"
//! syntax = "one-dark-syntax"
//! ```
//!
//! Every field is optional and falls back to the matching `DEFAULT_*`
//! constant, so accessors rather than raw fields should be used.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils;
use crate::core::Period;
use crate::theme::ThemePair;

pub use builder::create_default_config;
pub use loading::{
    get_config_base_dir, get_config_path, get_custom_config_dir, load, load_from_path,
    set_config_dir,
};
pub use watcher::start_config_watcher;

/// How theme pairs reach the editor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplierKind {
    /// Rewrite a JSON settings file that the editor watches
    SettingsFile,
    /// Run a user-provided command
    Command,
}

impl ApplierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplierKind::SettingsFile => "settings_file",
            ApplierKind::Command => "command",
        }
    }
}

/// Where notifications are shown.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Desktop notifications when available, otherwise the terminal log
    Auto,
    Desktop,
    Log,
}

impl NotifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::Auto => "auto",
            NotifierKind::Desktop => "desktop",
            NotifierKind::Log => "log",
        }
    }
}

/// A `[day]` or `[night]` table. Missing entries use the built-in pair.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ThemePairConfig {
    pub ui: Option<String>,
    pub syntax: Option<String>,
}

/// Everything that decides how the applier behaves; a change requires a new
/// applier instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplierSettings {
    pub kind: ApplierKind,
    pub settings_file: Option<String>,
    pub settings_key: String,
    pub command: Vec<String>,
    /// Limit on each command applier run
    pub timeout: std::time::Duration,
}

/// Configuration structure for themeflux, loaded from `themeflux.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Google Maps Geolocation API key. Empty disables polling.
    pub api_key: Option<String>,
    /// Minutes between polls.
    pub poll_interval: Option<u64>,
    /// Minutes before sunrise/sunset at which the theme switches.
    pub transition_offset: Option<u64>,
    /// Seconds before a location request or theme command is abandoned.
    pub request_timeout: Option<u64>,
    pub applier: Option<ApplierKind>,
    pub settings_file: Option<String>,
    pub settings_key: Option<String>,
    /// Program and arguments; `{ui}`, `{syntax}` and `{period}` are substituted.
    pub command: Option<Vec<String>>,
    pub notifier: Option<NotifierKind>,
    pub day: Option<ThemePairConfig>,
    pub night: Option<ThemePairConfig>,
}

impl Config {
    /// The API key with surrounding whitespace removed; empty if unset.
    pub fn api_key(&self) -> String {
        self.api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL) * 60)
    }

    pub fn transition_offset(&self) -> chrono::Duration {
        let minutes = self
            .transition_offset
            .unwrap_or(DEFAULT_TRANSITION_OFFSET)
            .min(MAXIMUM_TRANSITION_OFFSET);
        chrono::Duration::minutes(minutes as i64)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
    }

    pub fn applier(&self) -> ApplierKind {
        self.applier.unwrap_or(DEFAULT_APPLIER)
    }

    pub fn notifier(&self) -> NotifierKind {
        self.notifier.unwrap_or(DEFAULT_NOTIFIER)
    }

    pub fn settings_key(&self) -> &str {
        self.settings_key.as_deref().unwrap_or(DEFAULT_SETTINGS_KEY)
    }

    pub fn command(&self) -> Vec<String> {
        self.command.clone().unwrap_or_default()
    }

    /// The settings file the settings file applier writes to.
    ///
    /// Defaults to `editor.json` next to the configuration file.
    pub fn settings_file_path(&self) -> Result<PathBuf> {
        match self.settings_file.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(utils::expand_tilde(raw)),
            _ => Ok(get_config_base_dir()
                .context("Could not determine the default settings file location")?
                .join(DEFAULT_SETTINGS_FILE_NAME)),
        }
    }

    pub fn applier_settings(&self) -> ApplierSettings {
        ApplierSettings {
            kind: self.applier(),
            settings_file: self.settings_file.clone(),
            settings_key: self.settings_key().to_string(),
            command: self.command(),
            timeout: self.request_timeout(),
        }
    }

    pub fn day_pair(&self) -> ThemePair {
        resolve_pair(
            self.day.as_ref(),
            DEFAULT_DAY_UI_THEME,
            DEFAULT_DAY_SYNTAX_THEME,
        )
    }

    pub fn night_pair(&self) -> ThemePair {
        resolve_pair(
            self.night.as_ref(),
            DEFAULT_NIGHT_UI_THEME,
            DEFAULT_NIGHT_SYNTAX_THEME,
        )
    }

    /// The pair for `period`; `Unknown` maps to the night pair.
    pub fn theme_pair(&self, period: Period) -> ThemePair {
        match period {
            Period::Day => self.day_pair(),
            Period::Night | Period::Unknown => self.night_pair(),
        }
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        if self.api_key().is_empty() {
            log_indented!("API key: not set");
        } else {
            log_indented!("API key: set");
        }
        log_indented!(
            "Poll interval: {} minutes",
            self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL)
        );
        log_indented!(
            "Transition offset: {} minutes",
            self.transition_offset.unwrap_or(DEFAULT_TRANSITION_OFFSET)
        );
        log_indented!(
            "Request timeout: {} seconds",
            self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
        );

        match self.applier() {
            ApplierKind::SettingsFile => {
                let path = self
                    .settings_file_path()
                    .map(|p| utils::private_path(&p))
                    .unwrap_or_else(|_| DEFAULT_SETTINGS_FILE_NAME.to_string());
                log_indented!("Applier: settings file ({path} → {})", self.settings_key());
            }
            ApplierKind::Command => {
                log_indented!("Applier: command ({})", self.command().join(" "));
            }
        }
        log_indented!("Notifier: {}", self.notifier().as_str());
        log_indented!("Day: {}", self.day_pair());
        log_indented!("Night: {}", self.night_pair());
    }
}

fn resolve_pair(table: Option<&ThemePairConfig>, ui: &str, syntax: &str) -> ThemePair {
    let pick = |value: Option<&String>, fallback: &str| {
        value
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    ThemePair {
        ui: pick(table.and_then(|t| t.ui.as_ref()), ui),
        syntax: pick(table.and_then(|t| t.syntax.as_ref()), syntax),
    }
}

#[cfg(test)]
mod tests;
