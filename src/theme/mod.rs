//! Theme appliers.
//!
//! A [`ThemeApplier`] puts a [`ThemePair`] into effect in the editor. The
//! scheduler only calls it when the period changes, so appliers may be slow
//! (spawning a process, rewriting a file) without affecting anything else.
//!
//! ## Implementations
//!
//! - [`SettingsFileApplier`]: writes `[ui, syntax]` into a JSON settings file
//!   at a dotted key, for editors that watch their settings file
//! - [`CommandApplier`]: runs a user command with the theme names substituted

pub mod command;
pub mod settings_file;

pub use command::CommandApplier;
pub use settings_file::SettingsFileApplier;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{ApplierKind, Config};
use crate::core::Period;

/// An interface theme and a syntax theme that are applied together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePair {
    pub ui: String,
    pub syntax: String,
}

impl ThemePair {
    pub fn new(ui: impl Into<String>, syntax: impl Into<String>) -> Self {
        Self {
            ui: ui.into(),
            syntax: syntax.into(),
        }
    }

    /// The ordered list written to editor settings: interface first.
    pub fn as_list(&self) -> [&str; 2] {
        [&self.ui, &self.syntax]
    }
}

impl std::fmt::Display for ThemePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}", self.ui, self.syntax)
    }
}

/// A human readable title for a theme package name.
///
/// `one-dark-ui` becomes `One Dark`, `solarized-light-syntax-theme` becomes
/// `Solarized Light`.
pub fn theme_title(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_suffix("-theme").unwrap_or(name);
    let name = name.replace("-ui", "").replace("-syntax", "");

    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Something that can switch the editor to a theme pair.
#[cfg_attr(test, mockall::automock)]
pub trait ThemeApplier {
    /// Apply `pair`, which was chosen for `period`.
    fn apply(&mut self, period: Period, pair: &ThemePair) -> Result<()>;

    /// Human readable name for logs.
    fn applier_name(&self) -> &'static str;
}

/// Build the applier selected in the configuration.
pub fn create_applier(config: &Config) -> Result<Box<dyn ThemeApplier + Send>> {
    match config.applier() {
        ApplierKind::SettingsFile => Ok(Box::new(SettingsFileApplier::new(
            config.settings_file_path()?,
            config.settings_key(),
        )?)),
        ApplierKind::Command => Ok(Box::new(
            CommandApplier::new(config.command())?.with_timeout(config.request_timeout()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_pair_order_and_display() {
        let pair = ThemePair::new("one-dark-ui", "one-dark-syntax");
        assert_eq!(pair.as_list(), ["one-dark-ui", "one-dark-syntax"]);
        assert_eq!(pair.to_string(), "one-dark-ui + one-dark-syntax");
    }

    #[test]
    fn test_theme_title() {
        assert_eq!(theme_title("one-dark-ui"), "One Dark");
        assert_eq!(theme_title("one-light-syntax"), "One Light");
        assert_eq!(theme_title("solarized-dark-syntax-theme"), "Solarized Dark");
        assert_eq!(theme_title("atom_material_ui"), "Atom Material Ui");
        assert_eq!(theme_title(""), "");
    }

    #[test]
    fn test_create_command_applier_requires_command() {
        let config = Config {
            applier: Some(ApplierKind::Command),
            ..Default::default()
        };
        assert!(create_applier(&config).is_err());

        let config = Config {
            applier: Some(ApplierKind::Command),
            command: Some(vec!["true".to_string()]),
            ..Default::default()
        };
        let applier = create_applier(&config).unwrap();
        assert_eq!(applier.applier_name(), "command");
    }

    #[test]
    fn test_create_settings_file_applier() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            settings_file: Some(dir.path().join("editor.json").display().to_string()),
            ..Default::default()
        };
        let applier = create_applier(&config).unwrap();
        assert_eq!(applier.applier_name(), "settings file");
    }
}
