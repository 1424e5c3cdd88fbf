//! Default configuration file generation.
//!
//! The default file is built entry by entry so that every setting carries an
//! aligned comment describing its range, the same layout users see when they
//! open the file to add their API key.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;

/// Write a commented default configuration to `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content()).context("Failed to write default config file")?;
    Ok(())
}

/// The content of a freshly created `themeflux.toml`.
pub fn default_config_content() -> String {
    ConfigBuilder::new()
        .add_section("Geolocation")
        .add_setting(
            "api_key",
            "\"\"",
            "Google Maps Geolocation API key (required)",
        )
        .add_setting(
            "poll_interval",
            &DEFAULT_POLL_INTERVAL.to_string(),
            &format!(
                "Minutes between location checks ({MINIMUM_POLL_INTERVAL}-{MAXIMUM_POLL_INTERVAL})"
            ),
        )
        .add_setting(
            "request_timeout",
            &DEFAULT_REQUEST_TIMEOUT.to_string(),
            &format!(
                "Seconds before a location request or theme command fails ({MINIMUM_REQUEST_TIMEOUT}-{MAXIMUM_REQUEST_TIMEOUT})"
            ),
        )
        .add_section("Switching")
        .add_setting(
            "transition_offset",
            &DEFAULT_TRANSITION_OFFSET.to_string(),
            &format!(
                "Minutes before sunrise/sunset to switch themes ({MINIMUM_TRANSITION_OFFSET}-{MAXIMUM_TRANSITION_OFFSET})"
            ),
        )
        .add_setting(
            "applier",
            &format!("\"{}\"", DEFAULT_APPLIER.as_str()),
            "How themes are applied: \"settings_file\" or \"command\"",
        )
        .add_setting(
            "settings_key",
            &format!("\"{DEFAULT_SETTINGS_KEY}\""),
            "Dotted JSON key holding [ui, syntax] in the settings file",
        )
        .add_setting(
            "notifier",
            &format!("\"{}\"", DEFAULT_NOTIFIER.as_str()),
            "Where notices are shown: \"auto\", \"desktop\" or \"log\"",
        )
        .add_comment("settings_file = \"~/.config/editor/settings.json\"  # Defaults to editor.json beside this file")
        .add_comment("command = [\"editor-ctl\", \"theme\", \"{ui}\", \"{syntax}\"]  # Used when applier = \"command\"")
        .add_table("day")
        .add_setting("ui", &format!("\"{DEFAULT_DAY_UI_THEME}\""), "Interface theme during the day")
        .add_setting(
            "syntax",
            &format!("\"{DEFAULT_DAY_SYNTAX_THEME}\""),
            "Syntax theme during the day",
        )
        .add_table("night")
        .add_setting(
            "ui",
            &format!("\"{DEFAULT_NIGHT_UI_THEME}\""),
            "Interface theme at night",
        )
        .add_setting(
            "syntax",
            &format!("\"{DEFAULT_NIGHT_SYNTAX_THEME}\""),
            "Syntax theme at night",
        )
        .build()
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    /// `#[Title]` comment heading
    Section(String),
    /// `[name]` TOML table header
    Table(String),
    /// Commented-out example line, not aligned
    Comment(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_table(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[{name}]")));
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(ConfigEntry::Comment(format!("# {text}")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(heading) | ConfigEntry::Table(heading) => {
                    if !result.is_empty() {
                        result.push(String::new());
                    }
                    result.push(heading);
                }
                ConfigEntry::Comment(text) => result.push(text),
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
