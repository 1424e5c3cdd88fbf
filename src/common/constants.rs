//! Application-wide constants: defaults, validation limits and fixed timings.

use crate::config::{ApplierKind, NotifierKind};

// # Identity

/// Package identity, used to namespace configuration and state directories.
pub const PACKAGE_NAME: &str = "themeflux";
pub const CONFIG_FILE_NAME: &str = "themeflux.toml";
pub const LOCK_FILE_NAME: &str = "themeflux.lock";

// # Geolocation

pub const GEOLOCATION_API_URL: &str = "https://www.googleapis.com/geolocation/v1/geolocate";
pub const API_KEY_HELP_URL: &str =
    "https://developers.google.com/maps/documentation/geolocation/get-api-key";

// # Scheduling defaults

pub const DEFAULT_POLL_INTERVAL: u64 = 10; // minutes
pub const DEFAULT_TRANSITION_OFFSET: u64 = 10; // minutes before sunrise/sunset
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30; // seconds

/// Delay between the day/night decision and the theme write.
pub const THEME_APPLY_DELAY_MS: u64 = 100;

/// The "retrieved geolocation" notice dismisses itself after this long.
pub const SUCCESS_DISMISS_SECS: u64 = 10;

// # Validation limits

pub const MINIMUM_POLL_INTERVAL: u64 = 1;
pub const MAXIMUM_POLL_INTERVAL: u64 = 1440;
pub const MINIMUM_TRANSITION_OFFSET: u64 = 0;
pub const MAXIMUM_TRANSITION_OFFSET: u64 = 120;
pub const MINIMUM_REQUEST_TIMEOUT: u64 = 1;
pub const MAXIMUM_REQUEST_TIMEOUT: u64 = 300;

// # Theme defaults

pub const DEFAULT_DAY_UI_THEME: &str = "one-light-ui";
pub const DEFAULT_DAY_SYNTAX_THEME: &str = "one-light-syntax";
pub const DEFAULT_NIGHT_UI_THEME: &str = "one-dark-ui";
pub const DEFAULT_NIGHT_SYNTAX_THEME: &str = "one-dark-syntax";

// # Collaborator defaults

pub const DEFAULT_APPLIER: ApplierKind = ApplierKind::SettingsFile;
pub const DEFAULT_NOTIFIER: NotifierKind = NotifierKind::Auto;
pub const DEFAULT_SETTINGS_FILE_NAME: &str = "editor.json";
pub const DEFAULT_SETTINGS_KEY: &str = "core.themes";

// # Config watcher

/// Editors often write a file in several steps; collapse those into one reload.
pub const CONFIG_WATCH_DEBOUNCE_MS: u64 = 500;

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[cfg(test)]
pub mod test_constants {
    pub const TEST_API_KEY: &str = "AIzaTestKey";
    pub const TEST_LATITUDE: f64 = 40.0;
    pub const TEST_LONGITUDE: f64 = -74.0;
    pub const TEST_DAY_UI: &str = "atom-light-ui";
    pub const TEST_DAY_SYNTAX: &str = "atom-light-syntax";
    pub const TEST_NIGHT_UI: &str = "atom-dark-ui";
    pub const TEST_NIGHT_SYNTAX: &str = "atom-dark-syntax";
}
