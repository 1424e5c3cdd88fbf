//! User-facing notifications.
//!
//! The scheduler describes what happened as a [`Notification`] and hands it
//! to a [`NotificationSink`]. Sinks decide how to show it: [`LogSink`] prints
//! it in the terminal log, [`DesktopSink`] raises a freedesktop notification
//! with action buttons.

pub mod desktop;
pub mod log;

pub use desktop::DesktopSink;
pub use log::LogSink;

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::common::constants::{API_KEY_HELP_URL, PACKAGE_NAME, SUCCESS_DISMISS_SECS};
use crate::config::NotifierKind;
use crate::core::Period;
use crate::geo::Coordinates;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
}

/// What happens when an action button is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// Open the configuration file
    OpenSettings,
}

impl ActionTarget {
    /// Stable identifier used as the D-Bus action key.
    pub fn key(&self) -> &'static str {
        match self {
            ActionTarget::OpenSettings => "open-settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: String,
    pub target: ActionTarget,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub actions: Vec<NotificationAction>,
    /// `None` keeps the notification until the user dismisses it
    pub dismiss_after: Option<Duration>,
}

impl Notification {
    /// Shown once when no API key is configured.
    pub fn api_key_required() -> Self {
        Self {
            kind: NotificationKind::Info,
            title: "API key required".to_string(),
            description: format!(
                "{PACKAGE_NAME} needs a Google Maps Geolocation API key to retrieve your location.\n\
                 The location is necessary to calculate the exact time of sunrise and sunset.\n\n\
                 Get a key at:\n{API_KEY_HELP_URL}"
            ),
            actions: vec![NotificationAction {
                label: "Set API Key".to_string(),
                target: ActionTarget::OpenSettings,
            }],
            dismiss_after: None,
        }
    }

    /// Shown whenever a location lookup fails.
    pub fn location_failed(detail: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Could not retrieve geolocation".to_string(),
            description: format!(
                "{PACKAGE_NAME} could not retrieve your location. Maybe the API key is invalid?\n\n{detail}"
            ),
            actions: vec![NotificationAction {
                label: "Check API Key".to_string(),
                target: ActionTarget::OpenSettings,
            }],
            dismiss_after: None,
        }
    }

    /// Shown after the first successful lookup.
    pub fn location_retrieved(coordinates: Coordinates) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Retrieved geolocation".to_string(),
            description: format!("Themes will follow sunrise and sunset at {coordinates}"),
            actions: Vec::new(),
            dismiss_after: Some(Duration::from_secs(SUCCESS_DISMISS_SECS)),
        }
    }

    /// Shown when the theme applier failed.
    pub fn theme_not_applied(period: Period, detail: &str) -> Self {
        Self {
            kind: NotificationKind::Warning,
            title: format!("Could not apply the {} theme", period.as_str()),
            description: detail.to_string(),
            actions: vec![NotificationAction {
                label: "Open Settings".to_string(),
                target: ActionTarget::OpenSettings,
            }],
            dismiss_after: None,
        }
    }
}

/// Somewhere notifications can be shown.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink {
    fn notify(&self, notification: &Notification) -> Result<()>;

    /// Human readable name for logs.
    fn sink_name(&self) -> &'static str;
}

/// Build the sink selected in the configuration.
///
/// `auto` prefers desktop notifications and falls back to the log when no
/// notification server is reachable. `desktop` fails instead of falling back.
pub fn create_sink(
    kind: NotifierKind,
    settings_path: PathBuf,
    debug_enabled: bool,
) -> Result<Box<dyn NotificationSink + Send>> {
    match kind {
        NotifierKind::Log => Ok(Box::new(LogSink)),
        NotifierKind::Desktop => Ok(Box::new(DesktopSink::connect(settings_path, debug_enabled)?)),
        NotifierKind::Auto => match DesktopSink::connect(settings_path, debug_enabled) {
            Ok(sink) => Ok(Box::new(sink)),
            Err(e) => {
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Desktop notifications unavailable: {e:#}");
                    log_indented!("Falling back to terminal notifications");
                }
                Ok(Box::new(LogSink))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_required_has_settings_action() {
        let n = Notification::api_key_required();
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.title, "API key required");
        assert_eq!(n.actions.len(), 1);
        assert_eq!(n.actions[0].label, "Set API Key");
        assert_eq!(n.actions[0].target, ActionTarget::OpenSettings);
        assert!(n.description.contains(API_KEY_HELP_URL));
        assert_eq!(n.dismiss_after, None);
    }

    #[test]
    fn test_location_failed_has_check_action() {
        let n = Notification::location_failed("request failed: timeout");
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.actions[0].label, "Check API Key");
        assert!(n.description.contains("request failed: timeout"));
    }

    #[test]
    fn test_location_retrieved_auto_dismisses() {
        let coords = Coordinates::new(40.0, -74.0).unwrap();
        let n = Notification::location_retrieved(coords);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.dismiss_after, Some(Duration::from_secs(10)));
        assert!(n.actions.is_empty());
    }

    #[test]
    fn test_log_sink_selected_explicitly() {
        let sink = create_sink(NotifierKind::Log, PathBuf::from("/tmp/x.toml"), false).unwrap();
        assert_eq!(sink.sink_name(), "log");
    }
}
