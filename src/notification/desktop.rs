//! Desktop notifications through the freedesktop notification service.
//!
//! Notifications are sent over the session bus. Action buttons are reported
//! back by the `ActionInvoked` signal, which a listener thread receives and
//! turns into opening the configuration file. A second listener drops ids
//! on `NotificationClosed`, so dismissed notifications are not tracked forever.

use anyhow::{Context, Result};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use super::{ActionTarget, Notification, NotificationKind, NotificationSink};
use crate::common::constants::PACKAGE_NAME;
use crate::common::utils;

/// D-Bus proxy for org.freedesktop.Notifications.
#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    /// Returns (name, vendor, version, spec_version) of the server.
    fn get_server_information(&self) -> zbus::Result<(String, String, String, String)>;

    #[zbus(signal)]
    fn action_invoked(&self, id: u32, action_key: String) -> zbus::Result<()>;

    #[zbus(signal)]
    fn notification_closed(&self, id: u32, reason: u32) -> zbus::Result<()>;
}

/// Upper bound on tracked ids, for servers that never emit `NotificationClosed`.
const MAX_PENDING_ACTIONS: usize = 32;

/// Ids of our notifications whose actions we still react to, oldest first.
#[derive(Debug, Default)]
struct PendingActions {
    ids: VecDeque<u32>,
}

impl PendingActions {
    fn track(&mut self, id: u32) {
        self.forget(id);
        if self.ids.len() == MAX_PENDING_ACTIONS {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
    }

    /// Remove `id`, returning whether it was tracked.
    fn take(&mut self, id: u32) -> bool {
        match self.ids.iter().position(|&tracked| tracked == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    fn forget(&mut self, id: u32) {
        self.take(id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// freedesktop urgency levels
fn urgency(kind: NotificationKind) -> u8 {
    match kind {
        NotificationKind::Info | NotificationKind::Success | NotificationKind::Warning => 1,
        NotificationKind::Error => 2,
    }
}

/// Flatten actions into the `[key, label, key, label, ...]` list D-Bus expects.
fn action_list(notification: &Notification) -> Vec<&str> {
    notification
        .actions
        .iter()
        .flat_map(|action| [action.target.key(), action.label.as_str()])
        .collect()
}

/// Milliseconds until the server closes the notification; 0 means never.
fn expire_timeout(notification: &Notification) -> i32 {
    notification
        .dismiss_after
        .map(|d| i32::try_from(d.as_millis()).unwrap_or(i32::MAX))
        .unwrap_or(0)
}

pub struct DesktopSink {
    proxy: NotificationsProxyBlocking<'static>,
    pending: Arc<Mutex<PendingActions>>,
    debug_enabled: bool,
}

impl DesktopSink {
    /// Connect to the session bus and start listening for action clicks and
    /// closed notifications.
    ///
    /// Fails when there is no session bus or no notification server on it.
    pub fn connect(settings_path: PathBuf, debug_enabled: bool) -> Result<Self> {
        let connection = Connection::session().context("Failed to connect to session D-Bus")?;
        let proxy = NotificationsProxyBlocking::new(&connection)
            .context("Failed to create notifications proxy")?;

        let (server, vendor, version, _) = proxy
            .get_server_information()
            .context("No notification server is running")?;
        if debug_enabled {
            log_pipe!();
            log_debug!("Using notification server {server} {version} ({vendor})");
        }

        let actions = proxy
            .receive_action_invoked()
            .context("Failed to subscribe to notification actions")?;
        let closed = proxy
            .receive_notification_closed()
            .context("Failed to subscribe to closed notifications")?;

        let pending = Arc::new(Mutex::new(PendingActions::default()));
        let listener_pending = Arc::clone(&pending);
        thread::Builder::new()
            .name("notification-actions".to_string())
            .spawn(move || {
                for signal in actions {
                    let Ok(args) = signal.args() else {
                        continue;
                    };
                    let ours = listener_pending
                        .lock()
                        .map(|mut ids| ids.take(args.id))
                        .unwrap_or(false);
                    if !ours {
                        continue;
                    }
                    if args.action_key == ActionTarget::OpenSettings.key()
                        && let Err(e) = utils::open_in_desktop(&settings_path)
                    {
                        log_pipe!();
                        log_warning!("{e:#}");
                    }
                }
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Notification action listener exiting");
                }
            })
            .context("Failed to spawn notification action listener")?;

        let closed_pending = Arc::clone(&pending);
        thread::Builder::new()
            .name("notification-closed".to_string())
            .spawn(move || {
                for signal in closed {
                    if let Ok(args) = signal.args()
                        && let Ok(mut ids) = closed_pending.lock()
                    {
                        ids.forget(args.id);
                    }
                }
            })
            .context("Failed to spawn closed notification listener")?;

        Ok(Self {
            proxy,
            pending,
            debug_enabled,
        })
    }
}

impl NotificationSink for DesktopSink {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let mut hints = HashMap::new();
        hints.insert("urgency", Value::from(urgency(notification.kind)));

        let id = self
            .proxy
            .notify(
                PACKAGE_NAME,
                0,
                "preferences-desktop-theme",
                &notification.title,
                &notification.description,
                &action_list(notification),
                hints,
                expire_timeout(notification),
            )
            .context("Failed to send desktop notification")?;

        if !notification.actions.is_empty()
            && let Ok(mut ids) = self.pending.lock()
        {
            ids.track(id);
        }

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Desktop notification #{id}: {}", notification.title);
        }
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "desktop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use std::time::Duration;

    #[test]
    fn test_action_list_pairs_keys_and_labels() {
        let notification = Notification::api_key_required();
        assert_eq!(
            action_list(&notification),
            vec!["open-settings", "Set API Key"]
        );

        let coords = Coordinates::new(1.0, 2.0).unwrap();
        assert!(action_list(&Notification::location_retrieved(coords)).is_empty());
    }

    #[test]
    fn test_expire_timeout() {
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        assert_eq!(
            expire_timeout(&Notification::location_retrieved(coords)),
            10_000
        );
        assert_eq!(expire_timeout(&Notification::api_key_required()), 0);

        let mut long = Notification::api_key_required();
        long.dismiss_after = Some(Duration::from_secs(u64::MAX / 1000));
        assert_eq!(expire_timeout(&long), i32::MAX);
    }

    #[test]
    fn test_errors_are_critical() {
        assert_eq!(urgency(NotificationKind::Error), 2);
        assert_eq!(urgency(NotificationKind::Success), 1);
    }

    #[test]
    fn test_pending_actions_take_once() {
        let mut pending = PendingActions::default();
        pending.track(7);
        assert!(pending.take(7));
        assert!(!pending.take(7));
        assert!(!pending.take(8));
    }

    #[test]
    fn test_closed_notification_is_forgotten() {
        let mut pending = PendingActions::default();
        pending.track(3);
        pending.track(4);
        pending.forget(3);
        assert_eq!(pending.len(), 1);
        assert!(!pending.take(3));
        assert!(pending.take(4));
    }

    #[test]
    fn test_pending_actions_are_bounded() {
        let mut pending = PendingActions::default();
        for id in 0..(MAX_PENDING_ACTIONS as u32 * 4) {
            pending.track(id);
        }
        assert_eq!(pending.len(), MAX_PENDING_ACTIONS);

        // The oldest ids were evicted, the newest are still answered
        assert!(!pending.take(0));
        assert!(pending.take(MAX_PENDING_ACTIONS as u32 * 4 - 1));
    }

    #[test]
    fn test_retracking_does_not_duplicate() {
        let mut pending = PendingActions::default();
        pending.track(5);
        pending.track(5);
        assert_eq!(pending.len(), 1);
    }
}
