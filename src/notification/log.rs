//! Notifications printed to the terminal log.

use anyhow::Result;

use super::{Notification, NotificationKind, NotificationSink};

/// Prints notifications with the regular logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: &Notification) -> Result<()> {
        log_pipe!();
        match notification.kind {
            NotificationKind::Info | NotificationKind::Success => {
                log_info!("{}", notification.title)
            }
            NotificationKind::Warning => log_warning!("{}", notification.title),
            NotificationKind::Error => log_error!("{}", notification.title),
        }
        for line in notification.description.lines().filter(|l| !l.trim().is_empty()) {
            log_indented!("{line}");
        }
        for action in &notification.actions {
            log_indented!("→ {}: edit the configuration file", action.label);
        }
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "log"
    }
}
