use log::info;

use crate::domain::synchronization::notifier::{Notification, SyncNotifier};

/// Writes notifications to the log. Used when the host has no notification
/// surface of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl SyncNotifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        info!("[{}] {}", notification.title(), notification.message);
    }
}
