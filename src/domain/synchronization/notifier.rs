//! User-facing notifications about a running sync.

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub phase: NotificationPhase,
    pub message: String,
}

impl Notification {
    pub fn running(message: &str) -> Self {
        Self {
            phase: NotificationPhase::Running,
            message: message.to_string(),
        }
    }

    pub fn finished(message: &str) -> Self {
        Self {
            phase: NotificationPhase::Finished,
            message: message.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.phase {
            NotificationPhase::Running => "Sync Service Running",
            NotificationPhase::Finished => "Sync Service Finished",
        }
    }
}

#[cfg_attr(test, automock)]
pub trait SyncNotifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
