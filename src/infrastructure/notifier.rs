use crate::domain::Severity;
use crate::interception::ports::Notifier;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, info};

/// Writes operator notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => {
                info!(target: "prover_relay::notify", severity = %severity, "{}", message)
            }
            Severity::Error => {
                error!(target: "prover_relay::notify", severity = %severity, "{}", message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Utc>,
}

/// Keeps every notification in memory, in order
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.notifications.lock().push(Notification {
            message: message.to_string(),
            severity,
            at: Utc::now(),
        });
    }
}
