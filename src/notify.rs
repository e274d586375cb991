//! @acp:module "Notifications"
//! @acp:summary "User-visible notification sink for recoverable engine problems"
//! @acp:domain scoring
//! @acp:layer service

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// @acp:summary "Severity of a notification"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Sink the engine reports recoverable problems to
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Forwards notifications to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(title, "{}", message),
            Severity::Warning => tracing::warn!(title, "{}", message),
            Severity::Error => tracing::error!(title, "{}", message),
        }
    }
}

/// @acp:summary "A delivered notification"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub at: DateTime<Utc>,
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    items: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *items)
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_notifier_take_drains() {
        let notifier = CollectingNotifier::new();
        notifier.notify("Weights", "total strength is zero", Severity::Warning);
        assert_eq!(notifier.len(), 1);

        let items = notifier.take();
        assert_eq!(items[0].title, "Weights");
        assert_eq!(items[0].severity, Severity::Warning);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
