use std::sync::Mutex;
use tracing::warn;

/// Shows blocking, user-facing alerts
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Logs alerts at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        warn!("ALERT: {}", message);
    }
}

/// Keeps every alert it is shown, in order
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for CollectingNotifier {
    fn alert(&self, message: &str) {
        warn!("ALERT: {}", message);
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
