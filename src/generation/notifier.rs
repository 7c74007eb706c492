use crate::models::{Notification, NotificationKind};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Older entries are dropped once the history holds this many.
pub const HISTORY_LIMIT: usize = 32;

/// Collects the status messages emitted by the session. Info and success
/// messages fade after `ttl`; errors stay until something newer arrives.
#[derive(Debug, Clone)]
pub struct Notifier {
    history: Arc<Mutex<Vec<Notification>>>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            history: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    pub fn emit(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => log::error!("{}", notification.message),
            _ => log::info!("{}", notification.message),
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(notification);
            if history.len() > HISTORY_LIMIT {
                let excess = history.len() - HISTORY_LIMIT;
                history.drain(..excess);
            }
        }
    }

    pub fn active(&self) -> Option<Notification> {
        self.active_at(Utc::now())
    }

    pub fn active_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        let history = self.history.lock().ok()?;
        let latest = history.last()?;
        if latest.expires() {
            let age = (now - latest.created_at).to_std().unwrap_or(Duration::ZERO);
            if age >= self.ttl {
                return None;
            }
        }
        Some(latest.clone())
    }

    pub fn history(&self) -> Vec<Notification> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}
