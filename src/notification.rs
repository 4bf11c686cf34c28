//! In-window toast notifications for fired reminders

use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::constants::reminders::TOAST_SECS;

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub shown_at: Instant,
}

pub struct NotificationManager {
    active: Vec<Toast>,
    /// Ids already shown; a toast with a repeated id is dropped
    history: HashSet<String>,
    lifetime: Duration,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(TOAST_SECS))
    }
}

impl NotificationManager {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            active: Vec::new(),
            history: HashSet::new(),
            lifetime,
        }
    }

    /// Queue a toast; returns false when `id` was already shown
    pub fn show(&mut self, title: &str, message: &str, id: Option<&str>, now: Instant) -> bool {
        if let Some(id) = id
            && !self.history.insert(id.to_string())
        {
            debug!(id, "Notification already shown");
            return false;
        }

        info!(title, message, "Showing notification");
        self.active.push(Toast {
            title: title.to_string(),
            message: message.to_string(),
            shown_at: now,
        });
        true
    }

    /// Drop toasts that have been visible longer than the lifetime
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        let lifetime = self.lifetime;
        self.active
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
        before - self.active.len()
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Toast> {
        (index < self.active.len()).then(|| self.active.remove(index))
    }

    /// Forget shown ids so the same reminder can notify again
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    /// Time until the oldest toast expires
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        self.active
            .iter()
            .map(|t| (t.shown_at + self.lifetime).saturating_duration_since(now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_are_ignored() {
        let mut manager = NotificationManager::default();
        let now = Instant::now();
        assert!(manager.show("Reminder", "Call dentist", Some("3"), now));
        assert!(!manager.show("Reminder", "Call dentist", Some("3"), now));
        assert!(manager.show("Reminder", "No id", None, now));
        assert!(manager.show("Reminder", "No id", None, now));
        assert_eq!(manager.active().len(), 3);
    }

    #[test]
    fn test_toasts_expire_after_lifetime() {
        let mut manager = NotificationManager::new(Duration::from_secs(5));
        let start = Instant::now();
        manager.show("Reminder", "first", Some("1"), start);
        manager.show("Reminder", "second", Some("2"), start + Duration::from_secs(3));

        assert_eq!(manager.expire(start + Duration::from_secs(4)), 0);
        assert_eq!(manager.expire(start + Duration::from_secs(5)), 1);
        assert_eq!(manager.active()[0].message, "second");
        assert_eq!(
            manager.next_expiry(start + Duration::from_secs(5)),
            Some(Duration::from_secs(3))
        );
        assert_eq!(manager.expire(start + Duration::from_secs(8)), 1);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn test_dismiss_and_clear_history() {
        let mut manager = NotificationManager::default();
        let now = Instant::now();
        manager.show("Reminder", "Pay rent", Some("7"), now);

        assert!(manager.dismiss(4).is_none());
        let toast = manager.dismiss(0).unwrap();
        assert_eq!(toast.message, "Pay rent");
        assert!(!manager.show("Reminder", "Pay rent", Some("7"), now));

        manager.clear_history();
        assert!(manager.show("Reminder", "Pay rent", Some("7"), now));
    }
}
