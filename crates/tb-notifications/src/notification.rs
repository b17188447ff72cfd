//! Notification record
//!
//! Table: notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::Id;

/// A notification in a user's inbox.
///
/// The read state is monotonic: once `read_at` is set it never reverts, and
/// re-marking an already-read notification is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Option<Id>,
    /// Recipient
    pub user_id: Id,
    /// Related ticket, if any
    pub ticket_id: Option<Id>,
    /// Human-readable message
    pub message: String,
    /// Free-form payload (deep links and the like)
    #[serde(default)]
    pub data: serde_json::Value,
    /// When the notification was read; `None` = unread
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new unread notification
    pub fn new(user_id: Id, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user_id,
            ticket_id: None,
            message: message.into(),
            data: serde_json::Value::Null,
            read_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a related ticket (also recorded in the payload for deep links)
    pub fn with_ticket(mut self, ticket_id: Id) -> Self {
        self.ticket_id = Some(ticket_id);
        self.data = serde_json::json!({ "ticket_id": ticket_id });
        self
    }

    /// Attach an arbitrary payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    /// Mark as read. Returns whether the state changed; marking an
    /// already-read notification leaves `read_at` untouched.
    pub fn mark_read(&mut self) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(Utc::now());
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let notification = Notification::new(1, "Ticket Updated").with_ticket(42);
        assert!(notification.is_unread());
        assert_eq!(notification.ticket_id, Some(42));
        assert_eq!(notification.data["ticket_id"], 42);
    }

    #[test]
    fn test_mark_read_is_monotonic() {
        let mut notification = Notification::new(1, "Ticket Updated");

        assert!(notification.mark_read());
        let first_read_at = notification.read_at;

        // Second mark is a no-op and keeps the original timestamp.
        assert!(!notification.mark_read());
        assert_eq!(notification.read_at, first_read_at);
    }
}
