//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the attendance view
//! (publisher) and whatever renders notifications (subscriber).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use rollcall_core::types::{StudentId, Timestamp};

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient, user-facing message.
///
/// Nothing retains notifications once they are delivered; they are not
/// error state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Student the message is about, for per-row saves.
    pub student_id: Option<StudentId>,
    pub timestamp: Timestamp,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            student_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the student the message is about.
    pub fn for_student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out notification bus.
///
/// # Usage
///
/// ```rust
/// use rollcall_events::bus::{EventBus, Notification};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notification::success("Attendance saved successfully!"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed notifications are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification to all current subscribers.
    ///
    /// Dropped silently when nobody is listening.
    pub fn publish(&self, notification: Notification) {
        tracing::debug!(
            level = ?notification.level,
            message = %notification.message,
            "Publishing notification",
        );
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(Notification::error("Failed to save attendance.").for_student(3));

        let received = rx.recv().await.expect("should receive the notification");
        assert!(received.is_error());
        assert_eq!(received.message, "Failed to save attendance.");
        assert_eq!(received.student_id, Some(3));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_notification() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Notification::success("Roster unmarked/reset"));

        let n1 = rx1.recv().await.expect("subscriber 1 should receive");
        let n2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(n1.message, "Roster unmarked/reset");
        assert_eq!(n2.level, NotificationLevel::Success);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(Notification::success("orphan"));
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_value(Notification::error("x")).unwrap();
        assert_eq!(json["level"], "error");
        assert!(json["student_id"].is_null());
    }
}
