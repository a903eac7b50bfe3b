//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans enrollment events out to any number of subscribers.
//! It is shared via `Arc<EventBus>` between the admission service (the
//! publisher) and delivery tasks (the subscribers).

use chrono::Utc;
use cohort_core::types::{DbId, Timestamp};
use cohort_db::models::Enrollment;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// EnrollmentEvent
// ---------------------------------------------------------------------------

/// What happened to the enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentEventKind {
    /// A seat was taken.
    Confirmed,
    /// A seat was given back.
    Cancelled,
}

impl EnrollmentEventKind {
    /// Stable wire name, e.g. for subjects and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A committed admission-control outcome, published post-commit.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentEvent {
    pub kind: EnrollmentEventKind,
    /// The enrollment row as committed.
    pub enrollment: Enrollment,
    /// When the event was published (UTC).
    pub occurred_at: Timestamp,
}

impl EnrollmentEvent {
    /// Event for a freshly admitted enrollment.
    pub fn confirmed(enrollment: Enrollment) -> Self {
        Self {
            kind: EnrollmentEventKind::Confirmed,
            enrollment,
            occurred_at: Utc::now(),
        }
    }

    /// Event for a cancelled enrollment.
    pub fn cancelled(enrollment: Enrollment) -> Self {
        Self {
            kind: EnrollmentEventKind::Cancelled,
            enrollment,
            occurred_at: Utc::now(),
        }
    }

    /// The user the notification concerns.
    pub fn user_id(&self) -> DbId {
        self.enrollment.user_id
    }

    /// The course the notification concerns.
    pub fn course_id(&self) -> DbId {
        self.enrollment.course_id
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for [`EnrollmentEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<EnrollmentEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped — delivery is
    /// fire-and-forget from the publisher's perspective.
    pub fn publish(&self, event: EnrollmentEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EnrollmentEvent> {
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
