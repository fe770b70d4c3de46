//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`LearnerEvent`]s. The
//! analysis pipeline publishes; the notification/UI layer (outside this
//! workspace) subscribes. Designed to be shared via `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use parlo_core::types::DbId;

// ---------------------------------------------------------------------------
// LearnerEvent
// ---------------------------------------------------------------------------

/// Event type published when an insight row is created.
pub const EVENT_INSIGHT_CREATED: &str = "insight.created";

/// Event type published when a learner's proficiency level changes.
pub const EVENT_PROFICIENCY_ADVANCED: &str = "proficiency.advanced";

/// A domain event tied to one learner.
///
/// Constructed via [`LearnerEvent::new`] and enriched with
/// [`with_session`](LearnerEvent::with_session) and
/// [`with_payload`](LearnerEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerEvent {
    /// Dot-separated event name, e.g. `"insight.created"`.
    pub event_type: String,

    /// The learner this event concerns.
    pub learner_id: DbId,

    /// Originating chat session, when the event is session-scoped.
    pub session_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LearnerEvent {
    /// Create a new event with the required type and learner.
    pub fn new(event_type: impl Into<String>, learner_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            learner_id,
            session_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the originating session.
    pub fn with_session(mut self, session_id: DbId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`LearnerEvent`].
pub struct EventBus {
    sender: broadcast::Sender<LearnerEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// insights are already persisted, so nothing is lost.
    pub fn publish(&self, event: LearnerEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<LearnerEvent> {
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

        let event = LearnerEvent::new(EVENT_INSIGHT_CREATED, 42)
            .with_session(7)
            .with_payload(serde_json::json!({"category": "grammar_pattern"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_INSIGHT_CREATED);
        assert_eq!(received.learner_id, 42);
        assert_eq!(received.session_id, Some(7));
        assert_eq!(received.payload["category"], "grammar_pattern");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(LearnerEvent::new(EVENT_PROFICIENCY_ADVANCED, 1));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, EVENT_PROFICIENCY_ADVANCED);
        assert_eq!(e2.event_type, EVENT_PROFICIENCY_ADVANCED);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers: this must not panic.
        bus.publish(LearnerEvent::new("orphan.event", 9));
    }

    #[test]
    fn new_event_has_empty_optional_fields() {
        let event = LearnerEvent::new("bare.event", 3);
        assert_eq!(event.event_type, "bare.event");
        assert_eq!(event.learner_id, 3);
        assert!(event.session_id.is_none());
        assert!(event.payload.is_object());
    }
}
