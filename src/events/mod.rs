//! Domain events and activity logging.
//!
//! Authorization-relevant mutations (status transitions, department-head
//! changes) are published on a broadcast bus as JSON payloads. The bus is
//! the seam where collaborators hang notification delivery or an audit
//! projection; the crate itself ships a listener that drains events into
//! structured tracing output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

mod loggable;
pub use loggable::{Loggable, Severity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent<T> {
    pub id: Uuid,
    pub name: &'static str,
    pub occurred_at: DateTime<Utc>,
    pub actor_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub payload: T,
}

impl<T> DomainEvent<T> {
    pub fn new(
        name: &'static str,
        actor_id: Option<Uuid>,
        subject_id: Option<Uuid>,
        payload: T,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            occurred_at: Utc::now(),
            actor_id,
            subject_id,
            payload,
        }
    }
}

pub type EventBus = broadcast::Sender<Value>;

pub fn init_event_bus() -> (EventBus, broadcast::Receiver<Value>) {
    broadcast::channel(1024)
}

/// Structured activity payload with old/new state tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPayload {
    /// The current/new state of the entity
    #[serde(rename = "new")]
    pub current: Value,
    /// The previous state (for update/transition operations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// Severity level for retention policy
    pub severity: Severity,
}

/// Log an activity event for any entity implementing `Loggable`.
pub fn log_activity<T: Loggable>(
    event_bus: &EventBus,
    action: &str,
    actor_id: Option<Uuid>,
    entity: &T,
) {
    log_activity_with_old(event_bus, action, actor_id, entity, None);
}

/// Activity logging with old/new tracking for updates and transitions.
pub fn log_activity_with_old<T: Loggable>(
    event_bus: &EventBus,
    action: &str,
    actor_id: Option<Uuid>,
    entity: &T,
    old_entity: Option<&T>,
) {
    // Build event name like "task.transitioned"
    let event_name = format!("{}.{}", T::entity_type(), action);

    // We need a 'static lifetime for name, so we leak the string.
    // Acceptable because event names are a small, bounded set.
    let static_name: &'static str = Box::leak(event_name.into_boxed_str());

    let severity = entity.severity_for_action(action);
    let payload = ActivityPayload {
        current: serde_json::to_value(entity).unwrap_or_default(),
        old: old_entity.map(|e| serde_json::to_value(e).unwrap_or_default()),
        severity,
    };

    let event = DomainEvent::new(
        static_name,
        actor_id,
        Some(entity.subject_id()),
        serde_json::to_value(&payload).unwrap_or_default(),
    );

    // Fire and forget. A full or closed bus must not break the caller.
    let _ = event_bus.send(serde_json::to_value(event).unwrap_or_default());
}

/// Drain the event bus into structured tracing output. Collaborators that
/// need persistence or push delivery subscribe their own receiver instead.
pub async fn start_activity_listener(mut rx: broadcast::Receiver<Value>) {
    tracing::info!("activity listener started");
    while let Ok(event) = rx.recv().await {
        let name = event
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let actor = event.get("actor_id").and_then(|v| v.as_str());
        let subject = event.get("subject_id").and_then(|v| v.as_str());
        let severity = event
            .get("payload")
            .and_then(|p| p.get("severity"))
            .and_then(|s| s.as_str())
            .unwrap_or("important");

        tracing::info!(
            event = %name,
            actor = actor.unwrap_or("-"),
            subject = subject.unwrap_or("-"),
            severity = %severity,
            "activity"
        );
    }
}
