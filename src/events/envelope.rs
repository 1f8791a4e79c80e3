//! Event envelope delivered to listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{EventType, SourceType};

/// An event instance: its type, the type of the publisher that raised it
/// (when known), an arbitrary JSON payload, and the time it was raised.
///
/// The registry derives lookup keys from the envelope in
/// [`listeners_for_event`](crate::EventListenerRegistry::listeners_for_event);
/// actually invoking the selected listeners is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_type: EventType,
    source_type: Option<SourceType>,
    payload: Value,
    occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Create an envelope with no source type; source compatibility is then
    /// vacuously true for every listener.
    pub fn new(event_type: EventType, payload: Value) -> Self {
        Self {
            event_type,
            source_type: None,
            payload,
            occurred_at: Utc::now(),
        }
    }

    /// Attach the type of the publisher that raised the event.
    pub fn with_source(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn source_type(&self) -> Option<&SourceType> {
        self.source_type.as_ref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_is_absent_until_attached() {
        let plain = EventEnvelope::new(EventType::new("Tick"), json!({}));
        assert!(plain.source_type().is_none());

        let sourced = plain.with_source(SourceType::new("Scheduler"));
        assert_eq!(sourced.source_type().unwrap().name(), "Scheduler");
    }
}
