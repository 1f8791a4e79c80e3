//! Cache key for filtered listener lookups.

use std::cmp::Ordering;
use std::fmt;

use crate::events::{EventType, SourceType};

/// Immutable key identifying an (event type, source type) lookup shape.
///
/// Equality is structural on the event type and nominal on the source type.
/// The total order (event-type textual form, then source-type name, with an
/// absent source sorting first) exists for deterministic enumeration and
/// debugging, not for correctness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerCacheKey {
    event_type: EventType,
    source_type: Option<SourceType>,
}

impl ListenerCacheKey {
    pub fn new(event_type: EventType, source_type: Option<SourceType>) -> Self {
        Self {
            event_type,
            source_type,
        }
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn source_type(&self) -> Option<&SourceType> {
        self.source_type.as_ref()
    }
}

impl fmt::Display for ListenerCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_type {
            Some(source) => write!(f, "{} from {}", self.event_type, source),
            None => write!(f, "{}", self.event_type),
        }
    }
}

impl Ord for ListenerCacheKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event_type
            .to_string()
            .cmp(&other.event_type.to_string())
            .then_with(|| match (&self.source_type, &other.source_type) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.name().cmp(b.name()),
            })
            // Textual forms can collide; the structural order keeps the
            // total order consistent with equality.
            .then_with(|| self.event_type.cmp(&other.event_type))
            .then_with(|| self.source_type.cmp(&other.source_type))
    }
}

impl PartialOrd for ListenerCacheKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Decides whether an (event type, source type) pair is stable enough under
/// the host's type-identity rules to serve as a long-lived cache key.
/// Lookups on unsafe keys are recomputed on every call.
pub trait CacheSafety: Send + Sync {
    fn is_cache_safe(&self, event_type: &EventType, source_type: Option<&SourceType>) -> bool;
}

/// Every key is cache-safe. The right default for hosts without throwaway
/// type scopes.
#[derive(Debug, Default)]
pub struct AlwaysCacheSafe;

impl CacheSafety for AlwaysCacheSafe {
    fn is_cache_safe(&self, _event_type: &EventType, _source_type: Option<&SourceType>) -> bool {
        true
    }
}
