//! Two-phase listener/event compatibility checks.
//!
//! The pre-check filters named references on their static type information,
//! so type-incompatible listeners are never instantiated just to be
//! rejected. The full check runs against a live instance and is
//! authoritative.

use crate::events::{typing_of, EventListener, EventType, SourceType};
use crate::resolution::{ListenerTypeInfo, TypeIntrospector};

/// Cheap, instantiation-free filter over a named reference's static type
/// information. Returns `false` only when the declared event type is known
/// and provably incompatible. Listeners with explicit typing capability
/// always pass; the full check decides for them after resolution.
pub(crate) fn pre_check(
    declared: Option<&ListenerTypeInfo>,
    introspector: &dyn TypeIntrospector,
    event_type: &EventType,
) -> bool {
    let Some(info) = declared else {
        return true;
    };
    if info.has_explicit_typing() {
        return true;
    }
    match introspector.declared_event_type(info) {
        Some(declared_event) => declared_event.accepts(event_type),
        None => true,
    }
}

/// Authoritative check against a live listener instance. Both the event type
/// and the source type must be supported; an absent source type is vacuously
/// compatible.
pub(crate) fn full_check(
    listener: &dyn EventListener,
    event_type: &EventType,
    source_type: Option<&SourceType>,
) -> bool {
    let typing = typing_of(listener);
    typing.supports_event_type(event_type) && typing.supports_source_type(source_type)
}
