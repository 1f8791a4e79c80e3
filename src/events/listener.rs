//! Listener capability and the typing adapter used for matching.
//!
//! A listener either reports its type support itself
//! ([`TypedEventListener`]) or has it inferred from its declared event type.
//! Both forms sit behind one interface, [`ListenerTyping`], so the matching
//! code never branches on the listener's concrete shape.

use super::envelope::EventEnvelope;
use super::types::{EventType, SourceType};

/// Capability notified when a matching event occurs.
///
/// Listener identity is `Arc` identity: the registry deduplicates and
/// removes via [`std::sync::Arc::ptr_eq`], so clones of one `Arc` refer to
/// the same registration.
pub trait EventListener: Send + Sync {
    /// Handle an event previously selected for this listener.
    fn on_event(&self, event: &EventEnvelope);

    /// Event type this listener declares interest in, when it can be stated
    /// statically. `None` means unknown, which the matcher treats
    /// optimistically.
    fn declared_event_type(&self) -> Option<EventType> {
        None
    }

    /// Priority metadata consumed by the default ordering; lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Explicit typing capability, for listeners that self-report type
    /// support instead of relying on their declaration.
    fn as_typed(&self) -> Option<&dyn TypedEventListener> {
        None
    }
}

/// Listener that decides type support itself rather than through its
/// declared event type. Implementors also override
/// [`EventListener::as_typed`] to return `Some(self)`.
pub trait TypedEventListener: EventListener {
    fn supports_event_type(&self, event_type: &EventType) -> bool;

    fn supports_source_type(&self, source_type: Option<&SourceType>) -> bool;
}

/// Matching capability of a listener: self-reported or inferred from its
/// declaration.
pub enum ListenerTyping<'a> {
    /// The listener answers type queries directly.
    Explicit(&'a dyn TypedEventListener),
    /// Declared event type, when the listener states one.
    Inferred(Option<EventType>),
}

impl ListenerTyping<'_> {
    pub fn supports_event_type(&self, event_type: &EventType) -> bool {
        match self {
            Self::Explicit(listener) => listener.supports_event_type(event_type),
            Self::Inferred(declared) => declared
                .as_ref()
                .map_or(true, |declared| declared.accepts(event_type)),
        }
    }

    /// Inferred listeners carry no source declaration; source compatibility
    /// is vacuously true for them.
    pub fn supports_source_type(&self, source_type: Option<&SourceType>) -> bool {
        match self {
            Self::Explicit(listener) => listener.supports_source_type(source_type),
            Self::Inferred(_) => true,
        }
    }
}

/// Adapt a listener into the common typing interface.
pub fn typing_of(listener: &dyn EventListener) -> ListenerTyping<'_> {
    match listener.as_typed() {
        Some(typed) => ListenerTyping::Explicit(typed),
        None => ListenerTyping::Inferred(listener.declared_event_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Declared(Option<EventType>);

    impl EventListener for Declared {
        fn on_event(&self, _event: &EventEnvelope) {}

        fn declared_event_type(&self) -> Option<EventType> {
            self.0.clone()
        }
    }

    struct SelfReporting;

    impl EventListener for SelfReporting {
        fn on_event(&self, _event: &EventEnvelope) {}

        fn as_typed(&self) -> Option<&dyn TypedEventListener> {
            Some(self)
        }
    }

    impl TypedEventListener for SelfReporting {
        fn supports_event_type(&self, event_type: &EventType) -> bool {
            event_type.name() == "Allowed"
        }

        fn supports_source_type(&self, source_type: Option<&SourceType>) -> bool {
            source_type.is_none()
        }
    }

    #[test]
    fn inferred_typing_is_optimistic_without_a_declaration() {
        let listener = Declared(None);
        let typing = typing_of(&listener);

        assert!(typing.supports_event_type(&EventType::new("Anything")));
        assert!(typing.supports_source_type(Some(&SourceType::new("Anywhere"))));
    }

    #[test]
    fn inferred_typing_compares_the_declared_type() {
        let listener = Declared(Some(EventType::new("OrderCreated")));
        let typing = typing_of(&listener);

        assert!(typing.supports_event_type(&EventType::new("OrderCreated")));
        assert!(!typing.supports_event_type(&EventType::new("OrderShipped")));
    }

    #[test]
    fn explicit_typing_is_consulted_directly() {
        let listener = SelfReporting;
        let typing = typing_of(&listener);

        assert!(typing.supports_event_type(&EventType::new("Allowed")));
        assert!(!typing.supports_event_type(&EventType::new("Denied")));
        assert!(!typing.supports_source_type(Some(&SourceType::new("Cli"))));
    }
}
