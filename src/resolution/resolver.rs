//! Boundary to the external named-listener service.
//!
//! Named references register a logical name only; the instance behind the
//! name is produced by a [`NamedListenerResolver`] at lookup time. A backing
//! definition can disappear mid-teardown, which the registry treats as an
//! expected race rather than an error.

use std::sync::Arc;

use crate::events::EventListener;

/// Why a named listener could not be produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// The backing definition is gone. Expected during concurrent teardown;
    /// callers exclude the name silently.
    #[error("no listener definition registered under '{0}'")]
    NotFound(String),

    /// The definition exists but the instance could not be produced.
    #[error("listener '{name}' failed to instantiate: {reason}")]
    Instantiation { name: String, reason: String },
}

/// Static type information a resolver can report for a named listener
/// without instantiating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerTypeInfo {
    type_name: String,
    explicit_typing: bool,
}

impl ListenerTypeInfo {
    /// Type information for a listener matched through its declared event
    /// type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            explicit_typing: false,
        }
    }

    /// Type information for a listener with explicit typing capability.
    /// Static introspection is unreliable for these, so the pre-check always
    /// admits them and the full check decides after resolution.
    pub fn explicit(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            explicit_typing: true,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn has_explicit_typing(&self) -> bool {
        self.explicit_typing
    }
}

/// Resolves logical listener names to live instances.
pub trait NamedListenerResolver: Send + Sync {
    /// Produce the instance behind `name`.
    fn resolve(&self, name: &str) -> Result<Arc<dyn EventListener>, ResolveError>;

    /// Whether `name` resolves to the same identity on every call. Only
    /// singleton references may be cached by identity.
    fn is_singleton(&self, name: &str) -> bool;

    /// Static type information for `name`, if the resolver knows it.
    fn declared_type(&self, name: &str) -> Option<ListenerTypeInfo>;

    /// An already-materialized instance for `name`, obtained without
    /// instantiating anything. Used to retract a stale admission once the
    /// declared type stops matching; the default opts out of retraction.
    fn live_instance(&self, _name: &str) -> Option<Arc<dyn EventListener>> {
        None
    }
}
