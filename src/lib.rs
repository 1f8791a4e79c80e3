#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Eventcast Core
//!
//! In-process event listener registry with cached, type-filtered listener
//! selection.
//!
//! ## Overview
//!
//! [`EventListenerRegistry`] holds a set of event listeners (direct
//! instances and lazily resolved named references) and answers "which
//! listeners are eligible for this (event type, source type) pair, and in
//! what order". The filtered, ordered answer for each pair is cached so
//! repeated dispatches of the same event shape avoid recomputation; every
//! mutation of the registered set invalidates the whole cache atomically.
//!
//! Fan-out, meaning actually invoking the selected listeners, is
//! deliberately left to the caller. The registry selects and orders, nothing
//! more, so delivery, retry, and error policies stay where they belong.
//!
//! ## Key Features
//!
//! - **Two-phase type matching**: a cheap pre-check filters named references
//!   before they are instantiated; an authoritative full check runs against
//!   live instances.
//! - **Race-safe caching**: lock-free cache reads with insert-if-absent
//!   population; concurrent racers recompute redundantly without corrupting
//!   the winning entry.
//! - **Identity-cache split**: singleton-resolvable listeners are cached by
//!   identity, non-singleton named references are re-resolved on every read.
//! - **Coarse invalidation**: any registration change clears the whole cache
//!   inside the mutation's critical section.
//!
//! ## Module Organization
//!
//! - [`events`] - Event/source descriptors, envelopes, and the listener traits
//! - [`registry`] - The registry, its cache, and the type matcher
//! - [`resolution`] - Named-listener resolver and type-introspection boundaries
//! - [`ordering`] - Listener ordering comparator
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use eventcast_core::{EventEnvelope, EventListener, EventListenerRegistry, EventType};
//!
//! struct AuditLog;
//!
//! impl EventListener for AuditLog {
//!     fn on_event(&self, _event: &EventEnvelope) {}
//!     fn declared_event_type(&self) -> Option<EventType> {
//!         Some(EventType::new("OrderPlaced"))
//!     }
//! }
//!
//! # fn main() -> eventcast_core::Result<()> {
//! let registry = EventListenerRegistry::new();
//! registry.add_listener(Arc::new(AuditLog));
//!
//! let listeners = registry.listeners_for(&EventType::new("OrderPlaced"), None)?;
//! assert_eq!(listeners.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod ordering;
pub mod registry;
pub mod resolution;

// Re-export key types for convenience
pub use error::{RegistryError, Result};
pub use events::{
    EventEnvelope, EventListener, EventType, ListenerTyping, SourceType, TypedEventListener,
};
pub use ordering::{ListenerComparator, PriorityOrdering};
pub use registry::{
    AlwaysCacheSafe, CacheSafety, EventListenerRegistry, ListenerCacheKey, RegistryStats,
};
pub use resolution::{
    ListenerTypeInfo, NamedListenerResolver, NoIntrospection, ResolveError, TypeIntrospector,
};
