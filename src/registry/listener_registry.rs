//! # Event Listener Registry
//!
//! The resolver at the heart of the crate: authoritative listener
//! registration plus cached, type-filtered listener selection.
//!
//! ## Overview
//!
//! Callers ask for the listeners eligible for an (event type, source type)
//! pair. On a cache hit the filtered, ordered result is rebuilt from the
//! cached snapshot without touching the registration lock; on a miss the
//! registry snapshots its state, runs the two-phase type checks, sorts, and
//! installs the result for the next caller.
//!
//! ## Key Features
//!
//! - **Race-safe population**: a placeholder entry is installed with
//!   insert-if-absent semantics; concurrent racers recompute redundantly but
//!   only the winner populates.
//! - **Coarse invalidation**: every mutation clears the whole cache inside
//!   its critical section, so a lookup that starts after a mutation
//!   completes never observes stale entries.
//! - **Identity-cache split**: direct and singleton-named hits are cached by
//!   identity; non-singleton names are cached by name and re-resolved on
//!   every read.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use eventcast_core::{EventEnvelope, EventListener, EventListenerRegistry, EventType};
//!
//! struct OrderAudit;
//!
//! impl EventListener for OrderAudit {
//!     fn on_event(&self, _event: &EventEnvelope) {}
//!     fn declared_event_type(&self) -> Option<EventType> {
//!         Some(EventType::new("OrderPlaced"))
//!     }
//! }
//!
//! # fn main() -> eventcast_core::Result<()> {
//! let registry = EventListenerRegistry::new();
//! registry.add_listener(Arc::new(OrderAudit));
//!
//! let selected = registry.listeners_for(&EventType::new("OrderPlaced"), None)?;
//! assert_eq!(selected.len(), 1);
//! let skipped = registry.listeners_for(&EventType::new("OrderShipped"), None)?;
//! assert!(skipped.is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::events::{EventEnvelope, EventListener, EventType, SourceType};
use crate::ordering::{ListenerComparator, PriorityOrdering};
use crate::resolution::{NamedListenerResolver, NoIntrospection, ResolveError, TypeIntrospector};

use super::cache_key::{AlwaysCacheSafe, CacheSafety, ListenerCacheKey};
use super::cached::CachedRetriever;
use super::listener_set::{same_listener, ListenerSet};
use super::matcher;

/// Counts of registered and cached state, for monitoring and debugging.
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub direct_listeners: usize,
    pub named_references: usize,
    /// Cached lookup keys in their deterministic order.
    pub cached_keys: Vec<String>,
}

/// Registry of event listeners with cached, type-filtered selection.
///
/// Selection and ordering only; invoking the selected listeners is the
/// caller's job.
pub struct EventListenerRegistry {
    /// Authoritative registration state; the single writer-exclusion lock.
    registered: Mutex<ListenerSet>,
    /// Per-key filtered snapshots; cleared wholesale on every mutation.
    cache: DashMap<ListenerCacheKey, Arc<CachedRetriever>>,
    resolver: Option<Arc<dyn NamedListenerResolver>>,
    introspector: Arc<dyn TypeIntrospector>,
    ordering: Arc<dyn ListenerComparator>,
    cache_safety: Arc<dyn CacheSafety>,
}

impl Default for EventListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListenerRegistry {
    /// Create a registry without a named-listener resolver. Named references
    /// can still be registered, but any lookup that needs them fails with
    /// [`RegistryError::ResolverNotConfigured`].
    pub fn new() -> Self {
        Self {
            registered: Mutex::new(ListenerSet::default()),
            cache: DashMap::new(),
            resolver: None,
            introspector: Arc::new(NoIntrospection),
            ordering: Arc::new(PriorityOrdering),
            cache_safety: Arc::new(AlwaysCacheSafe),
        }
    }

    /// Create a registry backed by a named-listener resolver.
    pub fn with_resolver(resolver: Arc<dyn NamedListenerResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::new()
        }
    }

    /// Replace the declared-type introspector consulted by the pre-check.
    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = introspector;
        self
    }

    /// Replace the ordering comparator.
    pub fn with_ordering(mut self, ordering: Arc<dyn ListenerComparator>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Replace the cache-safety policy.
    pub fn with_cache_safety(mut self, cache_safety: Arc<dyn CacheSafety>) -> Self {
        self.cache_safety = cache_safety;
        self
    }

    /// Register a direct listener. Re-registering the same identity replaces
    /// the old entry and re-appends it at the end.
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        let mut registered = self.registered.lock();
        registered.add(listener);
        info!(total = registered.listener_count(), "registered event listener");
        self.cache.clear();
    }

    /// Register a listener by logical name, resolved at lookup time.
    pub fn add_listener_by_name(&self, name: impl Into<String>) {
        let name = name.into();
        let mut registered = self.registered.lock();
        registered.add_named(name.clone());
        info!(listener = %name, "registered named event listener");
        self.cache.clear();
    }

    /// Remove a direct listener by identity.
    pub fn remove_listener(&self, listener: &Arc<dyn EventListener>) {
        let mut registered = self.registered.lock();
        registered.remove(listener);
        self.cache.clear();
    }

    /// Remove a named reference.
    pub fn remove_listener_by_name(&self, name: &str) {
        let mut registered = self.registered.lock();
        registered.remove_named(name);
        info!(listener = %name, "removed named event listener");
        self.cache.clear();
    }

    /// Remove every direct listener the predicate selects.
    pub fn remove_listeners_matching(&self, predicate: impl Fn(&dyn EventListener) -> bool) {
        let mut registered = self.registered.lock();
        registered.remove_matching(predicate);
        self.cache.clear();
    }

    /// Remove every named reference the predicate selects.
    pub fn remove_listener_names_matching(&self, predicate: impl Fn(&str) -> bool) {
        let mut registered = self.registered.lock();
        registered.remove_named_matching(predicate);
        self.cache.clear();
    }

    /// Drop all registrations and cached state.
    pub fn remove_all(&self) {
        let mut registered = self.registered.lock();
        registered.clear();
        info!("cleared event listener registry");
        self.cache.clear();
    }

    /// All registered listeners, resolved eagerly and sorted. Named
    /// references whose backing definition has vanished are omitted. No
    /// caching: there is no event shape to cache under.
    pub fn listeners(&self) -> Result<Vec<Arc<dyn EventListener>>> {
        let (direct, named) = self.registered.lock().snapshot();
        let mut all = direct;
        if !named.is_empty() {
            let resolver = self.resolver()?;
            for name in &named {
                match resolver.resolve(name) {
                    Ok(listener) => {
                        if !all.iter().any(|existing| same_listener(existing, &listener)) {
                            all.push(listener);
                        }
                    }
                    Err(ResolveError::NotFound(_)) => {
                        debug!(listener = %name, "named listener vanished; skipping");
                    }
                    Err(source) => {
                        return Err(RegistryError::Resolution {
                            name: name.clone(),
                            source,
                        });
                    }
                }
            }
        }
        self.sort(&mut all);
        Ok(all)
    }

    /// Listeners eligible for an event of `event_type` raised by a source of
    /// `source_type`, in priority order.
    pub fn listeners_for(
        &self,
        event_type: &EventType,
        source_type: Option<&SourceType>,
    ) -> Result<Vec<Arc<dyn EventListener>>> {
        let cache_key = ListenerCacheKey::new(event_type.clone(), source_type.cloned());

        // Quick check for an existing entry.
        let mut existing = self
            .cache
            .get(&cache_key)
            .map(|entry| Arc::clone(entry.value()));

        // Placeholder this call owns and must populate, if it wins the
        // insert-if-absent race on a cache-safe key.
        let mut owned = None;
        if existing.is_none() && self.cache_safety.is_cache_safe(event_type, source_type) {
            match self.cache.entry(cache_key) {
                Entry::Occupied(entry) => existing = Some(Arc::clone(entry.get())),
                Entry::Vacant(entry) => {
                    let fresh = Arc::new(CachedRetriever::new());
                    entry.insert(Arc::clone(&fresh));
                    owned = Some(fresh);
                }
            }
        }

        if let Some(retriever) = existing {
            if let Some(result) = self.resolve_cached(&retriever)? {
                debug!(event_type = %event_type, "listener cache hit");
                return Ok(result);
            }
            // Another caller holds the placeholder but has not populated it
            // yet; recompute without populating.
        }

        self.retrieve_listeners(event_type, source_type, owned.as_deref())
    }

    /// Listeners eligible for a concrete event, deriving the source type
    /// from the envelope.
    pub fn listeners_for_event(&self, event: &EventEnvelope) -> Result<Vec<Arc<dyn EventListener>>> {
        self.listeners_for(event.event_type(), event.source_type())
    }

    /// Registration and cache counts, with cached keys in their
    /// deterministic order.
    pub fn stats(&self) -> RegistryStats {
        let (direct_listeners, named_references) = {
            let registered = self.registered.lock();
            (registered.listener_count(), registered.named_count())
        };
        let mut keys: Vec<ListenerCacheKey> = self
            .cache
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        RegistryStats {
            direct_listeners,
            named_references,
            cached_keys: keys.iter().map(ToString::to_string).collect(),
        }
    }

    /// Rebuild the concrete listener list from a populated cache entry:
    /// identity-cached listeners as-is, non-singleton names re-resolved now.
    /// `None` when the entry is not populated yet.
    fn resolve_cached(
        &self,
        retriever: &CachedRetriever,
    ) -> Result<Option<Vec<Arc<dyn EventListener>>>> {
        let Some(populated) = retriever.get() else {
            return Ok(None);
        };
        let mut all = populated.listeners.clone();
        if !populated.named.is_empty() {
            let resolver = self.resolver()?;
            for name in &populated.named {
                match resolver.resolve(name) {
                    Ok(listener) => all.push(listener),
                    Err(ResolveError::NotFound(_)) => {
                        debug!(listener = %name, "named listener vanished; skipping");
                    }
                    Err(source) => {
                        return Err(RegistryError::Resolution {
                            name: name.clone(),
                            source,
                        });
                    }
                }
            }
            // The stored listener set is unsorted when names are present.
            self.sort(&mut all);
        }
        Ok(Some(all))
    }

    /// Compute the filtered, ordered listener list from the current
    /// registration state. When `retriever` is present this call owns the
    /// placeholder and populates it with the filtered sets.
    fn retrieve_listeners(
        &self,
        event_type: &EventType,
        source_type: Option<&SourceType>,
        retriever: Option<&CachedRetriever>,
    ) -> Result<Vec<Arc<dyn EventListener>>> {
        let mut all: Vec<Arc<dyn EventListener>> = Vec::new();
        let mut filtered: Vec<Arc<dyn EventListener>> = Vec::new();
        let mut filtered_named: Vec<String> = Vec::new();

        // Snapshot under the lock; matching and resolution run outside it.
        let (direct, named) = self.registered.lock().snapshot();

        for listener in direct {
            if matcher::full_check(listener.as_ref(), event_type, source_type) {
                if retriever.is_some() {
                    filtered.push(Arc::clone(&listener));
                }
                all.push(listener);
            }
        }

        if !named.is_empty() {
            let resolver = self.resolver()?;
            for name in &named {
                let declared = resolver.declared_type(name);
                if matcher::pre_check(declared.as_ref(), self.introspector.as_ref(), event_type) {
                    match resolver.resolve(name) {
                        Ok(listener) => {
                            let duplicate =
                                all.iter().any(|existing| same_listener(existing, &listener));
                            if !duplicate
                                && matcher::full_check(listener.as_ref(), event_type, source_type)
                            {
                                if retriever.is_some() {
                                    if resolver.is_singleton(name) {
                                        filtered.push(Arc::clone(&listener));
                                    } else {
                                        filtered_named.push(name.clone());
                                    }
                                }
                                all.push(listener);
                            }
                        }
                        Err(ResolveError::NotFound(_)) => {
                            debug!(listener = %name, "named listener vanished; skipping");
                        }
                        Err(source) => {
                            return Err(RegistryError::Resolution {
                                name: name.clone(),
                                source,
                            });
                        }
                    }
                } else if let Some(live) = resolver.live_instance(name) {
                    // The declared type no longer matches; retract any
                    // admission of the live instance, cached or pending.
                    debug!(listener = %name, "declared type no longer matches; retracting");
                    filtered.retain(|existing| !same_listener(existing, &live));
                    all.retain(|existing| !same_listener(existing, &live));
                }
            }
        }

        self.sort(&mut all);
        if let Some(retriever) = retriever {
            if filtered_named.is_empty() {
                // Every hit is identity-cacheable; store the sorted result
                // so cache hits skip re-sorting.
                retriever.populate(all.clone(), filtered_named);
            } else {
                retriever.populate(filtered, filtered_named);
            }
            debug!(event_type = %event_type, "populated listener cache entry");
        }
        Ok(all)
    }

    fn resolver(&self) -> Result<&Arc<dyn NamedListenerResolver>> {
        self.resolver
            .as_ref()
            .ok_or(RegistryError::ResolverNotConfigured)
    }

    fn sort(&self, listeners: &mut [Arc<dyn EventListener>]) {
        listeners.sort_by(|a, b| self.ordering.compare(a.as_ref(), b.as_ref()));
    }
}
