//! Authoritative registration state.

use std::sync::Arc;

use crate::events::EventListener;

/// Listener identity: same allocation behind the `Arc`.
pub(crate) fn same_listener(a: &Arc<dyn EventListener>, b: &Arc<dyn EventListener>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Insertion-ordered, deduplicated sets of direct listeners and named
/// references. Mutated only under the registry's exclusive lock; no identity
/// or name appears twice.
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<Arc<dyn EventListener>>,
    named: Vec<String>,
}

impl ListenerSet {
    /// Add a direct listener. An already-registered identity is replaced and
    /// re-appended at the end.
    pub(crate) fn add(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners
            .retain(|existing| !same_listener(existing, &listener));
        self.listeners.push(listener);
    }

    pub(crate) fn add_named(&mut self, name: String) {
        if !self.named.contains(&name) {
            self.named.push(name);
        }
    }

    pub(crate) fn remove(&mut self, listener: &Arc<dyn EventListener>) {
        self.listeners
            .retain(|existing| !same_listener(existing, listener));
    }

    pub(crate) fn remove_named(&mut self, name: &str) {
        self.named.retain(|existing| existing != name);
    }

    /// Remove every direct listener the predicate selects.
    pub(crate) fn remove_matching(&mut self, predicate: impl Fn(&dyn EventListener) -> bool) {
        self.listeners
            .retain(|existing| !predicate(existing.as_ref()));
    }

    /// Remove every named reference the predicate selects.
    pub(crate) fn remove_named_matching(&mut self, predicate: impl Fn(&str) -> bool) {
        self.named.retain(|existing| !predicate(existing));
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
        self.named.clear();
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn named_count(&self) -> usize {
        self.named.len()
    }

    /// Both sets in insertion order.
    pub(crate) fn snapshot(&self) -> (Vec<Arc<dyn EventListener>>, Vec<String>) {
        (self.listeners.clone(), self.named.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEnvelope;

    struct Noop(i32);

    impl EventListener for Noop {
        fn on_event(&self, _event: &EventEnvelope) {}

        fn priority(&self) -> i32 {
            self.0
        }
    }

    fn listener() -> Arc<dyn EventListener> {
        Arc::new(Noop(0))
    }

    #[test]
    fn re_adding_a_listener_moves_it_to_the_end() {
        let mut set = ListenerSet::default();
        let first = listener();
        let second = listener();

        set.add(Arc::clone(&first));
        set.add(Arc::clone(&second));
        set.add(Arc::clone(&first));

        let (listeners, _) = set.snapshot();
        assert_eq!(listeners.len(), 2);
        assert!(same_listener(&listeners[0], &second));
        assert!(same_listener(&listeners[1], &first));
    }

    #[test]
    fn named_references_deduplicate_by_name() {
        let mut set = ListenerSet::default();
        set.add_named("audit".to_string());
        set.add_named("audit".to_string());
        set.add_named("metrics".to_string());

        let (_, named) = set.snapshot();
        assert_eq!(named, vec!["audit".to_string(), "metrics".to_string()]);
    }

    #[test]
    fn predicates_select_what_gets_removed() {
        let mut set = ListenerSet::default();
        let keep: Arc<dyn EventListener> = Arc::new(Noop(1));
        let doomed: Arc<dyn EventListener> = Arc::new(Noop(2));
        set.add(Arc::clone(&keep));
        set.add(Arc::clone(&doomed));
        set.add_named("audit".to_string());
        set.add_named("metrics".to_string());

        set.remove_matching(|candidate| candidate.priority() == 2);
        set.remove_named_matching(|name| name.starts_with("aud"));

        let (listeners, named) = set.snapshot();
        assert_eq!(listeners.len(), 1);
        assert!(same_listener(&listeners[0], &keep));
        assert_eq!(named, vec!["metrics".to_string()]);
    }

    #[test]
    fn clear_empties_both_sets() {
        let mut set = ListenerSet::default();
        set.add(listener());
        set.add_named("audit".to_string());

        set.clear();

        assert_eq!(set.listener_count(), 0);
        assert_eq!(set.named_count(), 0);
    }
}
