//! Lazily populated per-key listener snapshot.

use std::sync::{Arc, OnceLock};

use crate::events::EventListener;

/// Filtered sets computed for one cache key.
pub(crate) struct PopulatedListeners {
    /// Identity-cacheable hits: direct listeners plus singleton-resolvable
    /// named hits. Already sorted when `named` is empty.
    pub(crate) listeners: Vec<Arc<dyn EventListener>>,
    /// Non-singleton named hits, re-resolved on every read.
    pub(crate) named: Vec<String>,
}

/// Per-key cache entry. A miss until populated; populated at most once per
/// cache epoch and never mutated afterwards.
#[derive(Default)]
pub(crate) struct CachedRetriever {
    populated: OnceLock<PopulatedListeners>,
}

impl CachedRetriever {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self) -> Option<&PopulatedListeners> {
        self.populated.get()
    }

    /// Publish both filtered sets. Only the insert-if-absent winner calls
    /// this; a redundant call on an already-populated entry is a no-op.
    pub(crate) fn populate(&self, listeners: Vec<Arc<dyn EventListener>>, named: Vec<String>) {
        let _ = self.populated.set(PopulatedListeners { listeners, named });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEnvelope;

    struct Noop;

    impl EventListener for Noop {
        fn on_event(&self, _event: &EventEnvelope) {}
    }

    #[test]
    fn unpopulated_entries_read_as_misses() {
        let entry = CachedRetriever::new();
        assert!(entry.get().is_none());
    }

    #[test]
    fn population_is_first_writer_wins() {
        let entry = CachedRetriever::new();
        entry.populate(vec![Arc::new(Noop)], vec![]);
        entry.populate(vec![], vec!["late".to_string()]);

        let populated = entry.get().unwrap();
        assert_eq!(populated.listeners.len(), 1);
        assert!(populated.named.is_empty());
    }
}
