//! LRU Tracker Module
//!
//! Least-recently-used bookkeeping for the memory backend's capacity bound.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Orders keys by a monotonically increasing access tick.
///
/// The smallest tick in `by_tick` is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    by_tick: BTreeMap<u64, String>,
    ticks: HashMap<String, u64>,
    clock: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        self.clock += 1;
        if let Some(old) = self.ticks.insert(key.to_string(), self.clock) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(self.clock, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_in_access_order() {
        let mut lru = LruTracker::new();

        lru.touch("cartu1");
        lru.touch("cartu2");
        lru.touch("cartu3");
        lru.touch("cartu1");

        assert_eq!(lru.evict_oldest().as_deref(), Some("cartu2"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("cartu3"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("cartu1"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_repeated_touch_tracks_once() {
        let mut lru = LruTracker::new();

        lru.touch("cartu1");
        lru.touch("cartu1");
        lru.touch("cartu1");

        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove_forgets_key() {
        let mut lru = LruTracker::new();

        lru.touch("cartu1");
        lru.touch("cartu2");
        lru.remove("cartu1");
        lru.remove("never-seen");

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("cartu2"));
        assert!(lru.is_empty());
    }
}
