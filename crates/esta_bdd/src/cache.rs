//! The `xfunc` memoization cache (spec §4.5.2).
//!
//! "Cache capacity is configurable; on overflow the cache evicts in LRU
//! order." A capacity of `0` means unbounded.

use lru::LruCache;
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::manager::BddFunc;

enum Backing<K: Hash + Eq> {
    Bounded(LruCache<K, BddFunc>),
    Unbounded(HashMap<K, BddFunc>),
}

/// Memoizes `xfunc(tag) -> BddFunc` keyed by an opaque tag identity `K`.
pub struct XfuncCache<K: Hash + Eq + Clone> {
    backing: Backing<K>,
    evictions: u64,
}

impl<K: Hash + Eq + Clone> XfuncCache<K> {
    /// Creates a cache with the given capacity; `0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        let backing = match NonZeroUsize::new(capacity) {
            Some(cap) => Backing::Bounded(LruCache::new(cap)),
            None => Backing::Unbounded(HashMap::new()),
        };
        Self {
            backing,
            evictions: 0,
        }
    }

    /// Returns the cached BDD for `key`, if present. A hit refreshes the
    /// entry's recency in the bounded case.
    pub fn get(&mut self, key: &K) -> Option<BddFunc> {
        match &mut self.backing {
            Backing::Bounded(lru) => lru.get(key).copied(),
            Backing::Unbounded(map) => map.get(key).copied(),
        }
    }

    /// Inserts `(key, value)`, evicting the least-recently-used entry first
    /// if the cache is at capacity.
    pub fn insert(&mut self, key: K, value: BddFunc) {
        match &mut self.backing {
            Backing::Bounded(lru) => {
                if lru.len() == lru.cap().get() && !lru.contains(&key) {
                    self.evictions += 1;
                }
                lru.put(key, value);
            }
            Backing::Unbounded(map) => {
                map.insert(key, value);
            }
        }
    }

    /// The number of entries evicted over this cache's lifetime.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// The number of entries currently cached.
    pub fn len(&self) -> usize {
        match &self.backing {
            Backing::Bounded(lru) => lru.len(),
            Backing::Unbounded(map) => map.len(),
        }
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_cache_never_evicts() {
        let mut cache: XfuncCache<u32> = XfuncCache::new(0);
        for i in 0..1000u32 {
            cache.insert(i, BddFunc::TRUE);
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn bounded_cache_evicts_least_recently_used() {
        let mut cache: XfuncCache<u32> = XfuncCache::new(2);
        cache.insert(1, BddFunc::TRUE);
        cache.insert(2, BddFunc::FALSE);
        // Touch key 1 so key 2 becomes the least-recently-used entry.
        assert!(cache.get(&1).is_some());
        cache.insert(3, BddFunc::TRUE);
        assert!(cache.get(&2).is_none());
        assert!(cache.get(&1).is_some());
        assert!(cache.get(&3).is_some());
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn get_miss_returns_none() {
        let mut cache: XfuncCache<u32> = XfuncCache::new(4);
        assert!(cache.get(&42).is_none());
    }

    #[test]
    fn is_empty_initially() {
        let cache: XfuncCache<u32> = XfuncCache::new(4);
        assert!(cache.is_empty());
    }
}
