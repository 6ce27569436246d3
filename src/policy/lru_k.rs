//! LRU-K replacement policy: an LRU with a two-stage admission filter.
//!
//! A plain LRU admits every write, so a one-shot scan can flush the entire
//! working set. LRU-K refuses admission until a key has shown reuse: accesses
//! (`get`s and `put`s combined) are counted in a small history filter, and a
//! key enters the main cache only once its cumulative count reaches `K`.
//! Values observed on `put` wait in a side map until then, so the promoted
//! entry carries the most recent write.
//!
//! Keys touched fewer than `K` times never displace resident entries.
//!
//! ## Structure
//!
//! ```text
//!   put/get ──► main: LruCore<K, V>          (hit: normal LRU behavior)
//!                 │ miss
//!                 ▼
//!             history: LruCore<K, u32>       (access counts, capacity H)
//!             pending: FxHashMap<K, V>       (values awaiting promotion)
//!                 │ count >= K and a pending value exists
//!                 ▼
//!             promote: insert into main, drop history + pending entries
//! ```
//!
//! The history filter is itself an LRU: keys that stop being touched fall
//! out of it, taking their pending values with them. A key is therefore in
//! the main cache, in the history filter, or in neither (never both).

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::CacheError;
use crate::policy::lru::LruCore;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

/// Scan-resistant LRU with a K-reference admission filter.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LrukCache;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// let mut cache = LrukCache::new(2, 4, 2);
///
/// cache.insert(1, "a");        // first reference: held in the filter
/// assert!(!cache.contains(&1));
///
/// cache.insert(1, "a");        // second reference: promoted
/// assert!(cache.contains(&1));
/// assert_eq!(cache.get(&1), Some(&"a"));
/// ```
pub struct LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    main: LruCore<K, V>,
    /// Reference counts for keys not yet admitted, bounded by `H`.
    history: LruCore<K, u32>,
    /// Values seen on `put` for keys still below the promotion threshold.
    /// Always a subset of the history filter's keys.
    pending: FxHashMap<K, V>,
    k: u32,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K cache with a main capacity, a history-filter
    /// capacity, and a promotion threshold `k`.
    ///
    /// `k` is clamped to a minimum of 1 (`k = 1` admits on first reference,
    /// degenerating to plain LRU). Use [`try_new`](Self::try_new) to reject
    /// out-of-range parameters instead.
    pub fn new(main_capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self {
            main: LruCore::new(main_capacity),
            history: LruCore::new(history_capacity),
            pending: FxHashMap::default(),
            k: k.max(1),
        }
    }

    /// Fallible constructor: rejects `k == 0` with
    /// [`CacheError::InvalidConfig`].
    pub fn try_new(
        main_capacity: usize,
        history_capacity: usize,
        k: u32,
    ) -> Result<Self, CacheError> {
        if k == 0 {
            return Err(CacheError::InvalidConfig("k must be >= 1"));
        }
        Ok(Self::new(main_capacity, history_capacity, k))
    }

    /// Returns the promotion threshold.
    pub fn k_value(&self) -> u32 {
        self.k
    }

    /// Returns the history filter's capacity.
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Returns the number of keys currently tracked by the history filter.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the recorded reference count for a not-yet-admitted key.
    pub fn history_count(&self, key: &K) -> Option<u32> {
        self.history.peek(key).copied()
    }

    /// Counts one reference against the history filter and returns the
    /// cumulative count. Room is made by dropping the filter's own LRU key
    /// together with its pending value.
    fn bump_history(&mut self, key: &K) -> u32 {
        if let Some(count) = self.history.get_mut(key) {
            *count = count.saturating_add(1);
            return *count;
        }

        if self.history.capacity() > 0
            && self.history.len() >= self.history.capacity()
            && let Some((stale, _)) = self.history.pop_lru()
        {
            self.pending.remove(&stale);
        }
        self.history.insert(key.clone(), 1);
        1
    }

    fn promote(&mut self, key: K, value: V) {
        self.history.remove(&key);
        self.pending.remove(&key);
        self.main.insert(key, value);
    }

}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.main.debug_validate_invariants();
        self.history.debug_validate_invariants();
        for key in self.pending.keys() {
            assert!(
                self.history.contains(key),
                "pending value for a key outside the history filter"
            );
        }
        // A key is resident or filtered, never both.
        for key in self.pending.keys() {
            assert!(!self.main.contains(key));
        }
    }
}

impl<K, V> ReadOnlyCache<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Reports residency in the main cache; filtered keys are not resident.
    fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }
}

impl<K, V> CoreCache<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or overwrites. Keys below the promotion threshold are held in
    /// the filter; `Some` is returned only when a resident entry was
    /// overwritten.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.main.capacity() == 0 {
            return None;
        }

        if self.main.contains(&key) {
            return self.main.insert(key, value);
        }

        let count = self.bump_history(&key);
        if count >= self.k {
            self.promote(key, value);
        } else {
            self.pending.insert(key, value);
        }
        None
    }

    /// Looks up `key`. A miss still counts one reference toward promotion;
    /// a key reaching the threshold with a pending value is promoted and
    /// returned. Reaching the threshold through `get`s alone is still a miss
    /// until a `put` supplies a value.
    fn get(&mut self, key: &K) -> Option<&V> {
        if self.main.contains(key) {
            return self.main.get(key);
        }

        let count = self.bump_history(key);
        if count >= self.k
            && let Some(value) = self.pending.remove(key)
        {
            self.history.remove(key);
            self.main.insert(key.clone(), value);
            return self.main.get(key);
        }
        None
    }

    fn clear(&mut self) {
        self.main.clear();
        self.history.clear();
        self.pending.clear();
    }
}

impl<K, V> MutableCache<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Removes `key` from the main cache, and forgets any filter state so a
    /// removed key cannot be promoted later from a stale pending value.
    fn remove(&mut self, key: &K) -> Option<V> {
        self.history.remove(key);
        self.pending.remove(key);
        self.main.remove(key)
    }
}

impl<K, V> fmt::Debug for LrukCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("history_len", &self.history.len())
            .field("pending_len", &self.pending.len())
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reference_is_filtered() {
        let mut cache = LrukCache::new(4, 8, 2);
        cache.insert(1, "a");
        assert!(!cache.contains(&1));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.history_count(&1), Some(1));
    }

    #[test]
    fn second_put_promotes() {
        let mut cache = LrukCache::new(4, 8, 2);
        cache.insert(1, "old");
        cache.insert(1, "new");
        assert!(cache.contains(&1));
        assert_eq!(cache.get(&1), Some(&"new"));
        assert_eq!(cache.history_count(&1), None);
        cache.debug_validate_invariants();
    }

    #[test]
    fn get_after_put_promotes_with_pending_value() {
        let mut cache = LrukCache::new(2, 4, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.get(&1), Some(&"a")); // second reference for 1
        assert_eq!(cache.get(&2), Some(&"b"));

        cache.insert(3, "c");
        assert_eq!(cache.get(&3), Some(&"c")); // promoted on second reference
        assert!(cache.contains(&3));
        // Promotion of 3 evicted one of the earlier residents.
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&1) || cache.contains(&2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn gets_alone_never_promote() {
        let mut cache: LrukCache<i32, &str> = LrukCache::new(4, 8, 2);
        // No put ever happened for this key, so there is no value to admit.
        for _ in 0..5 {
            assert_eq!(cache.get(&7), None);
        }
        assert!(!cache.contains(&7));
        assert!(cache.history_count(&7).unwrap() >= 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn put_after_enough_gets_promotes_immediately() {
        let mut cache = LrukCache::new(4, 8, 3);
        cache.get(&1);
        cache.get(&1);
        assert!(!cache.contains(&1));
        cache.insert(1, "a"); // third reference
        assert!(cache.contains(&1));
        assert_eq!(cache.get(&1), Some(&"a"));
    }

    #[test]
    fn resident_hit_does_not_touch_filter() {
        let mut cache = LrukCache::new(4, 8, 2);
        cache.insert(1, "a");
        cache.insert(1, "a");
        assert!(cache.contains(&1));
        let filtered_before = cache.history_len();
        cache.get(&1);
        cache.insert(1, "a2");
        assert_eq!(cache.history_len(), filtered_before);
    }

    #[test]
    fn filter_eviction_drops_pending_value() {
        let mut cache = LrukCache::new(4, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // history holds 2 keys; key 1 falls out

        assert_eq!(cache.history_count(&1), None);
        // A fresh reference starts the count over.
        cache.insert(1, "a");
        assert_eq!(cache.history_count(&1), Some(1));
        assert!(!cache.contains(&1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn k_one_degenerates_to_lru() {
        let mut cache = LrukCache::new(2, 4, 1);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        cache.insert(3, "c");
        assert!(!cache.contains(&1));
    }

    #[test]
    fn scan_does_not_displace_hot_entries() {
        let mut cache = LrukCache::new(2, 16, 2);
        cache.insert(1, "hot1");
        cache.insert(1, "hot1");
        cache.insert(2, "hot2");
        cache.insert(2, "hot2");

        // One-shot scan over cold keys.
        for key in 10..20 {
            cache.insert(key, "cold");
        }

        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_forgets_filter_state() {
        let mut cache = LrukCache::new(4, 8, 2);
        cache.insert(1, "a");
        assert_eq!(cache.remove(&1), None); // not resident yet
        // The pending value is gone: the next two references rebuild from zero.
        cache.get(&1);
        assert!(!cache.contains(&1));
        assert_eq!(cache.history_count(&1), Some(1));

        cache.insert(2, "b");
        cache.insert(2, "b");
        assert_eq!(cache.remove(&2), Some("b"));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn constructor_clamps_and_try_new_rejects() {
        let cache: LrukCache<u32, ()> = LrukCache::new(4, 4, 0);
        assert_eq!(cache.k_value(), 1);

        assert!(LrukCache::<u32, ()>::try_new(4, 4, 0).is_err());
        assert!(LrukCache::<u32, ()>::try_new(4, 4, 2).is_ok());
    }

    #[test]
    fn zero_main_capacity_is_disabled() {
        let mut cache = LrukCache::new(0, 4, 2);
        cache.insert(1, "a");
        cache.insert(1, "a");
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains(&1));
    }

    #[test]
    fn clear_resets_all_tiers() {
        let mut cache = LrukCache::new(4, 4, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(2, "b");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.history_len(), 0);
        cache.insert(1, "a");
        assert!(!cache.contains(&1)); // count restarted
    }
}
