//! Least Frequently Used (LFU) replacement policy with frequency aging.
//!
//! Entries carry an integer reference count and are indexed by it into FIFO
//! buckets ([`FrequencyBuckets`]); eviction takes the oldest arrival at the
//! lowest count. A cached minimum keeps the hot path free of scans.
//!
//! Pure LFU suffers caste lock-in: entries that were hot long ago keep
//! counts new entries can never reach, and the cache stops adapting. The
//! cure is periodic aging: a running `total_refs` counter is bumped on every
//! `get` (hit or miss), and once the average count per entry exceeds the
//! configured `aging_threshold`, every count is halved (floor, minimum 1) in
//! one atomic rebuild of the bucket index.
//!
//! Two asymmetries worth knowing:
//!
//! - Reads drive frequency; writes do not. A `put` to a resident key
//!   overwrites the value and refreshes the entry's position at the newest
//!   end of its bucket, but leaves the count alone: a write says nothing
//!   about how often the data is needed.
//! - Eviction subtracts the victim's count from `total_refs`, so a stream
//!   of cold insertions does not drag the average toward an aging storm.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::error::CacheError;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

/// Frequency-ordered bounded map with halving-based aging.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// let mut cache = LfuCache::new(2, 1_000_000);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1);
/// cache.get(&1);
///
/// cache.insert(3, "c"); // 2 has the lowest count and is evicted
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    store: FxHashMap<K, V>,
    order: FrequencyBuckets<K>,
    capacity: usize,
    /// Maximum tolerated average reference count before aging fires.
    aging_threshold: u64,
    /// Reference counter driving the aging check; bumped on every `get`.
    total_refs: u64,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache with the given capacity and aging threshold.
    ///
    /// The threshold is clamped to a minimum of 1; use
    /// [`try_new`](Self::try_new) to reject out-of-range values instead. A
    /// capacity of 0 disables the cache entirely.
    pub fn new(capacity: usize, aging_threshold: u64) -> Self {
        Self {
            store: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: FrequencyBuckets::with_capacity(capacity),
            capacity,
            aging_threshold: aging_threshold.max(1),
            total_refs: 0,
        }
    }

    /// Fallible constructor: rejects a zero aging threshold with
    /// [`CacheError::InvalidConfig`].
    pub fn try_new(capacity: usize, aging_threshold: u64) -> Result<Self, CacheError> {
        if aging_threshold == 0 {
            return Err(CacheError::InvalidConfig("aging_threshold must be >= 1"));
        }
        Ok(Self::new(capacity, aging_threshold))
    }

    /// Returns the current reference count for a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.order.frequency(key)
    }

    /// Returns the configured aging threshold.
    pub fn aging_threshold(&self) -> u64 {
        self.aging_threshold
    }

    /// Returns the running reference total driving the aging check.
    pub fn total_refs(&self) -> u64 {
        self.total_refs
    }

    /// Halves every count once the average reference count per resident
    /// entry exceeds the threshold. The bucket index is rebuilt in one pass
    /// and `total_refs` is reset to the new count sum.
    fn maybe_age(&mut self) {
        let len = self.store.len() as u64;
        if len == 0 {
            return;
        }
        if self.total_refs / len > self.aging_threshold {
            self.total_refs = self.order.halve_frequencies();
        }
    }

}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.store.len() <= self.capacity);
        assert_eq!(self.store.len(), self.order.len());
        for key in self.store.keys() {
            assert!(self.order.contains(key), "stored key missing from order");
        }
        self.order.debug_validate_invariants();
    }
}

impl<K, V> ReadOnlyCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or overwrites.
    ///
    /// An overwrite refreshes the entry's bucket position without bumping
    /// its count. A miss at capacity evicts the oldest arrival at the lowest
    /// count, subtracting the victim's count from the reference total; the
    /// new entry starts at count 1.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if self.store.contains_key(&key) {
            self.order.refresh(&key);
            return self.store.insert(key, value);
        }

        if self.store.len() >= self.capacity
            && let Some((victim, freq)) = self.order.pop_min()
        {
            self.store.remove(&victim);
            self.total_refs = self.total_refs.saturating_sub(freq);
        }

        self.order.insert(key.clone());
        self.store.insert(key, value);
        None
    }

    /// Looks up `key`. A hit bumps the entry's count; every call (hit or
    /// miss) counts one reference toward the aging check.
    fn get(&mut self, key: &K) -> Option<&V> {
        if self.capacity == 0 {
            return None;
        }

        let hit = self.order.touch(key).is_some();
        self.total_refs += 1;
        self.maybe_age();

        if hit { self.store.get(key) } else { None }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
        self.total_refs = 0;
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.store.remove(key)?;
        if let Some(freq) = self.order.remove(key) {
            self.total_refs = self.total_refs.saturating_sub(freq);
        }
        Some(value)
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("aging_threshold", &self.aging_threshold)
            .field("total_refs", &self.total_refs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Threshold high enough that aging never fires.
    const NO_AGING: u64 = u64::MAX / 2;

    #[test]
    fn evicts_lowest_frequency() {
        let mut cache = LfuCache::new(2, NO_AGING);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1);
        cache.get(&1);

        cache.insert(3, "c");
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&3), Some(&"c"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn ties_break_by_arrival_order() {
        let mut cache = LfuCache::new(3, NO_AGING);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        // All at count 1: the oldest arrival goes first.
        cache.insert(4, "d");
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn write_hit_keeps_count_but_refreshes_position() {
        let mut cache = LfuCache::new(2, NO_AGING);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.insert(1, "a2"), Some("a"));
        assert_eq!(cache.frequency(&1), Some(1));

        // Both still at count 1, but 1 is now the newer arrival: 2 evicts.
        cache.insert(3, "c");
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert_eq!(cache.get(&1), Some(&"a2"));
    }

    #[test]
    fn read_hit_bumps_count() {
        let mut cache = LfuCache::new(4, NO_AGING);
        cache.insert(1, "a");
        assert_eq!(cache.frequency(&1), Some(1));
        cache.get(&1);
        assert_eq!(cache.frequency(&1), Some(2));
        cache.get(&1);
        assert_eq!(cache.frequency(&1), Some(3));
    }

    #[test]
    fn aging_halves_counts() {
        let mut cache = LfuCache::new(3, 1);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        for _ in 0..100 {
            assert_eq!(cache.get(&1), Some(&"a"));
        }

        // With threshold 1 the average is clamped down continually; the hot
        // key's count cannot run away to 100.
        let hot = cache.frequency(&1).unwrap();
        assert!(hot < 50, "aging never fired: count = {hot}");
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn aging_resets_reference_total() {
        let mut cache = LfuCache::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        for _ in 0..6 {
            cache.get(&1);
        }
        // total_refs was rebuilt from the halved counts at least once.
        assert!(cache.total_refs() < 6);
        cache.debug_validate_invariants();
    }

    #[test]
    fn misses_count_toward_aging() {
        let mut cache = LfuCache::new(2, 3);
        cache.insert(1, "a");
        cache.get(&1);
        cache.get(&1);
        let before = cache.frequency(&1).unwrap();
        assert_eq!(before, 3);

        // Repeated misses push the average over the threshold.
        for _ in 0..6 {
            assert_eq!(cache.get(&99), None);
        }
        assert!(cache.frequency(&1).unwrap() < before);
    }

    #[test]
    fn eviction_subtracts_victim_count() {
        let mut cache = LfuCache::new(1, NO_AGING);
        cache.insert(1, "a");
        cache.get(&1);
        cache.get(&1);
        assert_eq!(cache.total_refs(), 2);

        cache.insert(2, "b"); // evicts 1 at count 3
        assert_eq!(cache.total_refs(), 0);
        assert!(cache.contains(&2));
    }

    #[test]
    fn new_entry_resets_min_freq() {
        let mut cache = LfuCache::new(2, NO_AGING);
        cache.insert(1, "a");
        cache.get(&1);
        cache.get(&1);
        cache.insert(2, "b");
        cache.get(&2);

        // Fresh insert lands at count 1 and becomes the eviction candidate.
        cache.insert(3, "c");
        cache.insert(4, "d");
        assert!(cache.contains(&1));
        assert!(!cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_is_disabled() {
        let mut cache = LfuCache::new(0, 10);
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_refs(), 0);
    }

    #[test]
    fn remove_adjusts_reference_total() {
        let mut cache = LfuCache::new(4, NO_AGING);
        cache.insert(1, "a");
        cache.get(&1);
        cache.get(&1);
        assert_eq!(cache.remove(&1), Some("a"));
        assert_eq!(cache.remove(&1), None);
        assert_eq!(cache.total_refs(), 0);
        assert!(cache.is_empty());
        cache.debug_validate_invariants();
    }

    #[test]
    fn constructor_clamps_and_try_new_rejects() {
        let cache: LfuCache<u32, ()> = LfuCache::new(4, 0);
        assert_eq!(cache.aging_threshold(), 1);

        assert!(LfuCache::<u32, ()>::try_new(4, 0).is_err());
        assert!(LfuCache::<u32, ()>::try_new(4, 1).is_ok());
    }

    #[test]
    fn clear_resets_state() {
        let mut cache = LfuCache::new(3, NO_AGING);
        cache.insert(1, "a");
        cache.get(&1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_refs(), 0);
        assert_eq!(cache.frequency(&1), None);
        cache.debug_validate_invariants();
    }
}
