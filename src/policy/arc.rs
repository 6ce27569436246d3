//! Adaptive replacement policy balancing recency against frequency.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                        ArcCache<K, V>                         │
//!   │                                                               │
//!   │   recency arm (LRU order, per-entry hit count)                │
//!   │   ┌─────────────────────────┐   ┌─────────────────────────┐   │
//!   │   │ MRU ──► ... ──► LRU     │──►│ ghost: evicted keys     │   │
//!   │   └─────────────────────────┘   └─────────────────────────┘   │
//!   │          │ hit count reaches transform_threshold              │
//!   │          ▼                                                    │
//!   │   frequency arm (freq buckets, FIFO within bucket)            │
//!   │   ┌─────────────────────────┐   ┌─────────────────────────┐   │
//!   │   │ min_freq ──► eviction   │──►│ ghost: evicted keys     │   │
//!   │   └─────────────────────────┘   └─────────────────────────┘   │
//!   │                                                               │
//!   │   A read miss landing in a ghost list moves one slot of       │
//!   │   capacity toward the arm that evicted too early. The two     │
//!   │   arm capacities always sum to the constructed total.         │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fresh entries are admitted into the recency arm and behave like LRU
//! residents. An entry whose hit count reaches `transform_threshold` moves
//! into the frequency arm, where it competes by reference count instead of
//! recency. Each arm records the keys it evicts in a bounded FIFO ghost
//! list, sized at the arm's initial capacity.
//!
//! Adaptation fires on the read path only: a `get` that misses both arms
//! and finds its key in a ghost list shifts one slot of capacity toward the
//! arm that evicted the key, then consumes the ghost entry. Writes never
//! adapt: under write-heavy workloads, write-path adaptation thrashes the
//! partition without improving hit rate. Ghost lists hold keys, not values,
//! so a ghost hit cannot resurrect the entry; the access reports a miss and
//! the caller's follow-up `put` re-admits the key into the favored arm.
//!
//! All operations are O(1) amortised; the cache is single-threaded (wrap in
//! [`SyncCache`](crate::sync::SyncCache) for shared access).

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::ds::ghost_list::GhostList;
use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::CacheError;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

#[derive(Debug)]
struct RecencyEntry<K, V> {
    key: K,
    value: V,
    hits: u32,
}

/// LRU-ordered arm holding entries on their first life in the cache.
struct RecencyArm<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    /// Front = most recently used.
    list: IntrusiveList<RecencyEntry<K, V>>,
    capacity: usize,
    ghost: GhostList<K>,
}

impl<K, V> RecencyArm<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
            ghost: GhostList::new(capacity),
        }
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Records a read hit: moves the entry to MRU and returns its bumped
    /// hit count.
    fn hit(&mut self, key: &K) -> Option<u32> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| {
            entry.hits = entry.hits.saturating_add(1);
            entry.hits
        })
    }

    /// Records a write hit: swaps the value and moves the entry to MRU.
    /// The hit count is left alone; writes carry no reuse signal.
    fn overwrite(&mut self, key: &K, value: V) -> Option<V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list
            .get_mut(id)
            .map(|entry| std::mem::replace(&mut entry.value, value))
    }

    /// Admits a fresh entry at MRU with one recorded hit, evicting the LRU
    /// entry into the ghost list when full. With zero capacity the entry is
    /// dropped.
    fn admit(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.list.len() >= self.capacity {
            self.evict_lru();
        }
        let id = self.list.push_front(RecencyEntry {
            key: key.clone(),
            value,
            hits: 1,
        });
        self.index.insert(key, id);
    }

    /// Removes an entry without ghost-recording it (promotion, removal).
    fn take(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| (entry.key, entry.value))
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            self.ghost.record(entry.key);
        }
    }

    /// Gives this arm one more slot of capacity.
    fn grow(&mut self) {
        self.capacity += 1;
    }

    /// Takes one slot of capacity away, evicting first if the arm is full.
    /// Fails once the arm is already empty of capacity.
    fn shrink(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.list.len() >= self.capacity {
            self.evict_lru();
        }
        self.capacity -= 1;
        true
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
        self.ghost.clear();
    }
}

/// Frequency-ordered arm holding entries that have proven reuse.
struct FrequencyArm<K, V>
where
    K: Eq + Hash + Clone,
{
    store: FxHashMap<K, V>,
    order: FrequencyBuckets<K>,
    capacity: usize,
    ghost: GhostList<K>,
}

impl<K, V> FrequencyArm<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            store: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: FrequencyBuckets::with_capacity(capacity),
            capacity,
            ghost: GhostList::new(capacity),
        }
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Records a read hit: bumps the entry's reference count.
    fn hit(&mut self, key: &K) -> bool {
        self.order.touch(key).is_some()
    }

    /// Records a write hit: swaps the value and refreshes the entry's
    /// position in its current bucket without touching the count.
    fn overwrite(&mut self, key: &K, value: V) -> Option<V> {
        if !self.store.contains_key(key) {
            return None;
        }
        self.order.refresh(key);
        self.store.insert(key.clone(), value)
    }

    /// Admits an entry at count 1, evicting the coldest resident into the
    /// ghost list when full. With zero capacity the entry is dropped.
    fn admit(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.store.len() >= self.capacity {
            self.evict_coldest();
        }
        self.order.insert(key.clone());
        self.store.insert(key, value);
    }

    /// Removes an entry without ghost-recording it.
    fn take(&mut self, key: &K) -> Option<V> {
        let value = self.store.remove(key)?;
        self.order.remove(key);
        Some(value)
    }

    fn evict_coldest(&mut self) {
        if let Some((victim, _)) = self.order.pop_min() {
            self.store.remove(&victim);
            self.ghost.record(victim);
        }
    }

    fn grow(&mut self) {
        self.capacity += 1;
    }

    fn shrink(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.store.len() >= self.capacity {
            self.evict_coldest();
        }
        self.capacity -= 1;
        true
    }

    fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
        self.ghost.clear();
    }
}

/// Two-arm adaptive cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCache;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = ArcCache::new(4, 2);
/// cache.insert(1, "a");
/// assert_eq!(cache.recency_len(), 1);
///
/// // The second read hit crosses the transform threshold.
/// cache.get(&1);
/// cache.get(&1);
/// assert_eq!(cache.frequency_len(), 1);
/// assert_eq!(cache.recency_len(), 0);
/// ```
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    recent: RecencyArm<K, V>,
    frequent: FrequencyArm<K, V>,
    transform_threshold: u32,
    total_capacity: usize,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an adaptive cache with `total_capacity` slots split evenly
    /// between the two arms (an odd total gives the recency arm the extra
    /// slot, so a capacity-1 cache can still admit entries).
    ///
    /// `transform_threshold` is the number of read hits after which a
    /// recency-arm entry moves to the frequency arm; it is clamped to a
    /// minimum of 1. Use [`try_new`](Self::try_new) to reject out-of-range
    /// parameters instead.
    pub fn new(total_capacity: usize, transform_threshold: u32) -> Self {
        let frequent_capacity = total_capacity / 2;
        let recent_capacity = total_capacity - frequent_capacity;
        Self {
            recent: RecencyArm::new(recent_capacity),
            frequent: FrequencyArm::new(frequent_capacity),
            transform_threshold: transform_threshold.max(1),
            total_capacity,
        }
    }

    /// Fallible constructor: rejects a zero transform threshold with
    /// [`CacheError::InvalidConfig`].
    pub fn try_new(total_capacity: usize, transform_threshold: u32) -> Result<Self, CacheError> {
        if transform_threshold == 0 {
            return Err(CacheError::InvalidConfig("transform_threshold must be >= 1"));
        }
        Ok(Self::new(total_capacity, transform_threshold))
    }

    /// Returns the promotion threshold.
    pub fn transform_threshold(&self) -> u32 {
        self.transform_threshold
    }

    /// Returns the number of entries in the recency arm.
    pub fn recency_len(&self) -> usize {
        self.recent.len()
    }

    /// Returns the number of entries in the frequency arm.
    pub fn frequency_len(&self) -> usize {
        self.frequent.len()
    }

    /// Returns the recency arm's current share of the capacity.
    pub fn recency_capacity(&self) -> usize {
        self.recent.capacity
    }

    /// Returns the frequency arm's current share of the capacity.
    pub fn frequency_capacity(&self) -> usize {
        self.frequent.capacity
    }

    /// Returns the number of keys ghost-tracked for the recency arm.
    pub fn recency_ghost_len(&self) -> usize {
        self.recent.ghost.len()
    }

    /// Returns the number of keys ghost-tracked for the frequency arm.
    pub fn frequency_ghost_len(&self) -> usize {
        self.frequent.ghost.len()
    }

    /// Moves the recency-arm entry into the frequency arm once its hit count
    /// crosses the threshold. Skipped while the frequency arm has no
    /// capacity; the entry stays resident and remains eligible.
    fn promote(&mut self, key: &K) {
        if self.frequent.capacity == 0 {
            return;
        }
        if let Some((key, value)) = self.recent.take(key) {
            self.frequent.admit(key, value);
        }
    }

    /// Ghost consultation on a read miss: one slot of capacity moves toward
    /// the arm whose ghost list holds the key, and the ghost entry is
    /// consumed. A shrink that would empty the other arm's capacity fails
    /// and leaves everything unchanged.
    fn adapt_on_miss(&mut self, key: &K) {
        if self.recent.ghost.contains(key) {
            if self.frequent.shrink() {
                self.recent.grow();
                self.recent.ghost.remove(key);
            }
        } else if self.frequent.ghost.contains(key) && self.recent.shrink() {
            self.frequent.grow();
            self.frequent.ghost.remove(key);
        }
    }

}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.recent.len() <= self.recent.capacity);
        assert!(self.frequent.len() <= self.frequent.capacity);
        assert_eq!(
            self.recent.capacity + self.frequent.capacity,
            self.total_capacity,
            "arm capacities no longer sum to the constructed total"
        );

        self.recent.ghost.debug_validate_invariants();
        self.frequent.ghost.debug_validate_invariants();
        self.recent.list.debug_validate_invariants();
        self.frequent.order.debug_validate_invariants();
        assert_eq!(self.recent.index.len(), self.recent.list.len());
        assert_eq!(self.frequent.store.len(), self.frequent.order.len());

        for entry in self.recent.list.iter() {
            assert!(
                !self.frequent.contains(&entry.key),
                "key resident in both arms"
            );
            assert!(
                !self.recent.ghost.contains(&entry.key),
                "recency-arm key still ghost-tracked"
            );
            assert!(!self.frequent.ghost.contains(&entry.key));
        }
        for key in self.frequent.store.keys() {
            assert!(!self.recent.ghost.contains(key));
            assert!(
                !self.frequent.ghost.contains(key),
                "frequency-arm key still ghost-tracked"
            );
        }
    }
}

impl<K, V> ReadOnlyCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    fn len(&self) -> usize {
        self.recent.len() + self.frequent.len()
    }

    fn capacity(&self) -> usize {
        self.total_capacity
    }
}

impl<K, V> CoreCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or overwrites. A resident key is updated in place in its arm;
    /// a fresh key is admitted into the recency arm, evicting its LRU entry
    /// into the ghost list when full. Writes never move capacity.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.total_capacity == 0 {
            return None;
        }

        if self.frequent.contains(&key) {
            return self.frequent.overwrite(&key, value);
        }
        if self.recent.contains(&key) {
            return self.recent.overwrite(&key, value);
        }

        // Fresh admission; a resident key must not linger in any ghost.
        self.recent.ghost.remove(&key);
        self.frequent.ghost.remove(&key);
        self.recent.admit(key, value);
        None
    }

    /// Looks up `key`, probing the frequency arm first. A recency-arm hit
    /// that crosses the transform threshold promotes the entry. A miss
    /// consults the ghost lists and may move capacity between the arms; the
    /// access still reports a miss.
    fn get(&mut self, key: &K) -> Option<&V> {
        if self.frequent.contains(key) {
            self.frequent.hit(key);
            return self.frequent.peek(key);
        }

        if self.recent.contains(key) {
            let hits = self.recent.hit(key).expect("resident key lost its entry");
            if hits >= self.transform_threshold {
                self.promote(key);
                // The entry is in exactly one arm either way.
                if self.frequent.contains(key) {
                    return self.frequent.peek(key);
                }
            }
            return self.recent.peek(key);
        }

        self.adapt_on_miss(key);
        None
    }

    fn clear(&mut self) {
        self.recent.clear();
        self.frequent.clear();
        // The learned partition dies with the entries.
        let frequent_capacity = self.total_capacity / 2;
        self.frequent.capacity = frequent_capacity;
        self.recent.capacity = self.total_capacity - frequent_capacity;
    }
}

impl<K, V> MutableCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.frequent.take(key) {
            return Some(value);
        }
        self.recent.take(key).map(|(_, value)| value)
    }
}

impl<K, V> fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.total_capacity)
            .field("recency_len", &self.recent.len())
            .field("recency_capacity", &self.recent.capacity)
            .field("frequency_len", &self.frequent.len())
            .field("frequency_capacity", &self.frequent.capacity)
            .field("recency_ghost_len", &self.recent.ghost.len())
            .field("frequency_ghost_len", &self.frequent.ghost.len())
            .finish_non_exhaustive()
    }
}
