//! Frequency-ordered index: freq → FIFO bucket of entries, with a cached
//! minimum.
//!
//! Each live frequency owns a FIFO queue of keys (back = newest arrival,
//! front = oldest) and knows its nearest live neighbors, so advancing
//! `min_freq` when the lowest bucket drains is O(1) instead of a scan. The
//! key → `(freq, queue position)` index makes every lookup one hash probe;
//! bumping a count moves the key from its current queue to the next one.
//!
//! `pop_min` always yields the oldest arrival at the lowest frequency.
//! `refresh` re-queues an entry at the newest end of its current bucket
//! without touching its count, which is how write hits are recorded.
//! `halve_frequencies` rebuilds the whole index in one pass with every count
//! halved; patching buckets in place during aging is how the original
//! implementation ended up with entries in two buckets at once.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

/// Where a key currently lives: its count and its position in that count's
/// queue.
#[derive(Debug, Clone, Copy)]
struct Slot {
    freq: u64,
    node: SlotId,
}

/// One live frequency: its member queue plus links to the nearest live
/// frequencies on either side.
#[derive(Debug)]
struct Bucket<K> {
    /// Back = newest arrival at this count, front = oldest.
    members: IntrusiveList<K>,
    below: Option<u64>,
    above: Option<u64>,
}

/// Frequency index with FIFO buckets and an O(1) minimum.
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    index: FxHashMap<K, Slot>,
    buckets: FxHashMap<u64, Bucket<K>>,
    /// Smallest live frequency; 0 when the index is empty.
    min_freq: u64,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current count for `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|slot| slot.freq)
    }

    /// Returns the smallest live frequency.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Returns the entry `pop_min` would evict, without removing it.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let bucket = self.buckets.get(&self.min_freq)?;
        bucket.members.front().map(|key| (key, self.min_freq))
    }

    /// Tracks a new key at frequency 1. Returns `false` if already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        if !self.buckets.contains_key(&1) {
            let above = (self.min_freq != 0).then_some(self.min_freq);
            self.link_between(1, None, above);
        }
        let node = self
            .buckets
            .get_mut(&1)
            .expect("bucket 1 just ensured")
            .members
            .push_back(key.clone());
        self.index.insert(key, Slot { freq: 1, node });
        self.min_freq = 1;
        true
    }

    /// Bumps `key`'s count by one and moves it to the next bucket's queue.
    ///
    /// Returns the new count, or `None` if the key is not tracked.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let Slot { freq, node } = *self.index.get(key)?;
        if freq == u64::MAX {
            // Saturated counter: only the queue position refreshes.
            self.requeue(key, freq, node)?;
            return Some(freq);
        }
        let bumped = freq + 1;

        // Pull the key out of its current queue, then see what is left.
        let owned = self.buckets.get_mut(&freq)?.members.remove(node)?;
        let (vacated, old_below, old_above) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.members.is_empty(), bucket.below, bucket.above)
        };

        if vacated {
            self.unlink(freq);
            if self.min_freq == freq {
                self.min_freq = old_above.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&bumped) {
            let below = if vacated { old_below } else { Some(freq) };
            self.link_between(bumped, below, old_above);
        }
        let new_node = self
            .buckets
            .get_mut(&bumped)
            .expect("target bucket just ensured")
            .members
            .push_back(owned);

        let slot = self.index.get_mut(key).expect("touched key is indexed");
        slot.freq = bumped;
        slot.node = new_node;
        if self.min_freq == 0 || bumped < self.min_freq {
            self.min_freq = bumped;
        }

        Some(bumped)
    }

    /// Re-queues `key` at the newest end of its current bucket without
    /// changing its count. Returns `false` if the key is not tracked.
    pub fn refresh(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&Slot { freq, node }) => self.requeue(key, freq, node).is_some(),
            None => false,
        }
    }

    /// Stops tracking `key`; returns its final count.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let Slot { freq, node } = self.index.remove(key)?;

        let (vacated, above) = match self.buckets.get_mut(&freq) {
            Some(bucket) => {
                bucket.members.remove(node);
                (bucket.members.is_empty(), bucket.above)
            },
            None => (false, None),
        };
        if vacated {
            self.unlink(freq);
            if self.min_freq == freq {
                self.min_freq = above.unwrap_or(0);
            }
        }

        Some(freq)
    }

    /// Evicts and returns the oldest arrival at the lowest frequency.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let freq = self.min_freq;

        let (key, vacated) = {
            let bucket = self.buckets.get_mut(&freq)?;
            let key = bucket.members.pop_front()?;
            (key, bucket.members.is_empty())
        };
        self.index.remove(&key);
        if vacated {
            self.min_freq = self.unlink(freq).unwrap_or(0);
        }

        Some((key, freq))
    }

    /// Halves every count (floor, minimum 1) and rebuilds the bucket index in
    /// one pass. Returns the new sum of all counts.
    ///
    /// Relative arrival order is preserved: buckets drain in ascending
    /// frequency, oldest first, so merged buckets still evict the
    /// longest-resident entry first.
    pub fn halve_frequencies(&mut self) -> u64 {
        if self.index.is_empty() {
            return 0;
        }

        let mut drained: Vec<(K, u64)> = Vec::with_capacity(self.index.len());
        let mut cursor = self.min_freq;
        while cursor != 0 {
            let bucket = self
                .buckets
                .get_mut(&cursor)
                .expect("chained bucket missing");
            let above = bucket.above;
            while let Some(key) = bucket.members.pop_front() {
                drained.push((key, (cursor / 2).max(1)));
            }
            cursor = above.unwrap_or(0);
        }

        self.buckets.clear();
        self.min_freq = 0;

        // Halved counts arrive in non-decreasing order, so each new bucket
        // chains onto the previous one.
        let mut total = 0u64;
        let mut top = 0u64;
        for (key, freq) in drained {
            total += freq;
            if !self.buckets.contains_key(&freq) {
                let below = (top != 0).then_some(top);
                self.link_between(freq, below, None);
                top = freq;
            }
            let node = self
                .buckets
                .get_mut(&freq)
                .expect("rebuilt bucket just ensured")
                .members
                .push_back(key.clone());
            let slot = self.index.get_mut(&key).expect("drained key is indexed");
            slot.freq = freq;
            slot.node = node;
            if self.min_freq == 0 {
                self.min_freq = freq;
            }
        }
        total
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Moves `key` to the newest end of the queue it already sits in.
    fn requeue(&mut self, key: &K, freq: u64, node: SlotId) -> Option<()> {
        let bucket = self.buckets.get_mut(&freq)?;
        let owned = bucket.members.remove(node)?;
        let new_node = bucket.members.push_back(owned);
        self.index.get_mut(key)?.node = new_node;
        Some(())
    }

    /// Creates an empty bucket for `freq` spliced between `below` and
    /// `above`, patching both neighbors.
    fn link_between(&mut self, freq: u64, below: Option<u64>, above: Option<u64>) {
        if let Some(lower) = below
            && let Some(bucket) = self.buckets.get_mut(&lower)
        {
            bucket.above = Some(freq);
        }
        if let Some(higher) = above
            && let Some(bucket) = self.buckets.get_mut(&higher)
        {
            bucket.below = Some(freq);
        }
        self.buckets.insert(
            freq,
            Bucket {
                members: IntrusiveList::new(),
                below,
                above,
            },
        );
    }

    /// Drops the bucket for `freq`, joining its neighbors across the gap.
    /// Returns the next-higher live frequency.
    fn unlink(&mut self, freq: u64) -> Option<u64> {
        let bucket = self.buckets.remove(&freq)?;
        if let Some(lower) = bucket.below
            && let Some(neighbor) = self.buckets.get_mut(&lower)
        {
            neighbor.above = bucket.above;
        }
        if let Some(higher) = bucket.above
            && let Some(neighbor) = self.buckets.get_mut(&higher)
        {
            neighbor.below = bucket.below;
        }
        bucket.above
    }
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.index.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);

        // The neighbor chain starting at min_freq visits every bucket in
        // strictly ascending order, with symmetric links.
        let mut chained = 0usize;
        let mut members = 0usize;
        let mut previous = None;
        let mut cursor = Some(self.min_freq);
        while let Some(freq) = cursor {
            let bucket = self.buckets.get(&freq).expect("chained bucket missing");
            assert_eq!(bucket.below, previous);
            assert!(previous.is_none_or(|p| p < freq));
            assert!(!bucket.members.is_empty(), "empty bucket left linked");
            bucket.members.debug_validate_invariants();

            chained += 1;
            members += bucket.members.len();
            previous = Some(freq);
            cursor = bucket.above;
        }
        assert_eq!(chained, self.buckets.len());
        assert_eq!(members, self.index.len());

        // Every indexed key resolves to its recorded queue position.
        for (key, slot) in &self.index {
            let bucket = self.buckets.get(&slot.freq).expect("indexed freq missing");
            assert_eq!(bucket.members.get(slot.node), Some(key));
        }
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
