//! Least Recently Used (LRU) replacement policy.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                      LruCore<K, V>                       │
//!   │                                                          │
//!   │   index: FxHashMap<K, SlotId>                            │
//!   │                 │                                        │
//!   │                 ▼                                        │
//!   │   list: IntrusiveList<Entry<K, V>>                       │
//!   │                                                          │
//!   │   front ──► [C] ◄──► [A] ◄──► [B] ◄── back               │
//!   │             MRU                LRU                       │
//!   │                                                          │
//!   │   get(A):    unlink A, relink at front                   │
//!   │   insert(D): pop back when full, push D at front         │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries live in the list's arena and are addressed by stable `SlotId`s, so
//! every hit is two O(1) steps: an index lookup and a link splice. There are
//! no owning pointers to alias and no back-edge bookkeeping.
//!
//! `LruCore` is single-threaded; wrap it in
//! [`SyncCache`](crate::sync::SyncCache) for shared access.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Recency-ordered bounded map.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1);        // 1 is now most recent
/// cache.insert(3, "c"); // evicts 2, the least recent
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert!(cache.contains(&3));
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    /// Front = most recently used, back = least recently used.
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 creates a disabled cache: every insert is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the value for `key` without updating recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value for `key`, marking it most
    /// recently used.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Marks `key` most recently used without reading its value; returns
    /// `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the recency rank of `key`: 0 = most recent. O(n).
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        if !self.index.contains_key(key) {
            return None;
        }
        self.list.iter().position(|entry| entry.key == *key)
    }
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.list.len() <= self.capacity);
        assert_eq!(self.index.len(), self.list.len());
        for entry in self.list.iter() {
            let id = self.index.get(&entry.key).expect("listed key missing from index");
            assert_eq!(
                self.list.get(*id).map(|e| &e.key),
                Some(&entry.key),
                "index id does not resolve to its key"
            );
        }
        self.list.debug_validate_invariants();
    }
}

impl<K, V> ReadOnlyCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&id) = self.index.get(&key) {
            let entry = self.list.get_mut(id).expect("index points at live entry");
            let old = std::mem::replace(&mut entry.value, value);
            self.list.move_to_front(id);
            return Some(old);
        }

        if self.list.len() >= self.capacity {
            self.pop_lru();
        }
        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
