//! The uniform cache-policy contract.
//!
//! Every replacement engine in this crate ([`LruCore`], [`LrukCache`],
//! [`LfuCache`], [`ArcCache`]) implements the same three-trait hierarchy,
//! so callers can swap policies without code changes:
//!
//! ```text
//!   ReadOnlyCache<K, V>     contains / len / is_empty / capacity
//!          │
//!          ▼
//!   CoreCache<K, V>         insert / get / clear
//!          │
//!          ▼
//!   MutableCache<K, V>      remove / remove_batch
//! ```
//!
//! Cores are single-threaded (`&mut self`); the thread-safe, value-copying
//! surface lives in [`SyncCache`](crate::sync::SyncCache), which works over
//! any `MutableCache`.
//!
//! [`LruCore`]: crate::policy::lru::LruCore
//! [`LrukCache`]: crate::policy::lru_k::LrukCache
//! [`LfuCache`]: crate::policy::lfu::LfuCache
//! [`ArcCache`]: crate::policy::arc::ArcCache

/// Read-only inspection shared by every cache.
///
/// None of these methods update replacement metadata; in particular
/// [`contains`](Self::contains) does not count as an access.
pub trait ReadOnlyCache<K, V> {
    /// Returns `true` if `key` is resident, without touching eviction order.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache will hold.
    fn capacity(&self) -> usize;
}

/// Core operations every cache supports.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(16);
/// warm(&mut cache, &[(1, "one".into()), (2, "two".into())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or overwrites, returning the previous value if the key was
    /// resident.
    ///
    /// A full cache evicts one entry according to the replacement policy
    /// before admitting the new one. With `capacity() == 0` the call is a
    /// silent no-op and returns `None`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, updating the policy's replacement metadata on a hit
    /// (recency position, frequency count, or promotion state).
    ///
    /// A miss is not an error; it returns `None`.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Drops every entry and resets policy state.
    fn clear(&mut self);
}

/// Caches that support removal of arbitrary keys.
///
/// Removal drops the entry without touching the replacement metadata of any
/// other entry. Removing an absent key is a silent no-op.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys, returning the outcomes in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}
