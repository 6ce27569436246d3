//! Thread-safe cache handle.
//!
//! Cache cores are single-threaded (`&mut self`): every read mutates
//! replacement metadata, so there is no shared-read fast path worth a
//! reader/writer split. [`SyncCache`] wraps any core in an
//! `Arc<parking_lot::Mutex<…>>` and holds the lock for the entirety of each
//! public operation, which makes every operation linearisable with respect
//! to the lock order. Lock-hold time is bounded by the core's amortised O(1)
//! work; nothing blocks inside the critical section.
//!
//! Reads hand out value clones, never interior references: the caller's copy
//! is independent of cache state, and the entry can be evicted or
//! overwritten without invalidating it. Keep values cheaply cloneable (or
//! wrap them in `Arc`) when using this layer.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use evictkit::policy::lru::LruCore;
//! use evictkit::sync::SyncCache;
//!
//! let cache = SyncCache::new(LruCore::new(128));
//! cache.insert(1u64, Arc::new("payload".to_string()));
//!
//! let handle = cache.clone();
//! std::thread::spawn(move || {
//!     if let Some(value) = handle.get(&1) {
//!         assert_eq!(*value, "payload");
//!     }
//! })
//! .join()
//! .unwrap();
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::CacheError;
use crate::traits::MutableCache;

/// Cloneable, thread-safe handle around a cache core.
pub struct SyncCache<K, V, P>
where
    P: MutableCache<K, V>,
{
    inner: Arc<Mutex<P>>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V, P> Clone for SyncCache<K, V, P>
where
    P: MutableCache<K, V>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<K, V, P> SyncCache<K, V, P>
where
    P: MutableCache<K, V>,
{
    /// Wraps a cache core in a shared, locked handle.
    pub fn new(core: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
            _marker: PhantomData,
        }
    }

    /// Inserts or overwrites, returning the previous value if the key was
    /// resident.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up `key`, returning a clone of the value on a hit.
    ///
    /// Side effects are identical to the core's `get`: recency, frequency,
    /// and promotion state update exactly as they would single-threaded.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Value-returning lookup: like [`get`](Self::get) but an absent key is
    /// [`CacheError::NotFound`] instead of `None`.
    pub fn try_get(&self, key: &K) -> Result<V, CacheError>
    where
        V: Clone,
    {
        self.inner
            .lock()
            .get(key)
            .cloned()
            .ok_or(CacheError::NotFound)
    }

    /// Removes `key`, returning its value if it was resident.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Returns `true` if `key` is resident, without touching eviction order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the maximum number of entries the cache will hold.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops every entry and resets policy state.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs `f` with exclusive access to the core, for policy-specific
    /// introspection the uniform surface does not expose.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V, P> std::fmt::Debug for SyncCache<K, V, P>
where
    P: MutableCache<K, V> + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCache")
            .field("core", &*self.inner.lock())
            .finish()
    }
}
