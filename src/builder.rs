//! Unified cache builder for all replacement policies.
//!
//! [`CacheBuilder`] constructs any of the four engines behind one wrapper
//! type, [`Cache`], so callers can switch replacement policies without
//! changing the code that uses the cache.
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::{CacheBuilder, PolicyKind};
//! use evictkit::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(PolicyKind::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::CacheError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LrukCache;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};

/// Replacement policy selection, with per-policy tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Least Recently Used eviction.
    Lru,
    /// LRU with a K-reference admission filter of the given capacity.
    LruK { history_capacity: usize, k: u32 },
    /// Least Frequently Used eviction with halving-based aging.
    Lfu { aging_threshold: u64 },
    /// Two-arm adaptive cache; entries transform to the frequency arm after
    /// this many read hits.
    Adaptive { transform_threshold: u32 },
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCore<K, V>),
    LruK(LrukCache<K, V>),
    Lfu(LfuCache<K, V>),
    Adaptive(ArcCache<K, V>),
}

/// Policy-erased cache produced by [`CacheBuilder`].
///
/// Implements the same trait surface as the concrete engines; the wrapped
/// policy is fixed at construction time.
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Returns which policy this cache was built with.
    pub fn policy(&self) -> PolicyKind {
        match &self.inner {
            CacheInner::Lru(_) => PolicyKind::Lru,
            CacheInner::LruK(cache) => PolicyKind::LruK {
                history_capacity: cache.history_capacity(),
                k: cache.k_value(),
            },
            CacheInner::Lfu(cache) => PolicyKind::Lfu {
                aging_threshold: cache.aging_threshold(),
            },
            CacheInner::Adaptive(cache) => PolicyKind::Adaptive {
                transform_threshold: cache.transform_threshold(),
            },
        }
    }
}

impl<K, V> ReadOnlyCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(cache) => cache.contains(key),
            CacheInner::LruK(cache) => cache.contains(key),
            CacheInner::Lfu(cache) => cache.contains(key),
            CacheInner::Adaptive(cache) => cache.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.len(),
            CacheInner::LruK(cache) => cache.len(),
            CacheInner::Lfu(cache) => cache.len(),
            CacheInner::Adaptive(cache) => cache.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.capacity(),
            CacheInner::LruK(cache) => cache.capacity(),
            CacheInner::Lfu(cache) => cache.capacity(),
            CacheInner::Adaptive(cache) => cache.capacity(),
        }
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.insert(key, value),
            CacheInner::LruK(cache) => cache.insert(key, value),
            CacheInner::Lfu(cache) => cache.insert(key, value),
            CacheInner::Adaptive(cache) => cache.insert(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.get(key),
            CacheInner::LruK(cache) => cache.get(key),
            CacheInner::Lfu(cache) => cache.get(key),
            CacheInner::Adaptive(cache) => cache.get(key),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.clear(),
            CacheInner::LruK(cache) => cache.clear(),
            CacheInner::Lfu(cache) => cache.clear(),
            CacheInner::Adaptive(cache) => cache.clear(),
        }
    }
}

impl<K, V> MutableCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.remove(key),
            CacheInner::LruK(cache) => cache.remove(key),
            CacheInner::Lfu(cache) => cache.remove(key),
            CacheInner::Adaptive(cache) => cache.remove(key),
        }
    }
}

/// Builder carrying the capacity shared by every policy.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Creates a builder for caches holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the given policy, clamping out-of-range tuning
    /// parameters to their minima.
    pub fn build<K, V>(self, policy: PolicyKind) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            PolicyKind::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            PolicyKind::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LrukCache::new(self.capacity, history_capacity, k)),
            PolicyKind::Lfu { aging_threshold } => {
                CacheInner::Lfu(LfuCache::new(self.capacity, aging_threshold))
            },
            PolicyKind::Adaptive {
                transform_threshold,
            } => CacheInner::Adaptive(ArcCache::new(self.capacity, transform_threshold)),
        };
        Cache { inner }
    }

    /// Builds a cache with the given policy, rejecting out-of-range tuning
    /// parameters with [`CacheError::InvalidConfig`].
    pub fn try_build<K, V>(self, policy: PolicyKind) -> Result<Cache<K, V>, CacheError>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            PolicyKind::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            PolicyKind::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LrukCache::try_new(self.capacity, history_capacity, k)?),
            PolicyKind::Lfu { aging_threshold } => {
                CacheInner::Lfu(LfuCache::try_new(self.capacity, aging_threshold)?)
            },
            PolicyKind::Adaptive {
                transform_threshold,
            } => CacheInner::Adaptive(ArcCache::try_new(self.capacity, transform_threshold)?),
        };
        Ok(Cache { inner })
    }
}
