//! Minimal LRU usage: inserts, hits refreshing recency, and eviction.

use evictkit::policy::lru::LruCore;
use evictkit::traits::{CoreCache, ReadOnlyCache};

fn main() {
    let mut cache = LruCore::new(3);

    cache.insert("alpha", 1);
    cache.insert("beta", 2);
    cache.insert("gamma", 3);

    // Touch "alpha" so it is no longer the eviction candidate.
    cache.get(&"alpha");

    // Over capacity: "beta" is now the least recently used.
    cache.insert("delta", 4);

    for key in ["alpha", "beta", "gamma", "delta"] {
        match cache.get(&key) {
            Some(value) => println!("{key}: {value}"),
            None => println!("{key}: evicted"),
        }
    }
    println!("{} of {} slots used", cache.len(), cache.capacity());
}
