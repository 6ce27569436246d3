//! Adaptive cache walkthrough: promotion into the frequency arm and
//! ghost-driven capacity movement.

use evictkit::policy::arc::ArcCache;
use evictkit::traits::{CoreCache, ReadOnlyCache};

fn main() {
    let mut cache = ArcCache::new(4, 2);

    // Fresh entries land in the recency arm.
    for (key, value) in [("a", 1), ("b", 2)] {
        cache.insert(key, value);
    }
    println!(
        "after inserts: recency={} frequency={}",
        cache.recency_len(),
        cache.frequency_len()
    );

    // A second read hit transforms "a" into the frequency arm.
    cache.get(&"a");
    cache.get(&"a");
    println!(
        "after re-reads: recency={} frequency={}",
        cache.recency_len(),
        cache.frequency_len()
    );

    // Overflow the recency arm so a key lands in its ghost list, then miss
    // on it: one slot of capacity moves toward recency.
    cache.insert("c", 3);
    cache.insert("d", 4);
    cache.insert("e", 5);
    let evicted = ["b", "c", "d"]
        .into_iter()
        .find(|key| !cache.contains(key))
        .expect("one of the recency-arm keys overflowed");
    println!("ghost-tracked after overflow: {evicted}");

    let before = (cache.recency_capacity(), cache.frequency_capacity());
    let _ = cache.get(&evicted); // still a miss, but the partition learns
    let after = (cache.recency_capacity(), cache.frequency_capacity());
    println!("partition: {before:?} -> {after:?}");
}
