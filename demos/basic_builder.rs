//! One call site, four policies: the builder keeps the policy choice out of
//! the code that uses the cache.

use evictkit::builder::{CacheBuilder, PolicyKind};
use evictkit::traits::CoreCache;

fn exercise(policy: PolicyKind) {
    let mut cache = CacheBuilder::new(64).build::<u64, String>(policy);

    for i in 0..32 {
        cache.insert(i, format!("value-{i}"));
    }
    // Re-reference a handful of keys so frequency-aware policies notice.
    for _ in 0..3 {
        for i in 0..4 {
            let _ = cache.get(&i);
        }
    }

    let resident = (0..32).filter(|i| cache.get(i).is_some()).count();
    println!("{policy:?}: {resident}/32 resident");
}

fn main() {
    exercise(PolicyKind::Lru);
    exercise(PolicyKind::LruK {
        history_capacity: 64,
        k: 2,
    });
    exercise(PolicyKind::Lfu { aging_threshold: 8 });
    exercise(PolicyKind::Adaptive {
        transform_threshold: 2,
    });
}
