#![no_main]

use libfuzzer_sys::fuzz_target;

use evictkit::policy::lfu::LfuCache;
use evictkit::traits::{CoreCache, MutableCache, ReadOnlyCache};

// Arbitrary op streams against LfuCache with a byte-derived aging threshold,
// so aggressive aging interleaves with inserts, hits, and removals.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let capacity = (data[0] % 13) as usize;
    let aging_threshold = u64::from(data[1] % 8) + 1;
    let mut cache: LfuCache<u8, u32> = LfuCache::new(capacity, aging_threshold);

    for chunk in data[2..].chunks(2) {
        let key = chunk[0] % 24;
        let op = chunk.get(1).copied().unwrap_or(0) % 5;
        match op {
            0 | 1 => {
                cache.insert(key, u32::from(key));
            },
            2 | 3 => {
                let _ = cache.get(&key);
            },
            _ => {
                cache.remove(&key);
            },
        }

        cache.debug_validate_invariants();
        assert!(cache.len() <= capacity);

        // A resident entry always has a frequency of at least 1.
        if cache.contains(&key) {
            assert!(cache.frequency(&key).unwrap() >= 1);
        }
    }
});
