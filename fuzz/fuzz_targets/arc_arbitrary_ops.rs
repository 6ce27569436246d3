#![no_main]

use libfuzzer_sys::fuzz_target;

use evictkit::policy::arc::ArcCache;
use evictkit::traits::{CoreCache, MutableCache, ReadOnlyCache};

// Arbitrary op streams against the adaptive cache. The interesting
// properties: arm capacities always sum to the constructed total, arms and
// ghosts stay disjoint, and ghost-driven adaptation never loses entries.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let total_capacity = (data[0] % 17) as usize;
    let threshold = u32::from(data[1] % 4) + 1;
    let mut cache: ArcCache<u8, u32> = ArcCache::new(total_capacity, threshold);

    for chunk in data[2..].chunks(2) {
        let key = chunk[0] % 32;
        let op = chunk.get(1).copied().unwrap_or(0) % 6;
        match op {
            0 | 1 => {
                cache.insert(key, u32::from(key));
            },
            2 | 3 => {
                let _ = cache.get(&key);
            },
            4 => {
                cache.remove(&key);
            },
            _ => {
                // Forced miss in a disjoint key range: may hit a ghost.
                let _ = cache.get(&(key | 0x80));
            },
        }

        cache.debug_validate_invariants();
        assert_eq!(
            cache.recency_capacity() + cache.frequency_capacity(),
            total_capacity
        );
        assert!(cache.len() <= total_capacity);
    }

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(
        cache.recency_capacity() + cache.frequency_capacity(),
        total_capacity
    );
});
