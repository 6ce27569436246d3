#![no_main]

use libfuzzer_sys::fuzz_target;

use evictkit::policy::lru::LruCore;
use evictkit::traits::{CoreCache, MutableCache, ReadOnlyCache};

// Arbitrary op streams against LruCore: invariants must hold after every
// operation regardless of input.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] % 17) as usize;
    let mut cache: LruCore<u8, u16> = LruCore::new(capacity);

    for chunk in data[1..].chunks(2) {
        let key = chunk[0] % 32;
        let op = chunk.get(1).copied().unwrap_or(0) % 6;
        match op {
            0 | 1 => {
                cache.insert(key, u16::from(key) * 3);
            },
            2 => {
                let _ = cache.get(&key);
            },
            3 => {
                cache.remove(&key);
            },
            4 => {
                cache.touch(&key);
            },
            _ => {
                let _ = cache.pop_lru();
            },
        }

        cache.debug_validate_invariants();
        assert!(cache.len() <= capacity);
    }

    cache.clear();
    assert!(cache.is_empty());
});
