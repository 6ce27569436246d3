#![no_main]

use libfuzzer_sys::fuzz_target;

use evictkit::ds::FrequencyBuckets;

// Property-based checks for the frequency index:
// - min_freq always names the lowest live frequency
// - pop_min drains in (frequency, arrival) order
// - halving preserves membership and floors counts at 1
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut buckets: FrequencyBuckets<u8> = FrequencyBuckets::new();

    for chunk in data.chunks(2) {
        let key = chunk[0] % 24;
        let op = chunk.get(1).copied().unwrap_or(0) % 6;
        match op {
            0 | 1 => {
                buckets.insert(key);
            },
            2 => {
                let before = buckets.frequency(&key);
                let after = buckets.touch(&key);
                if let (Some(before), Some(after)) = (before, after) {
                    assert!(after == before + 1 || before == u64::MAX);
                }
            },
            3 => {
                buckets.refresh(&key);
            },
            4 => {
                buckets.remove(&key);
            },
            _ => {
                let len_before = buckets.len();
                if let Some((_, freq)) = buckets.pop_min() {
                    assert_eq!(buckets.len(), len_before - 1);
                    // Nothing left below the popped frequency.
                    if let Some(min) = buckets.min_freq() {
                        assert!(min >= freq);
                    }
                }
            },
        }
        buckets.debug_validate_invariants();
    }

    let len_before = buckets.len();
    let total = buckets.halve_frequencies();
    assert_eq!(buckets.len(), len_before);
    assert!(total >= len_before as u64);
    buckets.debug_validate_invariants();
});
