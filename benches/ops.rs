use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use evictkit::policy::arc::ArcCache;
use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru::LruCore;
use evictkit::policy::lru_k::LrukCache;
use evictkit::traits::CoreCache;

const CAPACITY: usize = 1024;

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(CAPACITY);
                for i in 0..CAPACITY as u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..CAPACITY as u64 {
                    cache.insert(black_box(i + 10_000), i);
                    let _ = black_box(cache.get(&black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || {
                let mut cache = LruCore::new(CAPACITY);
                for i in 0..CAPACITY as u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..(4 * CAPACITY) as u64 {
                    cache.insert(black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_k_filtered_churn(c: &mut Criterion) {
    c.bench_function("lru_k_filtered_churn", |b| {
        b.iter_batched(
            || LrukCache::new(CAPACITY, 2 * CAPACITY, 2),
            |mut cache| {
                // One-shot keys: all stay behind the filter.
                for i in 0..(2 * CAPACITY) as u64 {
                    cache.insert(black_box(i), i);
                }
                // Re-referenced keys: admitted on the second touch.
                for i in 0..CAPACITY as u64 {
                    cache.insert(black_box(i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_hot_hits(c: &mut Criterion) {
    c.bench_function("lfu_hot_hits", |b| {
        b.iter_batched(
            || {
                let mut cache = LfuCache::new(CAPACITY, 1_000_000);
                for i in 0..CAPACITY as u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..CAPACITY as u64 {
                    let _ = black_box(cache.get(&black_box(i % 64)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_aging_pass(c: &mut Criterion) {
    c.bench_function("lfu_aging_pass", |b| {
        b.iter_batched(
            || {
                // Threshold low enough that the measured loop ages repeatedly.
                let mut cache = LfuCache::new(CAPACITY, 2);
                for i in 0..CAPACITY as u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..(4 * CAPACITY) as u64 {
                    let _ = black_box(cache.get(&black_box(i % 128)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_arc_mixed(c: &mut Criterion) {
    c.bench_function("arc_mixed", |b| {
        b.iter_batched(
            || ArcCache::new(CAPACITY, 2),
            |mut cache| {
                for i in 0..(2 * CAPACITY) as u64 {
                    let key = black_box(i % 1536);
                    if i % 3 == 0 {
                        cache.insert(key, i);
                    } else {
                        let _ = black_box(cache.get(&key));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_eviction_churn,
    bench_lru_k_filtered_churn,
    bench_lfu_hot_hits,
    bench_lfu_aging_pass,
    bench_arc_mixed,
);
criterion_main!(benches);
