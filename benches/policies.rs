use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use evictkit::builder::{Cache, CacheBuilder, CachePolicy};
use evictkit::traits::{CoreCache, MutableCache};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 1024;
const OPS: u64 = 4096;
const POLICIES: [CachePolicy; 3] = [CachePolicy::Fifo, CachePolicy::Lru, CachePolicy::Lfu];

fn warm(policy: CachePolicy) -> Cache<u64, u64> {
    let mut cache = CacheBuilder::new(CAPACITY).build(policy);
    for i in 0..CAPACITY as u64 {
        cache.insert(i, i);
    }
    cache
}

/// 80% of accesses go to a hot set a tenth the size of the cache.
fn skewed_keys(seed: u64, len: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let hot = CAPACITY as u64 / 10;
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.8) {
                rng.gen_range(0..hot)
            } else {
                rng.gen_range(0..CAPACITY as u64 * 4)
            }
        })
        .collect()
}

fn bench_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_get");
    group.throughput(Throughput::Elements(OPS * 2));
    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter_batched(
                || warm(policy),
                |mut cache| {
                    for i in 0..OPS {
                        cache.insert(black_box(i + 10_000), i);
                        let _ = black_box(cache.get(&black_box(i)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_hit_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));
    for policy in POLICIES {
        let mut cache = warm(policy);
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, _| {
            b.iter(|| {
                for i in 0..OPS {
                    let _ = black_box(cache.get(&(i % CAPACITY as u64)));
                }
            })
        });
    }
    group.finish();
}

fn bench_skewed_workload(c: &mut Criterion) {
    let keys = skewed_keys(42, OPS);
    let mut group = c.benchmark_group("skewed_read_through");
    group.throughput(Throughput::Elements(OPS));
    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter_batched(
                || warm(policy),
                |mut cache| {
                    for &key in &keys {
                        if cache.get(&key).is_none() {
                            cache.insert(key, key);
                        }
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_reinsert");
    group.throughput(Throughput::Elements(CAPACITY as u64 * 2));
    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter_batched(
                || warm(policy),
                |mut cache| {
                    for i in 0..CAPACITY as u64 {
                        let _ = black_box(cache.remove(&i));
                        cache.insert(i, i);
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

#[cfg(feature = "concurrency")]
fn bench_sharded(c: &mut Criterion) {
    use std::sync::Arc;
    use std::thread;

    let mut group = c.benchmark_group("sharded_4_threads");
    group.throughput(Throughput::Elements(OPS * 4));
    for shards in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &shards, |b, &shards| {
            let cache = Arc::new(
                CacheBuilder::new(CAPACITY)
                    .shards(shards)
                    .try_build_sharded::<u64, u64>(CachePolicy::Lru)
                    .unwrap(),
            );
            b.iter(|| {
                let handles: Vec<_> = (0..4u64)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for key in skewed_keys(t, OPS) {
                                if cache.get(&key).is_none() {
                                    cache.insert(key, key);
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            })
        });
    }
    group.finish();
}

#[cfg(not(feature = "concurrency"))]
fn bench_sharded(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_insert_get,
    bench_hit_path,
    bench_skewed_workload,
    bench_remove_reinsert,
    bench_sharded
);
criterion_main!(benches);
