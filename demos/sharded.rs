//! Several threads sharing one sharded LRU cache.
//!
//! Run with: cargo run --example sharded

use std::sync::Arc;
use std::thread;

use evictkit::builder::{CacheBuilder, CachePolicy};

fn main() {
    let cache = Arc::new(
        CacheBuilder::new(1_000)
            .shards(8)
            .try_build_sharded::<u64, String>(CachePolicy::Lru)
            .expect("1000 entries split over 8 shards"),
    );

    let handles: Vec<_> = (0..4u64)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut hits = 0u32;
                for i in 0..5_000u64 {
                    let key = (i * 7 + worker) % 1_500;
                    match cache.get(&key) {
                        Some(_) => hits += 1,
                        None => {
                            cache.insert(key, format!("value-{key}"));
                        },
                    }
                }
                hits
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let hits = handle.join().expect("worker panicked");
        println!("worker {worker}: {hits} hits");
    }

    println!("{cache:?}");
    println!("resident: {} / {}", cache.len(), cache.capacity());
    match cache.check_invariants() {
        Ok(()) => println!("invariants hold"),
        Err(err) => println!("invariant violation: {err}"),
    }
}
