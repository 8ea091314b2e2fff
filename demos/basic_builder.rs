//! Example demonstrating the unified CacheBuilder API.
//!
//! Run with: cargo run --example basic_builder

use evictkit::builder::{CacheBuilder, CacheConfig, CachePolicy};
use evictkit::traits::CoreCache;

fn main() {
    println!("=== CacheBuilder Examples ===\n");

    for policy in [CachePolicy::Fifo, CachePolicy::Lru, CachePolicy::Lfu] {
        let mut cache = CacheBuilder::new(3).build::<u64, String>(policy);

        cache.insert(1, "one".to_string());
        cache.insert(2, "two".to_string());
        cache.insert(3, "three".to_string());

        // FIFO ignores this read; LRU and LFU protect key 1
        cache.get(&1);

        cache.insert(4, "four".to_string());

        println!("{policy}");
        println!("   contains 1? {}", cache.contains(&1));
        println!("   contains 2? {}", cache.contains(&2));
        println!("   contains 4? {}", cache.contains(&4));
        println!();
    }

    let config = CacheConfig {
        capacity: 128,
        policy: CachePolicy::Lfu,
        shards: 1,
    };
    match config.validate() {
        Ok(()) => {
            let cache = CacheBuilder::from_config(&config).build::<u64, u64>(config.policy);
            println!("built {:?} from config", cache);
        },
        Err(err) => println!("rejected config: {err}"),
    }
}

// Expected output:
// fifo: 1 evicted, 2 and 4 resident
// lru:  2 evicted, 1 and 4 resident
// lfu:  2 evicted, 1 and 4 resident
