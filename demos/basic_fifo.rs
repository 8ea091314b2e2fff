use evictkit::policy::fifo::FifoCache;
use evictkit::traits::{CoreCache, FifoCacheTrait};

fn main() {
    let mut cache: FifoCache<&str, u32> = FifoCache::new(2);

    cache.insert("first", 1);
    cache.insert("second", 2);

    // reads never change insertion order
    cache.get(&"first");
    cache.get(&"first");

    cache.insert("third", 3);

    println!("contains first? {}", cache.contains(&"first"));
    println!("oldest: {:?}", cache.peek_oldest());
    println!("age of third: {:?}", cache.age_rank(&"third"));
}

// Expected output:
// contains first? false
// oldest: Some(("second", 2))
// age of third: Some(1)
