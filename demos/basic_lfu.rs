use evictkit::policy::lfu::LfuCache;
use evictkit::traits::{CoreCache, LfuCacheTrait};

fn main() {
    let mut cache: LfuCache<&str, u32> = LfuCache::new(3);

    cache.insert("config", 1);
    cache.insert("session", 2);
    cache.insert("banner", 3);

    for _ in 0..3 {
        cache.get(&"config");
    }
    cache.get(&"session");

    println!("config frequency: {:?}", cache.frequency(&"config"));
    println!("session frequency: {:?}", cache.frequency(&"session"));

    // banner was read least, so it goes first
    cache.insert("avatar", 4);
    println!("contains banner? {}", cache.contains(&"banner"));

    // avatar and session both compete on recency once counts tie
    cache.get(&"avatar");
    println!("next victim: {:?}", cache.peek_lfu().map(|(k, _)| *k));
}

// Expected output:
// config frequency: Some(4)
// session frequency: Some(2)
// contains banner? false
// next victim: Some("session")
