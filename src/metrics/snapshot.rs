/// Counters plus gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,
    pub removes: u64,
    pub clears: u64,

    // gauges
    pub cache_len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before any `get`.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    /// Folds another snapshot into this one (used to total sharded caches).
    pub fn merge(&mut self, other: &CacheMetricsSnapshot) {
        self.get_calls += other.get_calls;
        self.get_hits += other.get_hits;
        self.get_misses += other.get_misses;
        self.insert_calls += other.insert_calls;
        self.insert_updates += other.insert_updates;
        self.insert_new += other.insert_new;
        self.evicted_entries += other.evicted_entries;
        self.removes += other.removes;
        self.clears += other.clears;
        self.cache_len += other.cache_len;
        self.capacity += other.capacity;
    }
}
