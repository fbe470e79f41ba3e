//! Cache Statistics Module
//!
//! Tracks hits, misses, TTL evictions and disk traffic for one engine.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Loads answered from memory or disk
    pub hits: u64,
    /// Loads that found nothing usable (absent, expired or gated)
    pub misses: u64,
    /// Entries removed because their TTL had elapsed
    pub expirations: u64,
    /// Loads that had to go to disk
    pub disk_reads: u64,
    /// Successful saves
    pub writes: u64,
    /// Current number of entries in the memory layer
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no loads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Adds a batch of TTL evictions, as removed by one purge sweep.
    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    pub fn record_disk_read(&mut self) {
        self.disk_reads += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
