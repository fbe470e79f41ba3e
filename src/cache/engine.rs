//! Cache Engine Module
//!
//! Two-tier cache: an in-memory map in front of one JSON file per key.
//! Every call consults the allowlist first; memory is read before disk and
//! saves write disk before mirroring into memory.
//!
//! The memory lock is only held to read or replace a whole slot, never
//! across storage I/O, so concurrent calls for the same key race at the
//! storage layer and the last one to finish wins.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{
    current_timestamp_ms, AllowList, CacheEntry, CacheStats, FsStore, KeyDeriver, PersistentStore,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{RequestOptions, Ttl};

/// Entries loaded or saved since construction, plus counters.
#[derive(Debug, Default)]
struct MemoryLayer {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl MemoryLayer {
    fn remove_if_expired(&mut self, key: &str, now: i64) {
        if self.entries.get(key).is_some_and(|e| !e.is_valid_at(now)) {
            self.entries.remove(key);
        }
        self.stats.set_total_entries(self.entries.len());
    }
}

// == Api Cache ==
/// Memory + disk cache for API responses.
#[derive(Debug)]
pub struct ApiCache<S = FsStore> {
    config: Config,
    gate: AllowList,
    keys: KeyDeriver,
    store: S,
    memory: RwLock<MemoryLayer>,
}

impl ApiCache<FsStore> {
    // == Constructor ==
    /// Creates an engine storing entries under `config.location`.
    pub fn new(config: Config) -> Self {
        Self::with_store(config, FsStore::new())
    }
}

impl<S: PersistentStore> ApiCache<S> {
    /// Creates an engine over a custom store.
    pub fn with_store(config: Config, store: S) -> Self {
        Self {
            gate: AllowList::new(config.allowed.clone()),
            keys: KeyDeriver::new(config.namespace),
            config,
            store,
            memory: RwLock::new(MemoryLayer::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `operation` is cacheable at all.
    pub fn is_allowed(&self, operation: &str) -> bool {
        self.gate.is_allowed(operation)
    }

    /// Cache key (file name) for an operation call. Does not consult the allowlist.
    pub fn key_for(&self, operation: &str, options: &RequestOptions) -> String {
        self.keys.derive(operation, options)
    }

    /// Full path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.config.location.join(key)
    }

    // == Load ==
    /// Returns a copy of the cached payload, or `None` on a miss.
    ///
    /// Gated operations, absent keys and expired entries are all misses.
    /// Expired entries are dropped from memory and disk before returning.
    /// I/O failures and corrupt files are errors.
    pub async fn load(
        &self,
        operation: &str,
        options: &RequestOptions,
    ) -> Result<Option<Value>> {
        if !self.is_allowed(operation) {
            debug!(operation, "Operation not cacheable, treating load as miss");
            self.memory.write().await.stats.record_miss();
            return Ok(None);
        }

        let key = self.key_for(operation, options);
        let path = self.entry_path(&key);

        let cached = self.memory.read().await.entries.get(&key).cloned();
        if let Some(entry) = cached {
            let now = current_timestamp_ms();
            if entry.is_valid_at(now) {
                debug!(operation, %key, "Memory hit");
                self.memory.write().await.stats.record_hit();
                return Ok(Some(entry.data));
            }

            debug!(operation, %key, "Memory entry expired, evicting");
            {
                let mut memory = self.memory.write().await;
                memory.remove_if_expired(&key, now);
                memory.stats.record_expiration();
                memory.stats.record_miss();
            }
            self.remove_if_stale(&path, now).await?;
            return Ok(None);
        }

        self.memory.write().await.stats.record_disk_read();
        let Some(bytes) = self.store.read(&path).await? else {
            debug!(operation, %key, "Miss");
            self.memory.write().await.stats.record_miss();
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::serialization(&path, e))?;

        let now = current_timestamp_ms();
        if !entry.is_valid_at(now) {
            debug!(operation, %key, "Disk entry expired, removing");
            self.remove_if_stale(&path, now).await?;
            let mut memory = self.memory.write().await;
            memory.stats.record_expiration();
            memory.stats.record_miss();
            return Ok(None);
        }

        debug!(operation, %key, "Disk hit");
        let data = entry.data.clone();
        let mut memory = self.memory.write().await;
        memory.entries.insert(key, entry);
        memory.stats.record_hit();
        let count = memory.entries.len();
        memory.stats.set_total_entries(count);
        Ok(Some(data))
    }

    /// Like [`load`](Self::load), decoding the payload into `T`.
    pub async fn load_as<T: DeserializeOwned>(
        &self,
        operation: &str,
        options: &RequestOptions,
    ) -> Result<Option<T>> {
        let Some(data) = self.load(operation, options).await? else {
            return Ok(None);
        };
        let path = self.entry_path(&self.key_for(operation, options));
        serde_json::from_value(data)
            .map(Some)
            .map_err(|e| CacheError::serialization(path, e))
    }

    // == Save ==
    /// Writes the payload to disk, then mirrors it into memory.
    ///
    /// Returns `Ok(false)` without touching storage when the operation is
    /// not cacheable. A failed write leaves the memory layer untouched.
    pub async fn save<T: Serialize + ?Sized>(
        &self,
        operation: &str,
        options: &RequestOptions,
        payload: &T,
        ttl: Ttl,
    ) -> Result<bool> {
        if !self.is_allowed(operation) {
            debug!(operation, "Operation not cacheable, skipping save");
            return Ok(false);
        }

        let key = self.key_for(operation, options);
        let path = self.entry_path(&key);

        let data = serde_json::to_value(payload)
            .map_err(|e| CacheError::serialization(&path, e))?;
        let entry = CacheEntry::new(
            data,
            ttl,
            self.config.timeout_for(operation),
            current_timestamp_ms(),
        );
        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| CacheError::serialization(&path, e))?;

        self.store.write(&path, &bytes).await?;

        debug!(operation, %key, %ttl, "Saved");
        let mut memory = self.memory.write().await;
        memory.entries.insert(key, entry);
        memory.stats.record_write();
        let count = memory.entries.len();
        memory.stats.set_total_entries(count);
        Ok(true)
    }

    // == Clear ==
    /// Removes the entry from memory and disk.
    ///
    /// Returns `Ok(false)` when the operation is not cacheable; clearing a
    /// key that was never saved succeeds.
    pub async fn clear(&self, operation: &str, options: &RequestOptions) -> Result<bool> {
        if !self.is_allowed(operation) {
            debug!(operation, "Operation not cacheable, nothing to clear");
            return Ok(false);
        }

        let key = self.key_for(operation, options);
        let path = self.entry_path(&key);
        {
            let mut memory = self.memory.write().await;
            memory.entries.remove(&key);
            let count = memory.entries.len();
            memory.stats.set_total_entries(count);
        }
        self.store.remove(&path).await?;

        debug!(operation, %key, "Cleared");
        Ok(true)
    }

    // == Purge Expired ==
    /// Removes every expired entry from memory and from the storage
    /// directory. Returns the number of distinct keys removed.
    ///
    /// Files that cannot be parsed are logged and left in place; the sweep
    /// carries on with the remaining files. Runs only when called.
    pub async fn purge_expired(&self) -> Result<usize> {
        let now = current_timestamp_ms();
        let mut removed: HashSet<String> = HashSet::new();

        let expired_in_memory: Vec<String> = {
            let mut memory = self.memory.write().await;
            let keys: Vec<String> = memory
                .entries
                .iter()
                .filter(|(_, entry)| !entry.is_valid_at(now))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &keys {
                memory.entries.remove(key);
            }
            let count = memory.entries.len();
            memory.stats.set_total_entries(count);
            memory.stats.record_expirations(keys.len() as u64);
            keys
        };

        for key in expired_in_memory {
            self.store.remove(&self.entry_path(&key)).await?;
            removed.insert(key);
        }

        let mut unreadable = 0usize;
        for path in self.store.list(&self.config.location).await? {
            let Some(bytes) = self.store.read(&path).await? else {
                continue;
            };
            let entry: CacheEntry = match serde_json::from_slice(&bytes) {
                Ok(entry) => entry,
                Err(e) => {
                    let err = CacheError::serialization(&path, e);
                    warn!(error = %err, "TTL purge: skipping unreadable entry");
                    unreadable += 1;
                    continue;
                }
            };
            if entry.is_valid_at(now) {
                continue;
            }

            self.store.remove(&path).await?;
            if let Some(key) = path.file_name().map(|n| n.to_string_lossy().into_owned()) {
                let mut memory = self.memory.write().await;
                memory.remove_if_expired(&key, now);
                if removed.insert(key) {
                    memory.stats.record_expirations(1);
                }
            }
        }

        let count = removed.len();
        if count > 0 || unreadable > 0 {
            info!(
                "TTL purge: removed {} expired entries, skipped {} unreadable",
                count, unreadable
            );
        } else {
            debug!("TTL purge: no expired entries found");
        }
        Ok(count)
    }

    /// Deletes the file at `path` unless it now holds an entry valid at
    /// `now`, which happens when a save lands between the expiry check and
    /// the delete. The window between this read and the delete remains.
    async fn remove_if_stale(&self, path: &Path, now: i64) -> Result<bool> {
        let Some(bytes) = self.store.read(path).await? else {
            return Ok(false);
        };
        let entry: CacheEntry = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::serialization(path, e))?;
        if entry.is_valid_at(now) {
            debug!(path = %path.display(), "Entry replaced since expiry check, keeping file");
            return Ok(false);
        }
        self.store.remove(path).await?;
        Ok(true)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let memory = self.memory.read().await;
        let mut stats = memory.stats.clone();
        stats.set_total_entries(memory.entries.len());
        stats
    }

    /// Number of entries currently held in memory.
    pub async fn len(&self) -> usize {
        self.memory.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::Expiry;

    /// FsStore with switchable failures.
    #[derive(Default)]
    struct FlakyStore {
        inner: FsStore,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        fail_removes: AtomicBool,
    }

    fn injected(path: &Path) -> CacheError {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "injected");
        CacheError::storage(path, source)
    }

    #[async_trait]
    impl PersistentStore for FlakyStore {
        async fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(injected(path));
            }
            self.inner.read(path).await
        }

        async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(injected(path));
            }
            self.inner.write(path, bytes).await
        }

        async fn remove(&self, path: &Path) -> Result<()> {
            if self.fail_removes.load(Ordering::SeqCst) {
                return Err(injected(path));
            }
            self.inner.remove(path).await
        }

        async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
            self.inner.list(dir).await
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        Config::default()
            .with_location(dir.path())
            .allow("API_AddRecord", false)
    }

    fn create_test_cache() -> (ApiCache, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        (ApiCache::new(test_config(&dir)), dir)
    }

    fn schema_opts() -> RequestOptions {
        RequestOptions::new().for_db("abc")
    }

    fn path_of(cache: &ApiCache, operation: &str, options: &RequestOptions) -> PathBuf {
        cache.entry_path(&cache.key_for(operation, options))
    }

    fn write_entry(path: &Path, entry: &CacheEntry) {
        let bytes = serde_json::to_vec(entry).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    fn file_count(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let (cache, dir) = create_test_cache();
        let payload = json!({"tables": []});

        let saved = cache
            .save("API_GetSchema", &schema_opts(), &payload, Ttl::Default)
            .await
            .unwrap();
        assert!(saved);

        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, Some(payload));

        let key = cache.key_for("API_GetSchema", &schema_opts());
        assert!(dir.path().join(key).exists());
    }

    #[tokio::test]
    async fn test_load_other_tenant_misses() {
        let (cache, _dir) = create_test_cache();
        let payload = json!({"tables": []});
        cache
            .save("API_GetSchema", &schema_opts(), &payload, Ttl::Default)
            .await
            .unwrap();

        let other = RequestOptions::new().for_db("xyz");
        assert_eq!(cache.load("API_GetSchema", &other).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_returned_payload_is_a_copy() {
        let (cache, _dir) = create_test_cache();
        let payload = json!({"tables": ["t1"]});
        cache
            .save("API_GetSchema", &schema_opts(), &payload, Ttl::Default)
            .await
            .unwrap();

        let mut first = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        first.as_mut().unwrap()["tables"] = json!(["mutated"]);

        let second = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(second, Some(payload));
    }

    #[tokio::test]
    async fn test_disk_entry_loaded_into_fresh_engine() {
        let dir = TempDir::new().unwrap();
        let opts = schema_opts().with("userid", "u1");
        let first = ApiCache::new(test_config(&dir));
        first
            .save("API_GetUserRole", &opts, &json!("admin"), Ttl::Never)
            .await
            .unwrap();

        let second = ApiCache::new(test_config(&dir));
        assert!(second.is_empty().await);

        let loaded = second.load("API_GetUserRole", &opts).await.unwrap();
        assert_eq!(loaded, Some(json!("admin")));
        assert_eq!(second.len().await, 1);

        let stats = second.stats().await;
        assert_eq!(stats.disk_reads, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_memory_hit_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let cache = ApiCache::with_store(test_config(&dir), FlakyStore::default());
        cache
            .save("API_GetSchema", &schema_opts(), &json!(1), Ttl::Default)
            .await
            .unwrap();

        cache.store.fail_reads.store(true, Ordering::SeqCst);
        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, Some(json!(1)));
        assert_eq!(cache.stats().await.disk_reads, 0);
    }

    #[tokio::test]
    async fn test_expired_memory_entry_is_evicted_everywhere() {
        let (cache, _dir) = create_test_cache();
        cache
            .save("API_DoQuery", &schema_opts(), &json!([1]), Ttl::Millis(0))
            .await
            .unwrap();
        let path = path_of(&cache, "API_DoQuery", &schema_opts());
        assert!(path.exists());

        tokio::time::sleep(Duration::from_millis(5)).await;

        let loaded = cache.load("API_DoQuery", &schema_opts()).await.unwrap();
        assert_eq!(loaded, None);
        assert!(!path.exists());
        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test]
    async fn test_expired_memory_entry_keeps_newer_file() {
        let dir = TempDir::new().unwrap();
        let stale = ApiCache::new(test_config(&dir));
        let fresh = ApiCache::new(test_config(&dir));
        let opts = schema_opts();

        stale
            .save("API_GetSchema", &opts, &json!("old"), Ttl::Millis(0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        // another writer replaces the file after the memory copy went stale
        fresh
            .save("API_GetSchema", &opts, &json!("new"), Ttl::Never)
            .await
            .unwrap();

        assert_eq!(stale.load("API_GetSchema", &opts).await.unwrap(), None);
        let path = path_of(&stale, "API_GetSchema", &opts);
        assert!(path.exists(), "Newer entry on disk should survive eviction");

        let reloaded = stale.load("API_GetSchema", &opts).await.unwrap();
        assert_eq!(reloaded, Some(json!("new")));
    }

    #[tokio::test]
    async fn test_expired_disk_entry_is_removed() {
        let (cache, _dir) = create_test_cache();
        let path = path_of(&cache, "API_GetSchema", &schema_opts());
        let stale = CacheEntry {
            exp: Expiry::At(current_timestamp_ms() - 1),
            data: json!("old"),
        };
        write_entry(&path, &stale);

        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, None);
        assert!(!path.exists());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_disk_entry_is_an_error() {
        let (cache, _dir) = create_test_cache();
        let path = path_of(&cache, "API_GetSchema", &schema_opts());
        std::fs::write(&path, b"{not json").unwrap();

        let result = cache.load("API_GetSchema", &schema_opts()).await;
        assert!(matches!(result, Err(CacheError::Serialization { .. })));
        // corrupt data is left in place for inspection
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_read_failure_is_not_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ApiCache::with_store(test_config(&dir), FlakyStore::default());
        cache.store.fail_reads.store(true, Ordering::SeqCst);

        let result = cache.load("API_GetSchema", &schema_opts()).await;
        assert!(matches!(result, Err(CacheError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let cache = ApiCache::with_store(test_config(&dir), FlakyStore::default());
        cache
            .save("API_GetSchema", &schema_opts(), &json!("v1"), Ttl::Default)
            .await
            .unwrap();

        cache.store.fail_writes.store(true, Ordering::SeqCst);
        let result = cache
            .save("API_GetSchema", &schema_opts(), &json!("v2"), Ttl::Default)
            .await;
        assert!(matches!(result, Err(CacheError::Storage { .. })));

        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, Some(json!("v1")));
        assert_eq!(cache.stats().await.writes, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_both_layers() {
        let (cache, _dir) = create_test_cache();
        cache
            .save("API_GetSchema", &schema_opts(), &json!(1), Ttl::Never)
            .await
            .unwrap();
        let path = path_of(&cache, "API_GetSchema", &schema_opts());

        assert!(cache.clear("API_GetSchema", &schema_opts()).await.unwrap());
        assert!(!path.exists());
        assert!(cache.is_empty().await);

        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_clear_missing_key_succeeds() {
        let (cache, _dir) = create_test_cache();
        assert!(cache.clear("API_GetSchema", &schema_opts()).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_propagates_remove_failure() {
        let dir = TempDir::new().unwrap();
        let cache = ApiCache::with_store(test_config(&dir), FlakyStore::default());
        cache.store.fail_removes.store(true, Ordering::SeqCst);

        let result = cache.clear("API_GetSchema", &schema_opts()).await;
        assert!(matches!(result, Err(CacheError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_gated_operations() {
        let (cache, dir) = create_test_cache();
        let opts = schema_opts();

        let one = json!(1);
        let saved = cache.save("API_AddRecord", &opts, &one, Ttl::Never);
        assert!(!saved.await.unwrap());
        let saved = cache.save("API_Unknown", &opts, &one, Ttl::Never);
        assert!(!saved.await.unwrap());
        assert_eq!(file_count(&dir), 0);

        // a file planted for a gated operation is neither served nor cleared
        let path = path_of(&cache, "API_AddRecord", &opts);
        let entry = CacheEntry {
            exp: Expiry::Never,
            data: json!("planted"),
        };
        write_entry(&path, &entry);

        assert_eq!(cache.load("API_AddRecord", &opts).await.unwrap(), None);
        assert!(!cache.clear("API_AddRecord", &opts).await.unwrap());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_load_as_typed() {
        #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
        struct Role {
            id: u32,
            name: String,
        }

        let (cache, _dir) = create_test_cache();
        let opts = schema_opts().with("userid", "u9");
        let role = Role {
            id: 12,
            name: "Viewer".to_string(),
        };
        cache
            .save("API_GetUserRole", &opts, &role, Ttl::Default)
            .await
            .unwrap();

        let loaded: Option<Role> = cache.load_as("API_GetUserRole", &opts).await.unwrap();
        assert_eq!(loaded, Some(role));

        let wrong: Result<Option<u64>> = cache.load_as("API_GetUserRole", &opts).await;
        assert!(matches!(wrong, Err(CacheError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_default_ttl_comes_from_config() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir).with_timeout("API_GetSchema", 0);
        let cache = ApiCache::new(config);
        cache
            .save("API_GetSchema", &schema_opts(), &json!(1), Ttl::Default)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let loaded = cache.load("API_GetSchema", &schema_opts()).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (cache, dir) = create_test_cache();
        let live = schema_opts();
        let stale_mem = RequestOptions::new().for_db("m");
        cache
            .save("API_GetSchema", &live, &json!(1), Ttl::Never)
            .await
            .unwrap();
        cache
            .save("API_GetSchema", &stale_mem, &json!(2), Ttl::Millis(0))
            .await
            .unwrap();

        // expired file that never went through this engine
        let stale_disk = RequestOptions::new().for_db("d");
        let entry = CacheEntry {
            exp: Expiry::At(1),
            data: json!(3),
        };
        let stale_path = path_of(&cache, "API_GetSchema", &stale_disk);
        write_entry(&stale_path, &entry);

        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(cache.purge_expired().await.unwrap(), 2);
        assert_eq!(file_count(&dir), 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.stats().await.expirations, 2);

        let loaded = cache.load("API_GetSchema", &live).await.unwrap();
        assert_eq!(loaded, Some(json!(1)));
        assert_eq!(cache.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_skips_unreadable_files() {
        let (cache, dir) = create_test_cache();
        cache
            .save("API_GetSchema", &schema_opts(), &json!(1), Ttl::Millis(0))
            .await
            .unwrap();

        // sorts ahead of every uuid-named entry
        let corrupt = dir.path().join("00000000-corrupt.json");
        std::fs::write(&corrupt, b"{oops").unwrap();
        let stale_opts = RequestOptions::new().for_db("d");
        let stale_path = path_of(&cache, "API_GetSchema", &stale_opts);
        let entry = CacheEntry {
            exp: Expiry::At(1),
            data: json!("old"),
        };
        write_entry(&stale_path, &entry);

        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(cache.purge_expired().await.unwrap(), 2);
        assert!(!stale_path.exists());
        assert!(corrupt.exists(), "Unreadable file should be left in place");
        assert_eq!(cache.stats().await.expirations, 2);
        assert!(cache.is_empty().await);
    }
}
