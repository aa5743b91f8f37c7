//! Bounded, time-expiring result cache keyed on request fingerprints.
//!
//! Entries expire after a TTL; expired entries are indistinguishable from
//! absent ones (a `get` purges and misses). When the cache is full, `put`
//! evicts the entry with the oldest *insertion* timestamp — deliberately
//! not least-recently-used: repeated reads of a hot entry must not extend
//! its residency past natural expiry, and under a read-heavy workload
//! insertion-order FIFO and access-order LRU diverge. Overwriting an
//! existing key refreshes its insertion timestamp.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::telemetry;
use crate::types::GeneratedArticle;

/// Result cache configuration.
///
/// ```rust
/// # use trendgen::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .capacity(256)
///     .ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 128. A capacity of 0
    /// disables caching (every `put` is a no-op).
    pub capacity: usize,
    /// Time-to-live for cached entries. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl CacheConfig {
    /// Create a config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    article: GeneratedArticle,
    inserted_at: Instant,
}

/// TTL-aware FIFO-by-insertion article cache.
pub struct ArticleCache {
    config: CacheConfig,
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl ArticleCache {
    /// Create a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a cached article by fingerprint.
    ///
    /// Expired entries are purged and reported as misses. Emits cache
    /// hit/miss metrics.
    pub fn get(&self, fingerprint: u64) -> Option<GeneratedArticle> {
        self.get_at(fingerprint, Instant::now())
    }

    /// Insert (or overwrite) an article under `fingerprint`.
    pub fn put(&self, fingerprint: u64, article: GeneratedArticle) {
        self.put_at(fingerprint, article, Instant::now());
    }

    /// Number of entries currently stored, including not-yet-purged
    /// expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_at(&self, fingerprint: u64, now: Instant) -> Option<GeneratedArticle> {
        let mut entries = self.lock();
        match entries.get(&fingerprint) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.config.ttl => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.article.clone())
            }
            Some(_) => {
                entries.remove(&fingerprint);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    fn put_at(&self, fingerprint: u64, article: GeneratedArticle, now: Instant) {
        if self.config.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        if !entries.contains_key(&fingerprint) && entries.len() >= self.config.capacity {
            // Prefer dropping already-expired entries before evicting a
            // live one by insertion age.
            entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.config.ttl);
            if entries.len() >= self.config.capacity {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(key, _)| *key)
                {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            fingerprint,
            CacheEntry {
                article,
                inserted_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleMetadata;
    use chrono::Utc;

    fn article(title: &str) -> GeneratedArticle {
        GeneratedArticle {
            title: title.into(),
            body: "body text".into(),
            metadata: ArticleMetadata {
                word_count: 2,
                provider: "template".into(),
                generation_time_ms: 1,
                style_examples_used: 0,
                generated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn round_trip_returns_article_unchanged() {
        let cache = ArticleCache::new(CacheConfig::default());
        let stored = article("a");
        cache.put(1, stored.clone());
        assert_eq!(cache.get(1), Some(stored));
    }

    #[test]
    fn miss_on_unknown_fingerprint() {
        let cache = ArticleCache::new(CacheConfig::default());
        assert_eq!(cache.get(42), None);
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = ArticleCache::new(CacheConfig::new().ttl(Duration::from_secs(5)));
        let now = Instant::now();
        cache.put_at(1, article("a"), now);
        assert!(cache.get_at(1, now + Duration::from_secs(4)).is_some());
        assert_eq!(cache.get_at(1, now + Duration::from_secs(6)), None);
        // The expired entry was purged, not just hidden.
        assert!(cache.is_empty());
    }

    #[test]
    fn eviction_removes_oldest_insertion() {
        let cache = ArticleCache::new(CacheConfig::new().capacity(2));
        let now = Instant::now();
        cache.put_at(1, article("a"), now);
        cache.put_at(2, article("b"), now + Duration::from_secs(1));
        cache.put_at(3, article("c"), now + Duration::from_secs(2));
        let later = now + Duration::from_secs(3);
        assert_eq!(cache.get_at(1, later), None);
        assert!(cache.get_at(2, later).is_some());
        assert!(cache.get_at(3, later).is_some());
    }

    #[test]
    fn reads_do_not_protect_from_eviction() {
        let cache = ArticleCache::new(CacheConfig::new().capacity(2));
        let now = Instant::now();
        cache.put_at(1, article("a"), now);
        cache.put_at(2, article("b"), now + Duration::from_secs(1));
        // Hammer the oldest entry with reads; insertion order must still win.
        for _ in 0..10 {
            assert!(cache.get_at(1, now + Duration::from_secs(2)).is_some());
        }
        cache.put_at(3, article("c"), now + Duration::from_secs(3));
        assert_eq!(cache.get_at(1, now + Duration::from_secs(4)), None);
        assert!(cache.get_at(2, now + Duration::from_secs(4)).is_some());
    }

    #[test]
    fn overwrite_refreshes_insertion_timestamp() {
        let cache = ArticleCache::new(CacheConfig::new().capacity(2));
        let now = Instant::now();
        cache.put_at(1, article("a"), now);
        cache.put_at(2, article("b"), now + Duration::from_secs(1));
        // Re-inserting key 1 makes key 2 the oldest.
        cache.put_at(1, article("a2"), now + Duration::from_secs(2));
        cache.put_at(3, article("c"), now + Duration::from_secs(3));
        let later = now + Duration::from_secs(4);
        assert!(cache.get_at(1, later).is_some());
        assert_eq!(cache.get_at(2, later), None);
    }

    #[test]
    fn expired_entries_evicted_before_live_ones() {
        let cache = ArticleCache::new(CacheConfig::new().capacity(2).ttl(Duration::from_secs(5)));
        let now = Instant::now();
        cache.put_at(1, article("a"), now);
        cache.put_at(2, article("b"), now + Duration::from_secs(4));
        // Key 1 has expired by the time key 3 arrives; key 2 is still live
        // and must survive.
        cache.put_at(3, article("c"), now + Duration::from_secs(6));
        let later = now + Duration::from_secs(7);
        assert!(cache.get_at(2, later).is_some());
        assert!(cache.get_at(3, later).is_some());
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = ArticleCache::new(CacheConfig::new().capacity(0));
        cache.put(1, article("a"));
        assert_eq!(cache.get(1), None);
        assert!(cache.is_empty());
    }
}
