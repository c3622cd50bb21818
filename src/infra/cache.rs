//! In-memory TTL cache
//!
//! Used to keep description-table lookups off the database for repeated
//! `(risk type, level)` pairs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Bounded cache with per-entry TTL; evicts the least recently read entry.
pub struct LruCache<K, V> {
    max_entries: usize,
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    stats: CacheStats,
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    last_accessed: Instant,
}

/// Hit/miss counters
#[derive(Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries: max_entries.max(1),
            ttl,
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().await;

        match entries.get_mut(key) {
            Some(entry) if entry.created_at.elapsed() <= self.ttl => {
                entry.last_accessed = Instant::now();
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        let now = Instant::now();
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: now,
                last_accessed: now,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_and_miss() {
        let cache: LruCache<&str, u32> = LruCache::new(4, Duration::from_secs(60));
        assert!(cache.get(&"a").await.is_none());
        cache.insert("a", 1).await;
        assert_eq!(cache.get(&"a").await, Some(1));
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert!((cache.stats().hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_read() {
        let cache: LruCache<u32, u32> = LruCache::new(2, Duration::from_secs(60));
        cache.insert(1, 10).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert(2, 20).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.get(&1).await;
        cache.insert(3, 30).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&2).await.is_none());
        assert_eq!(cache.get(&1).await, Some(10));
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_miss() {
        let cache: LruCache<u32, u32> = LruCache::new(2, Duration::from_millis(1));
        cache.insert(1, 10).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get(&1).await.is_none());
        assert!(cache.is_empty().await);
    }
}
