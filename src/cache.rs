use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use url::Url;

use crate::download::source::VideoMetadata;

/// Cached extraction result
#[derive(Debug, Clone)]
struct CachedMetadata {
    metadata: Arc<VideoMetadata>,
    cached_at: Instant,
}

/// In-memory extraction cache with TTL, keyed by the requested URL.
///
/// Lets a metadata request followed by a download request for the same video
/// share one extractor run.
pub struct MetadataCache {
    cache: Mutex<HashMap<String, CachedMetadata>>,
    ttl: Duration,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl MetadataCache {
    /// Creates a new cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            ttl,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    /// Returns cached metadata, or None if absent or expired
    pub async fn get(&self, url: &Url) -> Option<Arc<VideoMetadata>> {
        let url_str = url.as_str();
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.get(url_str) {
            if cached.cached_at.elapsed() < self.ttl {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&cached.metadata));
            }
            cache.remove(url_str);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores metadata for the URL
    pub async fn insert(&self, url: &Url, metadata: Arc<VideoMetadata>) {
        let mut cache = self.cache.lock().await;
        cache.insert(
            url.as_str().to_string(),
            CachedMetadata {
                metadata,
                cached_at: Instant::now(),
            },
        );
    }

    /// Removes expired entries, returns how many were dropped
    pub async fn cleanup(&self) -> usize {
        let mut cache = self.cache.lock().await;
        let before = cache.len();
        cache.retain(|_, cached| cached.cached_at.elapsed() < self.ttl);
        let removed = before - cache.len();
        log::debug!("Cleaned up {} expired cache entries", removed);
        removed
    }

    /// Returns cache statistics
    pub async fn stats(&self) -> CacheStats {
        let size = self.cache.lock().await.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size,
            hits,
            misses,
            hit_rate,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Spawns a task that sweeps expired entries every `interval`.
pub fn spawn_cleanup(cache: Arc<MetadataCache>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.cleanup().await;
            if removed > 0 {
                log::info!("Metadata cache: dropped {} expired entries", removed);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str) -> Arc<VideoMetadata> {
        Arc::new(VideoMetadata {
            title: title.to_string(),
            thumbnail_url: None,
            duration_seconds: Some(10),
            formats: Vec::new(),
        })
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_cache_hit_and_miss() {
        let cache = MetadataCache::new(Duration::from_secs(60));
        let u = url("https://www.youtube.com/watch?v=abc");

        assert!(cache.get(&u).await.is_none());
        cache.insert(&u, sample("first")).await;
        let hit = cache.get(&u).await.unwrap();
        assert_eq!(hit.title, "first");

        let stats = cache.stats().await;
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_cache_expiry() {
        let cache = MetadataCache::new(Duration::from_millis(20));
        let u = url("https://vimeo.com/1");
        cache.insert(&u, sample("short-lived")).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&u).await.is_none());
        assert_eq!(cache.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = MetadataCache::new(Duration::from_millis(20));
        cache.insert(&url("https://a.example.com/1"), sample("a")).await;
        cache.insert(&url("https://a.example.com/2"), sample("b")).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.insert(&url("https://a.example.com/3"), sample("c")).await;
        assert_eq!(cache.cleanup().await, 2);
        assert_eq!(cache.stats().await.size, 1);
        assert_eq!(cache.cleanup().await, 0);
    }
}
