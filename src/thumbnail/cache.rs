// Thumbnail cache with lazy expiry.
use super::thumbnail_error::ThumbnailError;
use actix_web::web::Bytes;
use dashmap::DashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// A produced thumbnail. Replaced wholesale on every successful production.
#[derive(Debug, Clone)]
struct CacheEntry {
    artifact: Bytes,
    produced_at: Instant,
}

/// Maps a camera name to its last produced thumbnail.
///
/// Entries are never expired on a timer. A lookup that finds a stale entry
/// evicts it and falls through to production. Map access goes through the
/// `DashMap` shard locks, and no guard is held while a thumbnail is produced.
pub struct ThumbnailCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ThumbnailCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a valid thumbnail for `key`, calling `produce` on a miss or a stale entry.
    ///
    /// A failed production stores nothing and returns `None`, so the next
    /// caller retries from scratch.
    pub async fn get_or_produce<F, Fut>(&self, key: &str, produce: F) -> Option<Bytes>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, ThumbnailError>>,
    {
        if let Some(artifact) = self.get_fresh(key) {
            return Some(artifact);
        }

        match produce().await {
            Ok(artifact) => {
                self.set(key, artifact.clone());
                Some(artifact)
            }
            Err(err) => {
                log::warn!("[Cache] producing thumbnail for {} failed: {}", key, err);
                None
            }
        }
    }

    /// Unconditionally installs `artifact` as produced now. Last write wins.
    pub fn set(&self, key: &str, artifact: Bytes) {
        self.entries.insert(
            key.to_owned(),
            CacheEntry {
                artifact,
                produced_at: Instant::now(),
            },
        );
    }

    fn get_fresh(&self, key: &str) -> Option<Bytes> {
        {
            let entry = self.entries.get(key)?;
            if !self.is_stale(&entry) {
                return Some(entry.artifact.clone());
            }
        }
        // the shard guard above must be released before removing
        if self
            .entries
            .remove_if(key, |_, entry| self.is_stale(entry))
            .is_some()
        {
            log::debug!("[Cache] evicted stale thumbnail for {}", key);
        }
        None
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        entry.produced_at.elapsed() > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(5 * 60);

    fn png(data: &'static [u8]) -> Result<Bytes, ThumbnailError> {
        Ok(Bytes::from_static(data))
    }

    fn broken() -> Result<Bytes, ThumbnailError> {
        Err(ThumbnailError::InvalidFeed)
    }

    fn produced_at(cache: &ThumbnailCache, key: &str) -> Option<Instant> {
        cache.entries.get(key).map(|e| e.produced_at)
    }

    #[tokio::test(start_paused = true)]
    async fn miss_produces_once_then_hits() {
        let cache = ThumbnailCache::new(TTL);
        let calls = AtomicUsize::new(0);
        let produce = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            png(b"PNGDATA1")
        };

        let t0 = Instant::now();
        let first = cache.get_or_produce("cam1", produce).await;
        assert_eq!(first.as_deref(), Some(&b"PNGDATA1"[..]));
        assert_eq!(produced_at(&cache, "cam1"), Some(t0));

        let second = cache
            .get_or_produce("cam1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                png(b"OTHER")
            })
            .await;
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_produced_again() {
        let cache = ThumbnailCache::new(TTL);
        cache
            .get_or_produce("cam1", || async { png(b"PNGDATA1") })
            .await;

        tokio::time::advance(Duration::from_secs(6 * 60)).await;
        let t1 = Instant::now();
        let calls = AtomicUsize::new(0);
        let img = cache
            .get_or_produce("cam1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                png(b"PNGDATA2")
            })
            .await;

        assert_eq!(img.as_deref(), Some(&b"PNGDATA2"[..]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(produced_at(&cache, "cam1"), Some(t1));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_at_exactly_ttl_is_still_fresh() {
        let cache = ThumbnailCache::new(TTL);
        cache.set("cam1", Bytes::from_static(b"PNGDATA1"));
        tokio::time::advance(TTL).await;

        let img = cache
            .get_or_produce("cam1", || async { broken() })
            .await;
        assert_eq!(img.as_deref(), Some(&b"PNGDATA1"[..]));
    }

    #[tokio::test]
    async fn failed_production_stores_nothing() {
        let cache = ThumbnailCache::new(TTL);
        let img = cache
            .get_or_produce("cam1", || async { broken() })
            .await;

        assert!(img.is_none());
        assert!(!cache.entries.contains_key("cam1"));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_evicted_when_production_fails() {
        let cache = ThumbnailCache::new(TTL);
        cache.set("cam1", Bytes::from_static(b"PNGDATA1"));
        tokio::time::advance(Duration::from_secs(6 * 60)).await;

        let img = cache
            .get_or_produce("cam1", || async { broken() })
            .await;
        assert!(img.is_none());
        assert!(!cache.entries.contains_key("cam1"));
    }

    #[tokio::test(start_paused = true)]
    async fn producer_runs_without_holding_the_map_lock() {
        let cache = ThumbnailCache::new(TTL);
        let img = cache
            .get_or_produce("cam1", || async {
                // a refresh lands while the request is still producing
                cache.set("cam1", Bytes::from_static(b"REFRESH"));
                let nested = cache.get_or_produce("cam1", || async { broken() }).await;
                assert_eq!(nested.as_deref(), Some(&b"REFRESH"[..]));
                png(b"REQ")
            })
            .await;

        assert_eq!(img.as_deref(), Some(&b"REQ"[..]));
        // last write wins
        let current = cache.get_or_produce("cam1", || async { broken() }).await;
        assert_eq!(current.as_deref(), Some(&b"REQ"[..]));
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_and_is_served() {
        let cache = ThumbnailCache::new(TTL);
        cache.set("cam1", Bytes::from_static(b"OLD"));
        tokio::time::advance(Duration::from_secs(60)).await;
        cache.set("cam1", Bytes::from_static(b"NEW"));
        assert_eq!(produced_at(&cache, "cam1"), Some(Instant::now()));

        let img = cache
            .get_or_produce("cam1", || async { broken() })
            .await;
        assert_eq!(img.as_deref(), Some(&b"NEW"[..]));
    }
}
