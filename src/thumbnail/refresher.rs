// Background sweep that keeps every known camera's thumbnail warm.
use super::cache::ThumbnailCache;
use super::camera_lookup::CameraLookup;
use super::producer::ThumbnailProducer;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub refreshed: usize,
    pub failed: usize,
}

pub struct ThumbnailRefresher {
    cache: Arc<ThumbnailCache>,
    lookup: Arc<CameraLookup>,
    producer: Arc<dyn ThumbnailProducer>,
    period: Duration,
}

impl ThumbnailRefresher {
    pub fn new(
        cache: Arc<ThumbnailCache>,
        lookup: Arc<CameraLookup>,
        producer: Arc<dyn ThumbnailProducer>,
        period: Duration,
    ) -> Self {
        Self {
            cache,
            lookup,
            producer,
            period,
        }
    }

    /// Produces a thumbnail for every known camera, one after another.
    ///
    /// A camera whose production fails keeps whatever entry it had.
    pub async fn refresh_all(&self) -> SweepSummary {
        let mut summary = SweepSummary::default();
        for (name, uri) in self.lookup.cameras() {
            match self.producer.produce(uri).await {
                Ok(artifact) => {
                    self.cache.set(name, artifact);
                    summary.refreshed += 1;
                }
                Err(err) => {
                    log::warn!("[Refresh] camera={} failed: {}", name, err);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// Sweeps right away, then again `period` after each sweep finishes.
    /// Abort the returned handle to stop.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            log::info!(
                "Starting thumbnail refresher for {} cameras every {:?}",
                self.lookup.len(),
                self.period
            );
            loop {
                let start = tokio::time::Instant::now();
                let summary = self.refresh_all().await;
                log::info!(
                    "[Refresh] sweep done in {:.2}s: {} refreshed, {} failed",
                    start.elapsed().as_secs_f64(),
                    summary.refreshed,
                    summary.failed
                );
                sleep(self.period).await;
            }
        })
    }
}
