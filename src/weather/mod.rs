pub mod openweather;
pub mod types;

use moka::future::Cache;
use std::time::Duration;
use tokio::task::JoinHandle;
use types::WeatherRecord;

/// Recently fetched weather records keyed by city code.
///
/// Entries expire a fixed TTL after their last `set`; moka never hands out an
/// expired value, so a stale entry reads as a miss even before the sweep runs.
#[derive(Clone)]
pub struct WeatherCache {
    inner: Cache<String, WeatherRecord>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    pub async fn get(&self, city_code: &str) -> Option<WeatherRecord> {
        self.inner.get(city_code).await
    }

    pub async fn set(&self, city_code: String, record: WeatherRecord) {
        self.inner.insert(city_code, record).await;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Spawns a background task purging expired entries every `period`.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let cache = self.inner.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                cache.run_pending_tasks().await;
                tracing::debug!(entries = cache.entry_count(), "Weather cache swept");
            }
        })
    }
}
