//! Time-bounded cache of normalized reports for city lookups.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::model::{Units, WeatherReport};

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    city: String,
    units: Units,
}

impl CacheKey {
    /// Key on the trimmed, lowercased city so "London " and "london" share an entry.
    pub fn new(city: &str, units: Units) -> Self {
        Self { city: city.trim().to_lowercase(), units }
    }
}

#[derive(Debug)]
struct CacheEntry {
    report: WeatherReport,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Return a fresh entry; a stale one is evicted on the way out.
    pub async fn get(&self, key: &CacheKey) -> Option<WeatherReport> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    debug!(city = %key.city, units = %key.units, "Cache hit");
                    return Some(entry.report.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.inserted_at.elapsed() >= self.ttl) {
            debug!(city = %key.city, units = %key.units, "Evicting stale cache entry");
            entries.remove(key);
        }
        None
    }

    /// Insert a report, dropping every expired entry so unread keys cannot accumulate.
    pub async fn insert(&self, key: CacheKey, report: WeatherReport) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.inserted_at.elapsed() < self.ttl);
        if entries.len() < before {
            debug!(evicted = before - entries.len(), "Evicted stale cache entries");
        }
        entries.insert(key, CacheEntry { report, inserted_at: Instant::now() });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
