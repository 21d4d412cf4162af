use crate::error::Result;
use crate::types::model::{Platform, ThreatCatalog};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

type CacheKey = (Platform, String);

#[derive(Debug, Clone)]
struct CachedCatalog {
    fetched_at: DateTime<Utc>,
    catalog: Arc<ThreatCatalog>,
}

/// Caller-owned catalog cache keyed by platform and branch.
///
/// Entries expire after `ttl`; `refresh` and `invalidate` force a reload.
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CachedCatalog>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        let secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn get_or_fetch<F>(
        &mut self,
        platform: Platform,
        branch: &str,
        fetch: F,
    ) -> Result<Arc<ThreatCatalog>>
    where
        F: FnOnce() -> Result<ThreatCatalog>,
    {
        self.get_or_fetch_at(Utc::now(), platform, branch, fetch)
    }

    /// Reloads regardless of freshness.
    pub fn refresh<F>(
        &mut self,
        platform: Platform,
        branch: &str,
        fetch: F,
    ) -> Result<Arc<ThreatCatalog>>
    where
        F: FnOnce() -> Result<ThreatCatalog>,
    {
        self.invalidate(platform, branch);
        self.get_or_fetch(platform, branch, fetch)
    }

    pub fn invalidate(&mut self, platform: Platform, branch: &str) -> bool {
        self.entries
            .remove(&(platform, branch.to_string()))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn get_or_fetch_at<F>(
        &mut self,
        now: DateTime<Utc>,
        platform: Platform,
        branch: &str,
        fetch: F,
    ) -> Result<Arc<ThreatCatalog>>
    where
        F: FnOnce() -> Result<ThreatCatalog>,
    {
        let key = (platform, branch.to_string());
        if let Some(entry) = self.entries.get(&key) {
            if now.signed_duration_since(entry.fetched_at) < self.ttl {
                tracing::debug!(%platform, branch, "threat model cache hit");
                return Ok(Arc::clone(&entry.catalog));
            }
            tracing::debug!(%platform, branch, "threat model cache entry expired");
        }

        // A failed fetch leaves any stale entry untouched.
        let catalog = Arc::new(fetch()?);
        self.entries.insert(
            key,
            CachedCatalog {
                fetched_at: now,
                catalog: Arc::clone(&catalog),
            },
        );
        Ok(catalog)
    }
}
