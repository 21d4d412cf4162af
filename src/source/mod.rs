pub mod cache;
pub mod local;
pub mod remote;

use crate::error::Result;
use crate::loader;
use crate::types::config::ScoreConfig;
use crate::types::model::{Platform, ThreatCatalog};
use cache::CatalogCache;
use remote::RemoteSource;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a threat model document comes from.
#[derive(Debug, Clone)]
pub enum ModelLocation {
    Remote { platform: Platform, branch: String },
    Local(PathBuf),
}

/// Resolves locations to catalogs, caching remote documents.
pub struct CatalogProvider {
    remote: RemoteSource,
    cache: CatalogCache,
}

impl CatalogProvider {
    pub fn new(remote: RemoteSource, cache: CatalogCache) -> Self {
        Self { remote, cache }
    }

    pub fn from_config(config: &ScoreConfig) -> Self {
        Self::new(
            RemoteSource::new(config.source_settings()),
            CatalogCache::with_ttl_secs(config.cache_ttl_secs()),
        )
    }

    pub fn catalog(&mut self, location: &ModelLocation) -> Result<Arc<ThreatCatalog>> {
        match location {
            ModelLocation::Local(path) => {
                tracing::info!(path = %path.display(), "loading local threat model");
                let document = local::read_model_file(path)?;
                Ok(Arc::new(loader::load_catalog(&document)?))
            }
            ModelLocation::Remote { platform, branch } => {
                let remote = &self.remote;
                self.cache.get_or_fetch(*platform, branch, || {
                    let document = remote.fetch(*platform, branch)?;
                    loader::load_catalog(&document)
                })
            }
        }
    }
}
