// In-memory cache store.
//
// Nothing survives a restart; the first cycle after a restart re-resolves
// the zone and every record id. Useful for tests and for deployments where
// the extra provider calls on start are acceptable.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::JobCache;
use crate::error::Result;
use crate::traits::CacheStore;

/// In-memory cache store
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    inner: Arc<RwLock<Option<JobCache>>>,
}

impl MemoryCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing cache
    pub fn with_cache(cache: JobCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(cache))),
        }
    }

    /// Snapshot of the currently held cache
    pub async fn snapshot(&self) -> Option<JobCache> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self) -> Result<Option<JobCache>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, cache: &JobCache) -> Result<()> {
        *self.inner.write().await = Some(cache.clone());
        Ok(())
    }
}
