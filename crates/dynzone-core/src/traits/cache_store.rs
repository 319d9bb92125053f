//! Cache store trait
//!
//! A store is bound to one job's storage location at construction time.
//! The reconciler exclusively owns the cache between `load` and `save`;
//! nothing else may reconcile against the same location concurrently.

use async_trait::async_trait;

use crate::cache::JobCache;
use crate::error::Result;

/// Trait for durable job cache storage
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the persisted cache
    ///
    /// `Ok(None)` covers a missing, unreadable or corrupt cache. Callers
    /// must treat it as "no prior state", never as a fatal condition.
    async fn load(&self) -> Result<Option<JobCache>>;

    /// Persist the full cache, replacing any previous contents
    ///
    /// Implementations must not truncate the previous contents before the
    /// new write has succeeded; the prior cache stays readable if this
    /// fails.
    async fn save(&self, cache: &JobCache) -> Result<()>;
}
