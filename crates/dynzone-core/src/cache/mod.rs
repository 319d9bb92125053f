//! Per-job record-state cache
//!
//! The cache is what lets the engine skip provider calls: a cached record
//! id avoids a list-and-match call while the refresh window holds, and the
//! cached address avoids an update call when the value has not changed.
//!
//! Persisted form, one JSON file per job:
//!
//! ```json
//! {
//!   "records": {
//!     "www": { "id": "abc123", "created": "2025-01-09T12:00:00Z", "address": "1.2.3.4" }
//!   },
//!   "zone": { "name": "example.com", "id": "zone42", "created": "2025-01-09T12:00:00Z" }
//! }
//! ```

pub mod file;
pub mod memory;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cached zone identity
///
/// Immutable once cached; re-resolved only when the cache is absent or
/// unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    /// Human-readable zone name
    pub name: String,
    /// Provider-assigned zone id
    pub id: String,
    /// Instant the zone id was first resolved
    pub created: DateTime<Utc>,
}

/// Cached state of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    /// Provider-assigned record id, opaque
    pub id: String,
    /// Instant of the last id resolution
    pub created: DateTime<Utc>,
    /// Last address known to have been successfully applied; empty if never
    /// applied. This is the engine's source of truth for idempotency and is
    /// not re-queried from the provider on the hot path.
    pub address: String,
}

impl RecordState {
    /// State of a freshly resolved or created record id
    ///
    /// The empty address is deliberate: a fresh id cannot be trusted to
    /// already hold the desired value, so the empty string forces the next
    /// value check to issue an update.
    pub fn freshly_resolved(id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created: now,
            address: String::new(),
        }
    }
}

/// Full cache for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCache {
    /// Record name to last-known state
    pub records: HashMap<String, RecordState>,
    /// The zone all records belong to
    pub zone: ZoneState,
}

impl JobCache {
    /// Create an empty-records cache for a freshly resolved zone
    pub fn new(zone: ZoneState) -> Self {
        Self {
            records: HashMap::new(),
            zone,
        }
    }
}

/// Staleness window with bounded random jitter
///
/// The jitter is re-sampled on every evaluation so that many records
/// configured with the same nominal window do not re-resolve their
/// provider-side id in lockstep.
#[derive(Debug, Clone)]
pub struct StalenessPolicy {
    /// Nominal maximum age of a cached record id
    pub window: Duration,
    /// Bound of the jitter added to or subtracted from the window
    pub max_jitter: Duration,
}

impl StalenessPolicy {
    /// Build a policy from whole-second configuration values
    pub fn from_secs(window_secs: u64, jitter_secs: u64) -> Self {
        Self {
            window: Duration::seconds(window_secs as i64),
            max_jitter: Duration::seconds(jitter_secs as i64),
        }
    }

    /// The window with one fresh jitter sample applied
    pub fn effective_window(&self) -> Duration {
        let bound = self.max_jitter.num_seconds();
        let offset = if bound > 0 {
            rand::thread_rng().gen_range(-bound..=bound)
        } else {
            0
        };
        self.window + Duration::seconds(offset)
    }

    /// Whether a record id resolved at `created` must be re-resolved at `now`
    pub fn is_stale(&self, created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(created) >= self.effective_window()
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            window: Duration::hours(6),
            max_jitter: Duration::minutes(5),
        }
    }
}
