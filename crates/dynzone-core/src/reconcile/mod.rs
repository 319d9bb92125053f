//! The reconciliation engine
//!
//! One [`Reconciler`] call brings all records of one job up to date with a
//! target address:
//!
//! 1. Load the job cache. If there is none, resolve the zone id and persist
//!    an empty-records cache before doing anything else; downstream work
//!    against an unpersisted cache would be silently redone after a restart.
//! 2. Per record: re-resolve the provider-side id when the cached one has
//!    gone stale (or was never there), then issue a value update whenever
//!    the cached address differs from the target. Failures skip the record
//!    for this cycle only.
//! 3. Persist the updated cache.
//!
//! Per-record isolation keeps one transient provider error from blocking
//! unrelated records in the same zone. The cached address avoids update
//! calls (and provider rate-limit pressure) when the value has not changed;
//! the cached id avoids a list-and-match call while the refresh window
//! holds; jitter keeps many records from re-resolving in lockstep.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{JobCache, RecordState, StalenessPolicy, ZoneState};
use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::traits::{CacheStore, DnsProvider, RecordSpec};

/// What happened to one record during a cycle
#[derive(Debug)]
pub enum RecordOutcome {
    /// The provider now holds the target address and the cache reflects it
    Updated,
    /// The cached address already matched; no provider call was made
    Unchanged,
    /// The record was skipped this cycle; retried on the next one
    Failed(Error),
}

/// Per-record result of one reconcile
#[derive(Debug)]
pub struct RecordReport {
    pub name: String,
    pub outcome: RecordOutcome,
}

/// Result of one reconcile call
#[derive(Debug)]
pub struct JobReport {
    /// Zone the job reconciled against
    pub zone: String,
    /// Address that was applied
    pub address: String,
    /// One entry per configured record name
    pub records: Vec<RecordReport>,
}

impl JobReport {
    /// Number of records that failed this cycle
    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Failed(_)))
            .count()
    }

    /// Number of records whose value was pushed to the provider
    pub fn updated(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Updated))
            .count()
    }
}

/// The reconciliation engine for one job
///
/// Owns the job's provider client and cache store for the duration of the
/// call; no concurrent reconcile may run against the same storage location.
pub struct Reconciler {
    provider: Arc<dyn DnsProvider>,
    store: Arc<dyn CacheStore>,
    policy: StalenessPolicy,
}

impl Reconciler {
    /// Create a reconciler with the default staleness policy
    pub fn new(provider: Arc<dyn DnsProvider>, store: Arc<dyn CacheStore>) -> Self {
        Self::with_policy(provider, store, StalenessPolicy::default())
    }

    /// Create a reconciler with an explicit staleness policy
    pub fn with_policy(
        provider: Arc<dyn DnsProvider>,
        store: Arc<dyn CacheStore>,
        policy: StalenessPolicy,
    ) -> Self {
        Self {
            provider,
            store,
            policy,
        }
    }

    /// Bring all of the job's records up to date with `address`
    ///
    /// Returns `Err` only for job-fatal conditions (zone resolution,
    /// cache persistence). Per-record failures are reported in the
    /// [`JobReport`] and never abort the remaining records.
    pub async fn reconcile(&self, job: &JobConfig, address: &str) -> Result<JobReport> {
        let now = Utc::now();

        let mut cache = match self.store.load().await? {
            Some(cache) => cache,
            None => self.bootstrap_cache(job, now).await?,
        };
        let zone_id = cache.zone.id.clone();

        let mut records = Vec::with_capacity(job.names.len());
        for name in &job.names {
            let outcome = self
                .reconcile_record(job, &mut cache, &zone_id, name, address)
                .await;
            if let RecordOutcome::Failed(ref e) = outcome {
                warn!("record {} in zone {}: {}", name, job.zone, e);
            }
            records.push(RecordReport {
                name: name.clone(),
                outcome,
            });
        }

        self.store
            .save(&cache)
            .await
            .map_err(|e| Error::persistence(format!("zone {}: {}", job.zone, e)))?;

        let report = JobReport {
            zone: job.zone.clone(),
            address: address.to_string(),
            records,
        };
        info!(
            "reconciled zone {}: {} updated, {} unchanged, {} failed",
            report.zone,
            report.updated(),
            report.records.len() - report.updated() - report.failed(),
            report.failed()
        );
        Ok(report)
    }

    /// First-run path: resolve the zone and persist an empty-records cache
    async fn bootstrap_cache(
        &self,
        job: &JobConfig,
        now: chrono::DateTime<Utc>,
    ) -> Result<JobCache> {
        info!("no cache for zone {}, resolving zone id", job.zone);

        let zone_id = self
            .provider
            .resolve_zone_id(&job.zone)
            .await
            .map_err(|e| Error::ZoneResolutionFailed(format!("{}: {}", job.zone, e)))?;

        let cache = JobCache::new(ZoneState {
            name: job.zone.clone(),
            id: zone_id,
            created: now,
        });
        self.store
            .save(&cache)
            .await
            .map_err(|e| Error::persistence(format!("zone {}: {}", job.zone, e)))?;
        Ok(cache)
    }

    async fn reconcile_record(
        &self,
        job: &JobConfig,
        cache: &mut JobCache,
        zone_id: &str,
        name: &str,
        address: &str,
    ) -> RecordOutcome {
        let now = Utc::now();
        let stale = match cache.records.get(name) {
            Some(state) => self.policy.is_stale(state.created, now),
            None => true,
        };

        if stale {
            let spec = RecordSpec {
                name: name.to_string(),
                record_type: job.record_type,
                value: address.to_string(),
                ttl: job.ttl,
            };
            match self.resolve_record_id(zone_id, &spec).await {
                Ok(id) => {
                    debug!("record {} in zone {} resolved to id {}", name, job.zone, id);
                    cache
                        .records
                        .insert(name.to_string(), RecordState::freshly_resolved(id, now));
                }
                Err(e) => {
                    return RecordOutcome::Failed(Error::RecordResolutionFailed(e.to_string()));
                }
            }
        }

        let Some(state) = cache.records.get_mut(name) else {
            // Unreachable: a non-stale entry exists and a stale one was just
            // replaced above.
            return RecordOutcome::Failed(Error::RecordResolutionFailed(name.to_string()));
        };

        if state.address == address {
            debug!("record {} already holds {}", name, address);
            return RecordOutcome::Unchanged;
        }

        let spec = RecordSpec {
            name: name.to_string(),
            record_type: job.record_type,
            value: address.to_string(),
            ttl: job.ttl,
        };
        match self.provider.update_record(&state.id, zone_id, &spec).await {
            Ok(()) => {
                state.address = address.to_string();
                RecordOutcome::Updated
            }
            // Leave the cached address untouched so the next cycle retries.
            Err(e) => RecordOutcome::Failed(Error::UpdateFailed(e.to_string())),
        }
    }

    /// Look a record id up, creating the record when it does not exist yet
    async fn resolve_record_id(&self, zone_id: &str, spec: &RecordSpec) -> Result<String> {
        match self
            .provider
            .find_record_id(zone_id, &spec.name, spec.record_type)
            .await?
        {
            Some(id) => Ok(id),
            None => {
                debug!("record {} does not exist, creating it", spec.name);
                self.provider.create_record(zone_id, spec).await
            }
        }
    }
}
