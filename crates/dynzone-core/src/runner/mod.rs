//! Job runner
//!
//! Thin orchestration above the engine: per job it instantiates the
//! provider, resolves the current address for the job's family, and hands
//! off to the [`Reconciler`]. Every failure is caught at the job boundary;
//! remaining jobs always run, and no failure escapes to the caller's loop.
//!
//! Jobs are processed sequentially. The file-per-job cache gives no
//! protection against concurrent reconciles over the same storage path, so
//! sequential processing is also the safety guarantee.

use std::sync::Arc;
use tracing::error;

use crate::cache::{FileCacheStore, StalenessPolicy};
use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::reconcile::{JobReport, Reconciler};
use crate::registry::ProviderRegistry;
use crate::traits::{CacheStore, DnsProvider, IpResolver};

/// Outcome of one job within a cycle
#[derive(Debug)]
pub struct JobOutcome {
    pub zone: String,
    pub result: Result<JobReport>,
}

/// Outcome of one full cycle over all jobs
#[derive(Debug, Default)]
pub struct RunSummary {
    pub jobs: Vec<JobOutcome>,
}

impl RunSummary {
    /// Number of jobs that failed outright this cycle
    pub fn failed(&self) -> usize {
        self.jobs.iter().filter(|j| j.result.is_err()).count()
    }
}

/// Sequential runner over the configured jobs
pub struct JobRunner {
    registry: Arc<ProviderRegistry>,
    resolver: Arc<dyn IpResolver>,
    policy: StalenessPolicy,
}

impl JobRunner {
    /// Create a runner with the default staleness policy
    pub fn new(registry: Arc<ProviderRegistry>, resolver: Arc<dyn IpResolver>) -> Self {
        Self::with_policy(registry, resolver, StalenessPolicy::default())
    }

    /// Create a runner with an explicit staleness policy
    pub fn with_policy(
        registry: Arc<ProviderRegistry>,
        resolver: Arc<dyn IpResolver>,
        policy: StalenessPolicy,
    ) -> Self {
        Self {
            registry,
            resolver,
            policy,
        }
    }

    /// Run one cycle over all jobs
    pub async fn run(&self, jobs: &[JobConfig]) -> RunSummary {
        let mut summary = RunSummary::default();
        for job in jobs {
            let result = self.run_job(job).await;
            if let Err(ref e) = result {
                error!("job for zone {} failed: {}", job.zone, e);
            }
            summary.jobs.push(JobOutcome {
                zone: job.zone.clone(),
                result,
            });
        }
        summary
    }

    async fn run_job(&self, job: &JobConfig) -> Result<JobReport> {
        let provider: Arc<dyn DnsProvider> = Arc::from(self.registry.create(&job.provider)?);

        let family = job.record_type.family();
        let address = self
            .resolver
            .resolve(family)
            .await
            .map_err(|e| Error::ip_resolution(format!("{family} for zone {}: {e}", job.zone)))?;

        let store: Arc<dyn CacheStore> = Arc::new(FileCacheStore::new(&job.save_path));
        let reconciler = Reconciler::with_policy(provider, store, self.policy.clone());
        reconciler.reconcile(job, &address.to_string()).await
    }
}
