//! # dynzone-core
//!
//! Core library for the dynzone dynamic DNS system.
//!
//! The engine keeps DNS address records synchronized with the caller's
//! current public IP across configured jobs and pluggable providers:
//!
//! - **[`DnsProvider`]**: capability trait a provider implements (zone id
//!   lookup, record lookup, create, value update)
//! - **[`IpResolver`]**: public IP discovery per address family
//! - **[`CacheStore`]**: durable per-job cache of record ids and the last
//!   applied address
//! - **[`Reconciler`]**: the per-job engine; idempotent, with per-record
//!   failure isolation and time-based id staleness with jitter
//! - **[`JobRunner`]**: sequential orchestration over all jobs
//! - **[`ProviderRegistry`]**: plugin registry mapping provider tags to
//!   factories

pub mod cache;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod registry;
pub mod runner;
pub mod traits;

pub use cache::{FileCacheStore, JobCache, MemoryCacheStore, RecordState, StalenessPolicy, ZoneState};
pub use config::{AppConfig, JobConfig, ProviderConfig, RecordType};
pub use error::{Error, Result};
pub use reconcile::{JobReport, RecordOutcome, Reconciler};
pub use registry::ProviderRegistry;
pub use runner::{JobRunner, RunSummary};
pub use traits::{AddressFamily, CacheStore, DnsProvider, IpResolver, ProviderFactory, RecordSpec};
