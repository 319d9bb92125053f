//! DNS provider trait
//!
//! Defines the capability interface the reconciler drives. One
//! implementation exists per DNS provider; the engine never branches on a
//! provider name, it only calls through this trait.
//!
//! Implementations perform single-shot HTTP calls and propagate failures to
//! the engine, which decides what a failure means for the cycle. They must
//! not retry, sleep, or cache reconcile state of their own.

use async_trait::async_trait;

use crate::config::{ProviderConfig, RecordType};
use crate::error::Result;

/// Write payload for record creation and updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Record name within the zone
    pub name: String,
    /// Address record type
    pub record_type: RecordType,
    /// Address value to apply
    pub value: String,
    /// TTL in seconds
    pub ttl: u32,
}

/// Trait for DNS provider implementations
///
/// # Errors
///
/// - Transport and authentication failures surface as
///   [`Error::ProviderUnavailable`](crate::Error::ProviderUnavailable).
/// - A non-success status from the provider surfaces as
///   [`Error::ProviderRejected`](crate::Error::ProviderRejected); no
///   distinction is made between 4xx and 5xx.
///
/// Absence of a record is not an error: [`DnsProvider::find_record_id`]
/// returns `Ok(None)` so callers can tell "definitively not there" apart
/// from "could not ask".
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider tag, used for logging
    fn name(&self) -> &'static str;

    /// Resolve a zone name to the provider-assigned zone id
    ///
    /// Matching is an exact name comparison over the provider's full zone
    /// list. Returns [`Error::ZoneNotFound`](crate::Error::ZoneNotFound)
    /// when no zone matches.
    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String>;

    /// Find the id of the record whose type and name match exactly
    ///
    /// Matching is case-sensitive and the first match wins; duplicate
    /// records are a provider-side misconfiguration this engine does not
    /// resolve. `Ok(None)` means the record does not exist.
    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<String>>;

    /// Create a new address record and return its provider-assigned id
    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<String>;

    /// Overwrite an existing record's value
    ///
    /// Idempotent: safe to retry with the same address.
    async fn update_record(&self, record_id: &str, zone_id: &str, spec: &RecordSpec)
    -> Result<()>;
}

/// Helper trait for constructing DNS providers from configuration
pub trait ProviderFactory: Send + Sync {
    /// Create a provider instance from its configuration
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>>;
}
