//! Error types for the dynzone system
//!
//! The variants mirror the failure boundaries of the engine: zone
//! resolution and cache persistence are fatal for a job's cycle, record
//! resolution and value updates only skip a single record until the next
//! cycle, and the provider variants carry the transport-level cause.

use thiserror::Error;

/// Result type alias for dynzone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynzone system
#[derive(Error, Debug)]
pub enum Error {
    /// No zone with the requested name exists at the provider
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    /// Transport or authentication failure talking to the provider
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered with a non-success status
    #[error("provider rejected request: {0}")]
    ProviderRejected(String),

    /// Zone id lookup failed; fatal for the whole job
    #[error("zone resolution failed: {0}")]
    ZoneResolutionFailed(String),

    /// Record id lookup or creation failed; skips one record for the cycle
    #[error("record resolution failed: {0}")]
    RecordResolutionFailed(String),

    /// Record value update failed; the cached address is left untouched so
    /// the next cycle retries
    #[error("record update failed: {0}")]
    UpdateFailed(String),

    /// Writing the job cache failed; fatal for the job's cycle
    #[error("cache persistence failed: {0}")]
    PersistenceFailed(String),

    /// Public IP discovery failed for a job
    #[error("ip resolution failed: {0}")]
    IpResolution(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a provider-unavailable error
    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Create a provider-rejected error
    pub fn provider_rejected(msg: impl Into<String>) -> Self {
        Self::ProviderRejected(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailed(msg.into())
    }

    /// Create an ip-resolution error
    pub fn ip_resolution(msg: impl Into<String>) -> Self {
        Self::IpResolution(msg.into())
    }
}
