//! Configuration types for the dynzone system
//!
//! These structs are deserialized from the daemon's job file and validated
//! before any job runs. The engine itself only ever sees typed values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::traits::AddressFamily;

/// Top-level daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between reconcile cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Log level for the tracing subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public IP discovery endpoints
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Engine tuning knobs
    #[serde(default)]
    pub engine: EngineConfig,

    /// Jobs to reconcile each cycle
    pub jobs: Vec<JobConfig>,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.jobs.is_empty() {
            return Err(crate::Error::config("no jobs configured"));
        }
        if self.interval_secs == 0 {
            return Err(crate::Error::config("interval_secs must be > 0"));
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(crate::Error::config(format!(
                    "invalid log level: {other}"
                )));
            }
        }
        for job in &self.jobs {
            job.validate()?;
        }
        Ok(())
    }
}

/// Public IP discovery endpoints, one per address family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// URL returning the caller's IPv4 address as plain text
    #[serde(default = "default_url_v4")]
    pub url_v4: String,

    /// URL returning the caller's IPv6 address as plain text
    #[serde(default = "default_url_v6")]
    pub url_v6: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url_v4: default_url_v4(),
            url_v6: default_url_v6(),
        }
    }
}

/// Engine tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum age of a cached record id before it is re-resolved
    #[serde(default = "default_refresh_window_secs")]
    pub refresh_window_secs: u64,

    /// Bound of the random jitter applied to the refresh window, so that
    /// records sharing the same nominal window do not re-resolve in lockstep
    #[serde(default = "default_refresh_jitter_secs")]
    pub refresh_jitter_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_window_secs: default_refresh_window_secs(),
            refresh_jitter_secs: default_refresh_jitter_secs(),
        }
    }
}

/// One configured unit of work: a zone, a set of record names, an address
/// family, and provider credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Provider selection and credentials
    #[serde(flatten)]
    pub provider: ProviderConfig,

    /// Zone name, matched exactly against the provider's zone list
    pub zone: String,

    /// Record names to keep in sync
    pub names: Vec<String>,

    /// Address record type; decides which address family is resolved
    #[serde(rename = "type", default)]
    pub record_type: RecordType,

    /// TTL applied uniformly to created and updated records
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Path of this job's cache file
    pub save_path: PathBuf,
}

impl JobConfig {
    /// Validate a single job
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        if self.zone.is_empty() {
            return Err(crate::Error::config("zone cannot be empty"));
        }
        validate_domain_name(&self.zone)?;
        if self.names.is_empty() {
            return Err(crate::Error::config(format!(
                "job for zone {} has no record names",
                self.zone
            )));
        }
        for name in &self.names {
            if name.is_empty() {
                return Err(crate::Error::config(format!(
                    "job for zone {} has an empty record name",
                    self.zone
                )));
            }
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("ttl must be > 0"));
        }
        if self.save_path.as_os_str().is_empty() {
            return Err(crate::Error::config("save_path cannot be empty"));
        }
        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Hetzner DNS API
    Hetzner {
        /// API token, sent in the Auth-API-Token header
        api_key: String,
        /// Override of the API base URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Tag used to look the provider up in the registry
    pub fn tag(&self) -> &str {
        match self {
            ProviderConfig::Hetzner { .. } => "hetzner",
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Hetzner { api_key, .. } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("hetzner api_key cannot be empty"));
                }
                Ok(())
            }
        }
    }
}

/// Address record type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    #[default]
    #[serde(rename = "A")]
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Address family this record type carries
    pub fn family(self) -> AddressFamily {
        match self {
            RecordType::A => AddressFamily::V4,
            RecordType::Aaaa => AddressFamily::V6,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic RFC 1035 shape check for zone names
fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "domain name too long: {domain}"
        )));
    }
    for label in domain.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(crate::Error::config(format!(
                "invalid label in domain name: {domain}"
            )));
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "invalid character in domain name: {domain}"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "label cannot start or end with a hyphen: {domain}"
            )));
        }
    }
    Ok(())
}

fn default_interval_secs() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_url_v4() -> String {
    "https://api.ipify.org".to_string()
}

fn default_url_v6() -> String {
    "https://api6.ipify.org".to_string()
}

fn default_refresh_window_secs() -> u64 {
    21_600
}

fn default_refresh_jitter_secs() -> u64 {
    300
}

fn default_ttl() -> u32 {
    300
}
