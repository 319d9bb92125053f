//! Public IP resolver trait

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Address family to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// Trait for public IP discovery
///
/// Consumed once per job per cycle. Failure is a plain error; the job is
/// skipped for the cycle and retried on the next one.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Return the caller's current address for the given family
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr>;
}
