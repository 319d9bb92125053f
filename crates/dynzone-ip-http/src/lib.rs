//! # HTTP public IP resolver
//!
//! Fetches the caller's current public IP from plain-text web services
//! (ipify and friends), one URL per address family. The body is trimmed and
//! parsed as an address; a reply whose family does not match the request is
//! rejected rather than silently forwarded to a DNS record of the wrong
//! type.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

use dynzone_core::config::ResolverConfig;
use dynzone_core::traits::{AddressFamily, IpResolver};
use dynzone_core::{Error, Result};

/// HTTP timeout for IP lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    url_v4: String,
    url_v6: String,
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver from the configured per-family URLs
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Self::with_urls(config.url_v4.clone(), config.url_v6.clone())
    }

    /// Create a resolver with explicit URLs
    pub fn with_urls(url_v4: impl Into<String>, url_v6: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            url_v4: url_v4.into(),
            url_v6: url_v6.into(),
            client,
        })
    }

    fn url_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.url_v4,
            AddressFamily::V6 => &self.url_v6,
        }
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr> {
        let url = self.url_for(family);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ip_resolution(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::ip_resolution(format!(
                "GET {url}: status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_resolution(format!("GET {url}: {e}")))?;
        let trimmed = body.trim();

        let ip: IpAddr = trimmed
            .parse()
            .map_err(|_| Error::ip_resolution(format!("not an IP address: {trimmed:?}")))?;

        let matches = match family {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        };
        if !matches {
            return Err(Error::ip_resolution(format!(
                "expected {family}, got {ip}"
            )));
        }

        debug!("current {} address is {}", family, ip);
        Ok(ip)
    }
}
