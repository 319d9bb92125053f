//! # Hetzner DNS provider
//!
//! Implements the [`DnsProvider`] capability against the Hetzner DNS API v1.
//!
//! Wire protocol:
//! - every request carries the `Auth-API-Token` header
//! - `GET /zones` lists zones; zone resolution is an exact name match
//! - `GET /records?zone_id=...` lists a zone's records; record lookup is an
//!   exact, case-sensitive match on type and name, first match wins
//! - `POST /records` creates a record, `PUT /records/{id}` overwrites one
//! - HTTP 200 is success; any other status is a uniform failure, no 4xx/5xx
//!   distinction
//!
//! The provider is stateless and single-shot: one API call per operation,
//! no retries, no caching. The engine owns all of that.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use dynzone_core::config::{ProviderConfig, RecordType};
use dynzone_core::traits::{DnsProvider, ProviderFactory, RecordSpec};
use dynzone_core::{Error, ProviderRegistry, Result};

mod types;
use types::{RecordEnvelope, RecordListResponse, RecordPayload, ZoneListResponse};

/// Hetzner DNS API base URL
const HETZNER_API_BASE: &str = "https://dns.hetzner.com/api/v1";

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Hetzner DNS provider
pub struct HetznerProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

// The api key stays out of Debug output and logs.
impl std::fmt::Debug for HetznerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerProvider")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HetznerProvider {
    /// Create a provider against the public Hetzner API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, HETZNER_API_BASE)
    }

    /// Create a provider against an alternate base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("hetzner api key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build http client: {e}")))?;

        let base_url = base_url.into();
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn expect_success(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(response)
        } else {
            Err(Error::provider_rejected(format!("{path}: status {status}")))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header("Auth-API-Token", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::provider_unavailable(format!("GET {path}: {e}")))?;

        Self::expect_success(path, response)?
            .json()
            .await
            .map_err(|e| Error::provider_rejected(format!("GET {path}: invalid body: {e}")))
    }
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    fn name(&self) -> &'static str {
        "hetzner"
    }

    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String> {
        debug!("looking up zone id for {}", zone_name);
        let listing: ZoneListResponse = self.get_json("zones", &[]).await?;
        listing
            .zones
            .into_iter()
            .find(|zone| zone.name == zone_name)
            .map(|zone| zone.id)
            .ok_or_else(|| Error::ZoneNotFound(zone_name.to_string()))
    }

    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<String>> {
        let listing: RecordListResponse =
            self.get_json("records", &[("zone_id", zone_id)]).await?;
        Ok(listing
            .records
            .into_iter()
            .find(|record| record.record_type == record_type.as_str() && record.name == name)
            .map(|record| record.id))
    }

    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<String> {
        debug!("creating {} record {}", spec.record_type, spec.name);
        let payload = RecordPayload::new(zone_id, spec);
        let response = self
            .client
            .post(self.url("records"))
            .header("Auth-API-Token", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider_unavailable(format!("POST records: {e}")))?;

        let created: RecordEnvelope = Self::expect_success("records", response)?
            .json()
            .await
            .map_err(|e| Error::provider_rejected(format!("POST records: invalid body: {e}")))?;
        Ok(created.record.id)
    }

    async fn update_record(
        &self,
        record_id: &str,
        zone_id: &str,
        spec: &RecordSpec,
    ) -> Result<()> {
        debug!("updating {} record {}", spec.record_type, spec.name);
        let payload = RecordPayload::new(zone_id, spec);
        let path = format!("records/{record_id}");
        let response = self
            .client
            .put(self.url(&path))
            .header("Auth-API-Token", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider_unavailable(format!("PUT {path}: {e}")))?;

        Self::expect_success(&path, response)?;
        Ok(())
    }
}

/// Factory for creating Hetzner providers from job configuration
pub struct HetznerFactory;

impl ProviderFactory for HetznerFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Hetzner { api_key, api_url } => {
                let provider = match api_url {
                    Some(url) => HetznerProvider::with_base_url(api_key.clone(), url.clone())?,
                    None => HetznerProvider::new(api_key.clone())?,
                };
                Ok(Box::new(provider))
            }
        }
    }
}

/// Register the Hetzner provider with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register("hetzner", Box::new(HetznerFactory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn provider(server: &MockServer) -> HetznerProvider {
        HetznerProvider::with_base_url("test-token", server.url("")).unwrap()
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(HetznerProvider::new("").is_err());
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let provider = HetznerProvider::new("super-secret-token").unwrap();
        let debug = format!("{provider:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn resolve_zone_id_matches_exact_name() {
        let server = MockServer::start_async().await;
        let zones = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/zones")
                    .header("Auth-API-Token", "test-token");
                then.status(200).json_body(serde_json::json!({
                    "zones": [
                        { "id": "z-other", "name": "other.example" },
                        { "id": "z-42", "name": "example.com" },
                    ]
                }));
            })
            .await;

        let id = provider(&server)
            .resolve_zone_id("example.com")
            .await
            .unwrap();
        assert_eq!(id, "z-42");
        zones.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_zone_is_zone_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/zones");
                then.status(200)
                    .json_body(serde_json::json!({ "zones": [] }));
            })
            .await;

        let result = provider(&server).resolve_zone_id("example.com").await;
        assert!(matches!(result, Err(Error::ZoneNotFound(_))));
    }

    #[tokio::test]
    async fn non_success_status_is_a_uniform_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/zones");
                then.status(401)
                    .json_body(serde_json::json!({ "message": "invalid token" }));
            })
            .await;

        let result = provider(&server).resolve_zone_id("example.com").await;
        assert!(matches!(result, Err(Error::ProviderRejected(_))));
    }

    #[tokio::test]
    async fn find_record_id_matches_type_and_name() {
        let server = MockServer::start_async().await;
        let records = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/records")
                    .query_param("zone_id", "z-42")
                    .header("Auth-API-Token", "test-token");
                then.status(200).json_body(serde_json::json!({
                    "records": [
                        { "id": "r-txt", "type": "TXT", "name": "www", "value": "v=spf1" },
                        { "id": "r-a", "type": "A", "name": "www", "value": "1.2.3.4" },
                        { "id": "r-home", "type": "A", "name": "home", "value": "1.2.3.4" },
                    ]
                }));
            })
            .await;

        let found = provider(&server)
            .find_record_id("z-42", "www", RecordType::A)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("r-a"));
        records.assert_async().await;
    }

    #[tokio::test]
    async fn find_record_id_returns_none_when_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/records");
                then.status(200)
                    .json_body(serde_json::json!({ "records": [] }));
            })
            .await;

        let found = provider(&server)
            .find_record_id("z-42", "www", RecordType::A)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_records_first_match_wins() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/records");
                then.status(200).json_body(serde_json::json!({
                    "records": [
                        { "id": "r-first", "type": "A", "name": "www", "value": "1.1.1.1" },
                        { "id": "r-second", "type": "A", "name": "www", "value": "2.2.2.2" },
                    ]
                }));
            })
            .await;

        let found = provider(&server)
            .find_record_id("z-42", "www", RecordType::A)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("r-first"));
    }

    #[tokio::test]
    async fn create_record_posts_full_payload() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/records")
                    .header("Auth-API-Token", "test-token")
                    .json_body(serde_json::json!({
                        "value": "1.2.3.4",
                        "ttl": 300,
                        "type": "A",
                        "name": "www",
                        "zone_id": "z-42",
                    }));
                then.status(200).json_body(serde_json::json!({
                    "record": { "id": "r-new", "type": "A", "name": "www", "value": "1.2.3.4" }
                }));
            })
            .await;

        let spec = RecordSpec {
            name: "www".to_string(),
            record_type: RecordType::A,
            value: "1.2.3.4".to_string(),
            ttl: 300,
        };
        let id = provider(&server).create_record("z-42", &spec).await.unwrap();
        assert_eq!(id, "r-new");
        create.assert_async().await;
    }

    #[tokio::test]
    async fn update_record_puts_to_the_record_path() {
        let server = MockServer::start_async().await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/records/r-a")
                    .header("Auth-API-Token", "test-token")
                    .json_body(serde_json::json!({
                        "value": "5.6.7.8",
                        "ttl": 300,
                        "type": "A",
                        "name": "www",
                        "zone_id": "z-42",
                    }));
                then.status(200).json_body(serde_json::json!({
                    "record": { "id": "r-a", "type": "A", "name": "www", "value": "5.6.7.8" }
                }));
            })
            .await;

        let spec = RecordSpec {
            name: "www".to_string(),
            record_type: RecordType::A,
            value: "5.6.7.8".to_string(),
            ttl: 300,
        };
        provider(&server)
            .update_record("r-a", "z-42", &spec)
            .await
            .unwrap();
        update.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_update_surfaces_the_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/records/r-a");
                then.status(422)
                    .json_body(serde_json::json!({ "error": { "message": "invalid value" } }));
            })
            .await;

        let spec = RecordSpec {
            name: "www".to_string(),
            record_type: RecordType::A,
            value: "not-an-ip".to_string(),
            ttl: 300,
        };
        let result = provider(&server).update_record("r-a", "z-42", &spec).await;
        assert!(matches!(result, Err(Error::ProviderRejected(_))));
    }

    #[test]
    fn factory_builds_provider_from_config() {
        let config = ProviderConfig::Hetzner {
            api_key: "test-token".to_string(),
            api_url: None,
        };
        assert!(HetznerFactory.create(&config).is_ok());

        let empty = ProviderConfig::Hetzner {
            api_key: String::new(),
            api_url: None,
        };
        assert!(HetznerFactory.create(&empty).is_err());
    }
}
