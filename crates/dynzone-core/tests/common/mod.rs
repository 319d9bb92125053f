//! Test doubles shared by the reconciler integration tests
//!
//! The scripted provider counts calls and can be told to fail specific
//! records, so tests can observe exactly which provider traffic a cycle
//! produced.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dynzone_core::MemoryCacheStore;
use dynzone_core::cache::JobCache;
use dynzone_core::config::{JobConfig, ProviderConfig, RecordType};
use dynzone_core::error::{Error, Result};
use dynzone_core::traits::{
    AddressFamily, CacheStore, DnsProvider, IpResolver, ProviderFactory, RecordSpec,
};

/// A DnsProvider double with per-record failure injection and call counters
pub struct ScriptedProvider {
    zone_name: String,
    zone_id: String,
    records: Mutex<HashMap<String, String>>,
    fail_find: Mutex<HashSet<String>>,
    fail_create: Mutex<HashSet<String>>,
    fail_update: Mutex<HashSet<String>>,
    applied: Mutex<Vec<(String, String)>>,
    next_id: AtomicUsize,
    zone_calls: AtomicUsize,
    find_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(zone_name: &str, zone_id: &str) -> Self {
        Self {
            zone_name: zone_name.to_string(),
            zone_id: zone_id.to_string(),
            records: Mutex::new(HashMap::new()),
            fail_find: Mutex::new(HashSet::new()),
            fail_create: Mutex::new(HashSet::new()),
            fail_update: Mutex::new(HashSet::new()),
            applied: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            zone_calls: AtomicUsize::new(0),
            find_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        }
    }

    /// Pre-populate a provider-side record
    pub fn with_record(self, name: &str, id: &str) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(name.to_string(), id.to_string());
        self
    }

    pub fn fail_find_for(&self, name: &str) {
        self.fail_find.lock().unwrap().insert(name.to_string());
    }

    pub fn unfail_find_for(&self, name: &str) {
        self.fail_find.lock().unwrap().remove(name);
    }

    pub fn fail_create_for(&self, name: &str) {
        self.fail_create.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_update_for(&self, name: &str) {
        self.fail_update.lock().unwrap().insert(name.to_string());
    }

    pub fn unfail_update_for(&self, name: &str) {
        self.fail_update.lock().unwrap().remove(name);
    }

    pub fn zone_calls(&self) -> usize {
        self.zone_calls.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// `(name, value)` pairs of every successful update, in order
    pub fn applied(&self) -> Vec<(String, String)> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        if zone_name == self.zone_name {
            Ok(self.zone_id.clone())
        } else {
            Err(Error::ZoneNotFound(zone_name.to_string()))
        }
    }

    async fn find_record_id(
        &self,
        _zone_id: &str,
        name: &str,
        _record_type: RecordType,
    ) -> Result<Option<String>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find.lock().unwrap().contains(name) {
            return Err(Error::provider_unavailable("scripted find failure"));
        }
        Ok(self.records.lock().unwrap().get(name).cloned())
    }

    async fn create_record(&self, _zone_id: &str, spec: &RecordSpec) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.lock().unwrap().contains(&spec.name) {
            return Err(Error::provider_rejected("scripted create failure"));
        }
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.records
            .lock()
            .unwrap()
            .insert(spec.name.clone(), id.clone());
        Ok(id)
    }

    async fn update_record(
        &self,
        _record_id: &str,
        _zone_id: &str,
        spec: &RecordSpec,
    ) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.lock().unwrap().contains(&spec.name) {
            return Err(Error::provider_rejected("scripted update failure"));
        }
        self.applied
            .lock()
            .unwrap()
            .push((spec.name.clone(), spec.value.clone()));
        Ok(())
    }
}

/// A CacheStore wrapper whose saves can be made to fail on demand
pub struct FailingSaveStore {
    inner: MemoryCacheStore,
    fail_saves: AtomicBool,
}

impl FailingSaveStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryCacheStore::new(),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn with_cache(cache: JobCache) -> Self {
        Self {
            inner: MemoryCacheStore::with_cache(cache),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// All subsequent saves fail until disarmed
    pub fn arm(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Option<JobCache> {
        self.inner.snapshot().await
    }
}

#[async_trait]
impl CacheStore for FailingSaveStore {
    async fn load(&self) -> Result<Option<JobCache>> {
        self.inner.load().await
    }

    async fn save(&self, cache: &JobCache) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::persistence("simulated disk failure"));
        }
        self.inner.save(cache).await
    }
}

/// Delegating handle so a registry factory can hand out views of one
/// shared scripted provider and tests can still read its counters
pub struct SharedProvider(pub Arc<ScriptedProvider>);

#[async_trait]
impl DnsProvider for SharedProvider {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String> {
        self.0.resolve_zone_id(zone_name).await
    }

    async fn find_record_id(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<String>> {
        self.0.find_record_id(zone_id, name, record_type).await
    }

    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<String> {
        self.0.create_record(zone_id, spec).await
    }

    async fn update_record(&self, record_id: &str, zone_id: &str, spec: &RecordSpec) -> Result<()> {
        self.0.update_record(record_id, zone_id, spec).await
    }
}

/// Factory handing out [`SharedProvider`] views
pub struct ScriptedFactory(pub Arc<ScriptedProvider>);

impl ProviderFactory for ScriptedFactory {
    fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(SharedProvider(self.0.clone())))
    }
}

/// An IpResolver double returning a fixed address, with failure injection
pub struct StaticResolver {
    address: IpAddr,
    failing: AtomicBool,
}

impl StaticResolver {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.parse().unwrap(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl IpResolver for StaticResolver {
    async fn resolve(&self, _family: AddressFamily) -> Result<IpAddr> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::ip_resolution("simulated resolver outage"));
        }
        Ok(self.address)
    }
}

/// A job over the given record names against the scripted provider's zone
pub fn job(zone: &str, names: &[&str]) -> JobConfig {
    JobConfig {
        provider: ProviderConfig::Hetzner {
            api_key: "test-key".to_string(),
            api_url: None,
        },
        zone: zone.to_string(),
        names: names.iter().map(|n| n.to_string()).collect(),
        record_type: RecordType::A,
        ttl: 300,
        save_path: PathBuf::from("/tmp/unused.json"),
    }
}
