//! Plugin-based provider registry
//!
//! Providers are registered under their configuration tag at startup and
//! instantiated per job from [`ProviderConfig`]. Adding a provider means
//! implementing [`DnsProvider`](crate::traits::DnsProvider) and a factory,
//! never branching on a provider name inside the engine.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, ProviderFactory};

/// Registry of provider factories, keyed by configuration tag
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Box<dyn ProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory under a tag
    pub fn register(&self, name: impl Into<String>, factory: Box<dyn ProviderFactory>) {
        let mut providers = self.providers.write().unwrap();
        providers.insert(name.into(), factory);
    }

    /// Instantiate a provider for a job's configuration
    pub fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        let providers = self.providers.read().unwrap();
        let factory = providers
            .get(config.tag())
            .ok_or_else(|| Error::config(format!("unknown provider: {}", config.tag())))?;
        factory.create(config)
    }

    /// Whether a provider tag is registered
    pub fn has(&self, name: &str) -> bool {
        self.providers.read().unwrap().contains_key(name)
    }

    /// Registered provider tags
    pub fn names(&self) -> Vec<String> {
        self.providers.read().unwrap().keys().cloned().collect()
    }
}
