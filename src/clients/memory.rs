// Copyright (c) 2025 - Cowboy AI, Inc.

//! In-memory service doubles
//!
//! [`InMemoryNetwork`] holds canned discovery entries, descriptors and
//! entity bodies keyed by service base URL, and hands out clients that
//! answer from them. Every call is counted per base URL so tests can
//! assert which services a search touched.
//!
//! Descriptor hrefs pointing at `{repo}/shells/{b64}` or
//! `{repo}/submodels/{b64}` resolve against the stored repository data
//! without counting as a repository call.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::{
    AasRegistryClient, AasRepositoryClient, ClientFactory, DiscoveryClient, ServiceEndpoint,
    SubmodelRegistryClient, SubmodelRepositoryClient,
};
use crate::domain::{
    decode_id, AssetAdministrationShell, AssetAdministrationShellDescriptor, SecurityConfig,
    Submodel, SubmodelDescriptor,
};
use crate::errors::{ApiError, ApiErrorCode, ApiResult};

#[derive(Default)]
struct NetworkState {
    discovery: HashMap<String, HashMap<String, Vec<String>>>,
    aas_descriptors: HashMap<String, HashMap<String, AssetAdministrationShellDescriptor>>,
    submodel_descriptors: HashMap<String, HashMap<String, SubmodelDescriptor>>,
    shells: HashMap<String, HashMap<String, AssetAdministrationShell>>,
    submodels: HashMap<String, HashMap<String, Submodel>>,
    failing: HashMap<String, ApiErrorCode>,
    unbuildable: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: HashMap<String, usize>,
}

/// Shared in-memory stand-in for every configured service
#[derive(Clone, Default)]
pub struct InMemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, NetworkState> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Link an asset ID to an AAS ID in a discovery service
    pub fn add_discovery_entry(&self, base_url: &str, asset_id: &str, aas_id: &str) -> &Self {
        self.state()
            .discovery
            .entry(base_url.to_string())
            .or_default()
            .entry(asset_id.to_string())
            .or_default()
            .push(aas_id.to_string());
        self
    }

    /// Store a shell descriptor in a registry
    pub fn add_shell_descriptor(
        &self,
        base_url: &str,
        descriptor: AssetAdministrationShellDescriptor,
    ) -> &Self {
        self.state()
            .aas_descriptors
            .entry(base_url.to_string())
            .or_default()
            .insert(descriptor.id.clone(), descriptor);
        self
    }

    /// Store a submodel descriptor in a submodel registry
    pub fn add_submodel_descriptor(&self, base_url: &str, descriptor: SubmodelDescriptor) -> &Self {
        self.state()
            .submodel_descriptors
            .entry(base_url.to_string())
            .or_default()
            .insert(descriptor.id.clone(), descriptor);
        self
    }

    /// Store a shell in a repository
    pub fn add_shell(&self, base_url: &str, shell: AssetAdministrationShell) -> &Self {
        self.state()
            .shells
            .entry(base_url.to_string())
            .or_default()
            .insert(shell.id.clone(), shell);
        self
    }

    /// Store a submodel in a repository
    pub fn add_submodel(&self, base_url: &str, submodel: Submodel) -> &Self {
        self.state()
            .submodels
            .entry(base_url.to_string())
            .or_default()
            .insert(submodel.id.clone(), submodel);
        self
    }

    /// Make every call to a service fail with the given code
    pub fn fail_with(&self, base_url: &str, code: ApiErrorCode) -> &Self {
        self.state().failing.insert(base_url.to_string(), code);
        self
    }

    /// Delay every answer of a service
    pub fn slow_down(&self, base_url: &str, delay: Duration) -> &Self {
        self.state().delays.insert(base_url.to_string(), delay);
        self
    }

    /// Make the factory refuse to build a client for the URL
    pub fn refuse_client(&self, base_url: &str) -> &Self {
        self.state().unbuildable.insert(base_url.to_string());
        self
    }

    /// Number of calls a service received
    pub fn calls_to(&self, base_url: &str) -> usize {
        self.state().calls.get(base_url).copied().unwrap_or(0)
    }

    /// Total number of calls across all services
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Count a call and apply configured failures
    async fn record_call(&self, base_url: &str) -> ApiResult<()> {
        let delay = self.state().delays.get(base_url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state();
        *state.calls.entry(base_url.to_string()).or_insert(0) += 1;
        match state.failing.get(base_url) {
            Some(code) => Err(ApiError::new(
                *code,
                format!("{} is configured to fail", base_url),
            )),
            None => Ok(()),
        }
    }

    fn check_buildable(&self, base_url: &str) -> ApiResult<()> {
        if self.state().unbuildable.contains(base_url) {
            return Err(ApiError::internal(format!(
                "Cannot build client for {}",
                base_url
            )));
        }
        Ok(())
    }

    fn shell_at_href(&self, href: &str) -> ApiResult<AssetAdministrationShell> {
        let (base, id) = split_href(href, "/shells/")?;
        if let Some(code) = self.state().failing.get(&base) {
            return Err(ApiError::new(*code, format!("{} is configured to fail", base)));
        }
        self.state()
            .shells
            .get(&base)
            .and_then(|shells| shells.get(&id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No shell at endpoint {}", href)))
    }

    fn submodel_at_href(&self, href: &str) -> ApiResult<Submodel> {
        let (base, id) = split_href(href, "/submodels/")?;
        if let Some(code) = self.state().failing.get(&base) {
            return Err(ApiError::new(*code, format!("{} is configured to fail", base)));
        }
        self.state()
            .submodels
            .get(&base)
            .and_then(|submodels| submodels.get(&id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No submodel at endpoint {}", href)))
    }
}

/// Split `{base}{segment}{b64id}[/...]` into base URL and decoded ID
fn split_href(href: &str, segment: &str) -> ApiResult<(String, String)> {
    let idx = href
        .find(segment)
        .ok_or_else(|| ApiError::not_found(format!("Unroutable endpoint {}", href)))?;
    let encoded = href[idx + segment.len()..]
        .split('/')
        .next()
        .unwrap_or_default();
    let id = decode_id(encoded)
        .map_err(|e| ApiError::new(ApiErrorCode::BadRequest, e.to_string()))?;
    Ok((href[..idx].to_string(), id))
}

/// Client bound to one base URL of the in-memory network
struct InMemoryClient {
    base_url: String,
    network: InMemoryNetwork,
}

impl ServiceEndpoint for InMemoryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DiscoveryClient for InMemoryClient {
    async fn get_aas_ids_by_asset_id(&self, asset_id: &str) -> ApiResult<Vec<String>> {
        self.network.record_call(&self.base_url).await?;
        self.network
            .state()
            .discovery
            .get(&self.base_url)
            .and_then(|entries| entries.get(asset_id))
            .filter(|ids| !ids.is_empty())
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No AAS for asset '{}'", asset_id)))
    }
}

#[async_trait]
impl AasRegistryClient for InMemoryClient {
    async fn get_shell_descriptor_by_id(
        &self,
        aas_id: &str,
    ) -> ApiResult<AssetAdministrationShellDescriptor> {
        self.network.record_call(&self.base_url).await?;
        self.network
            .state()
            .aas_descriptors
            .get(&self.base_url)
            .and_then(|descriptors| descriptors.get(aas_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No descriptor for '{}'", aas_id)))
    }

    async fn get_shell_from_endpoint(&self, href: &str) -> ApiResult<AssetAdministrationShell> {
        self.network.shell_at_href(href)
    }

    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel> {
        self.network.submodel_at_href(href)
    }
}

#[async_trait]
impl SubmodelRegistryClient for InMemoryClient {
    async fn get_submodel_descriptor_by_id(
        &self,
        submodel_id: &str,
    ) -> ApiResult<SubmodelDescriptor> {
        self.network.record_call(&self.base_url).await?;
        self.network
            .state()
            .submodel_descriptors
            .get(&self.base_url)
            .and_then(|descriptors| descriptors.get(submodel_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No descriptor for '{}'", submodel_id)))
    }

    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel> {
        self.network.submodel_at_href(href)
    }
}

#[async_trait]
impl AasRepositoryClient for InMemoryClient {
    async fn get_shell_by_id(&self, aas_id: &str) -> ApiResult<AssetAdministrationShell> {
        self.network.record_call(&self.base_url).await?;
        self.network
            .state()
            .shells
            .get(&self.base_url)
            .and_then(|shells| shells.get(aas_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No shell '{}'", aas_id)))
    }
}

#[async_trait]
impl SubmodelRepositoryClient for InMemoryClient {
    async fn get_submodel_by_id(&self, submodel_id: &str) -> ApiResult<Submodel> {
        self.network.record_call(&self.base_url).await?;
        self.network
            .state()
            .submodels
            .get(&self.base_url)
            .and_then(|submodels| submodels.get(submodel_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("No submodel '{}'", submodel_id)))
    }
}

impl InMemoryNetwork {
    fn client(&self, base_url: &str) -> ApiResult<Arc<InMemoryClient>> {
        self.check_buildable(base_url)?;
        Ok(Arc::new(InMemoryClient {
            base_url: base_url.to_string(),
            network: self.clone(),
        }))
    }
}

impl ClientFactory for InMemoryNetwork {
    fn discovery_client(
        &self,
        base_url: &str,
        _security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn DiscoveryClient>> {
        Ok(self.client(base_url)?)
    }

    fn aas_registry_client(
        &self,
        base_url: &str,
        _security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRegistryClient>> {
        Ok(self.client(base_url)?)
    }

    fn submodel_registry_client(
        &self,
        base_url: &str,
        _security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRegistryClient>> {
        Ok(self.client(base_url)?)
    }

    fn aas_repository_client(
        &self,
        base_url: &str,
        _security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRepositoryClient>> {
        Ok(self.client(base_url)?)
    }

    fn submodel_repository_client(
        &self,
        base_url: &str,
        _security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRepositoryClient>> {
        Ok(self.client(base_url)?)
    }
}
