// Copyright (c) 2025 - Cowboy AI, Inc.

//! Service clients
//!
//! One trait per service role. Each client is bound to a single base URL
//! and is a stateless request factory; the search layer fans out over
//! many of them.
//!
//! ```text
//! DiscoveryClient          GET /lookup/shells?assetIds=...
//! AasRegistryClient        GET /shell-descriptors/{id}
//! SubmodelRegistryClient   GET /submodel-descriptors/{id}
//! AasRepositoryClient      GET /shells/{id}
//! SubmodelRepositoryClient GET /submodels/{id}
//! ```
//!
//! Concrete clients come from a [`ClientFactory`]: [`http::HttpClientFactory`]
//! talks to real services, [`memory::InMemoryNetwork`] serves canned data.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    AssetAdministrationShell, AssetAdministrationShellDescriptor, SecurityConfig, Submodel,
    SubmodelDescriptor,
};
use crate::errors::ApiResult;

#[cfg(feature = "http")]
pub use http::{HttpClientConfig, HttpClientFactory};
pub use memory::InMemoryNetwork;

/// Anything addressed by a base URL
pub trait ServiceEndpoint: Send + Sync {
    /// Base URL without trailing slash
    fn base_url(&self) -> &str;
}

/// Maps asset IDs to AAS IDs
#[async_trait]
pub trait DiscoveryClient: ServiceEndpoint {
    /// All AAS IDs linked to the asset ID
    ///
    /// An empty answer is reported as `NOT_FOUND`.
    async fn get_aas_ids_by_asset_id(&self, asset_id: &str) -> ApiResult<Vec<String>>;
}

/// Looks up shell descriptors and follows their endpoints
#[async_trait]
pub trait AasRegistryClient: ServiceEndpoint {
    async fn get_shell_descriptor_by_id(
        &self,
        aas_id: &str,
    ) -> ApiResult<AssetAdministrationShellDescriptor>;

    /// Fetch a shell body from a descriptor endpoint href
    async fn get_shell_from_endpoint(&self, href: &str) -> ApiResult<AssetAdministrationShell>;

    /// Fetch a submodel body from an embedded submodel descriptor href
    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel>;
}

/// Looks up submodel descriptors and follows their endpoints
#[async_trait]
pub trait SubmodelRegistryClient: ServiceEndpoint {
    async fn get_submodel_descriptor_by_id(
        &self,
        submodel_id: &str,
    ) -> ApiResult<SubmodelDescriptor>;

    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel>;
}

/// Serves shell bodies
#[async_trait]
pub trait AasRepositoryClient: ServiceEndpoint {
    async fn get_shell_by_id(&self, aas_id: &str) -> ApiResult<AssetAdministrationShell>;
}

/// Serves submodel bodies
#[async_trait]
pub trait SubmodelRepositoryClient: ServiceEndpoint {
    async fn get_submodel_by_id(&self, submodel_id: &str) -> ApiResult<Submodel>;
}

/// A client tagged with the infrastructure it was configured in
pub struct Source<C: ?Sized> {
    pub client: Arc<C>,
    pub infrastructure_name: String,
}

impl<C: ?Sized> Clone for Source<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            infrastructure_name: self.infrastructure_name.clone(),
        }
    }
}

impl<C: ServiceEndpoint + ?Sized> Source<C> {
    pub fn new(client: Arc<C>, infrastructure_name: impl Into<String>) -> Self {
        Self {
            client,
            infrastructure_name: infrastructure_name.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

impl<C: ServiceEndpoint + ?Sized> std::fmt::Debug for Source<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("base_url", &self.client.base_url())
            .field("infrastructure_name", &self.infrastructure_name)
            .finish()
    }
}

/// Builds clients for configured URLs
///
/// A factory error means the client could not be set up at all (bad
/// header value, bad proxy URL); the search skips that source.
pub trait ClientFactory: Send + Sync {
    fn discovery_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn DiscoveryClient>>;

    fn aas_registry_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRegistryClient>>;

    fn submodel_registry_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRegistryClient>>;

    fn aas_repository_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRepositoryClient>>;

    fn submodel_repository_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRepositoryClient>>;
}
