// Copyright (c) 2025 - Cowboy AI, Inc.

//! HTTP clients for AAS Part 2 services
//!
//! All clients share one [`reqwest::Client`] unless an infrastructure is
//! routed through a proxy, which needs its own connection pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use mnestix_aas_search::clients::{ClientFactory, HttpClientConfig, HttpClientFactory};
//! use mnestix_aas_search::domain::SecurityConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = HttpClientFactory::new(HttpClientConfig::default())?;
//!     let repository =
//!         factory.aas_repository_client("http://localhost:8081", &SecurityConfig::None)?;
//!
//!     let shell = repository.get_shell_by_id("https://example.com/ids/aas/1").await?;
//!     println!("{}", shell.id);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{
    AasRegistryClient, AasRepositoryClient, ClientFactory, DiscoveryClient, ServiceEndpoint,
    SubmodelRegistryClient, SubmodelRepositoryClient,
};
use crate::domain::{
    encode_id, AssetAdministrationShell, AssetAdministrationShellDescriptor, SecurityConfig,
    Submodel, SubmodelDescriptor,
};
use crate::errors::{ApiError, ApiResult};

/// Longest response body excerpt kept in an error message
const MAX_ERROR_BODY: usize = 200;

/// Configuration for HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

/// Shared request plumbing: one client plus optional auth header
#[derive(Clone)]
struct HttpTransport {
    client: Client,
    header: Option<(HeaderName, HeaderValue)>,
}

impl HttpTransport {
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some((name, value)) = &self.header {
            request = request.header(name.clone(), value.clone());
        }

        let response = request.send().await.map_err(|e| {
            debug!("Request to {} failed: {}", url, e);
            ApiError::not_found(format!("Service unreachable at {}: {}", url, e))
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ApiError::internal(format!("Invalid response body from {}: {}", url, e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, url, &body))
    }
}

fn status_error(status: StatusCode, url: &str, body: &str) -> ApiError {
    let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
    ApiError::from_status(
        status.as_u16(),
        format!("{} returned {}: {}", url, status, excerpt),
    )
}

/// Builds HTTP-backed clients
#[derive(Clone)]
pub struct HttpClientFactory {
    config: HttpClientConfig,
    client: Client,
}

impl HttpClientFactory {
    /// Create a factory with a shared connection pool
    pub fn new(config: HttpClientConfig) -> ApiResult<Self> {
        let client = Self::builder(&config)
            .build()
            .map_err(|e| ApiError::internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn builder(config: &HttpClientConfig) -> reqwest::ClientBuilder {
        Client::builder().timeout(Duration::from_secs(config.timeout_secs))
    }

    fn transport(&self, security: &SecurityConfig) -> ApiResult<HttpTransport> {
        match security {
            SecurityConfig::None => Ok(HttpTransport {
                client: self.client.clone(),
                header: None,
            }),
            SecurityConfig::Header { name, value } => {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    ApiError::internal(format!("Invalid security header name '{}': {}", name, e))
                })?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| ApiError::internal(format!("Invalid security header value: {}", e)))?;
                Ok(HttpTransport {
                    client: self.client.clone(),
                    header: Some((name, value)),
                })
            }
            SecurityConfig::Proxy { url } => {
                let proxy = Proxy::all(url.as_str())
                    .map_err(|e| ApiError::internal(format!("Invalid proxy URL '{}': {}", url, e)))?;
                let client = Self::builder(&self.config)
                    .proxy(proxy)
                    .build()
                    .map_err(|e| {
                        ApiError::internal(format!("Failed to create proxied HTTP client: {}", e))
                    })?;
                Ok(HttpTransport {
                    client,
                    header: None,
                })
            }
        }
    }
}

impl ClientFactory for HttpClientFactory {
    fn discovery_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn DiscoveryClient>> {
        Ok(Arc::new(HttpDiscoveryClient::new(base_url, self.transport(security)?)))
    }

    fn aas_registry_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRegistryClient>> {
        Ok(Arc::new(HttpAasRegistryClient::new(base_url, self.transport(security)?)))
    }

    fn submodel_registry_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRegistryClient>> {
        Ok(Arc::new(HttpSubmodelRegistryClient::new(
            base_url,
            self.transport(security)?,
        )))
    }

    fn aas_repository_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn AasRepositoryClient>> {
        Ok(Arc::new(HttpAasRepositoryClient::new(base_url, self.transport(security)?)))
    }

    fn submodel_repository_client(
        &self,
        base_url: &str,
        security: &SecurityConfig,
    ) -> ApiResult<Arc<dyn SubmodelRepositoryClient>> {
        Ok(Arc::new(HttpSubmodelRepositoryClient::new(
            base_url,
            self.transport(security)?,
        )))
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Discovery lookups come back either paged or as a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum LookupResponse {
    Paged { result: Vec<String> },
    Plain(Vec<String>),
}

impl LookupResponse {
    fn into_ids(self) -> Vec<String> {
        match self {
            LookupResponse::Paged { result } => result,
            LookupResponse::Plain(ids) => ids,
        }
    }
}

/// Discovery service client
pub struct HttpDiscoveryClient {
    base_url: String,
    transport: HttpTransport,
}

impl HttpDiscoveryClient {
    fn new(base_url: &str, transport: HttpTransport) -> Self {
        Self {
            base_url: trim_base(base_url),
            transport,
        }
    }

    /// Lookup URL for a global asset ID
    ///
    /// The query carries a base64url-encoded `SpecificAssetId` JSON object.
    pub fn lookup_url(&self, asset_id: &str) -> String {
        let specific_asset_id = serde_json::json!({
            "name": "globalAssetId",
            "value": asset_id,
        });
        format!(
            "{}/lookup/shells?assetIds={}",
            self.base_url,
            encode_id(&specific_asset_id.to_string())
        )
    }
}

impl ServiceEndpoint for HttpDiscoveryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DiscoveryClient for HttpDiscoveryClient {
    async fn get_aas_ids_by_asset_id(&self, asset_id: &str) -> ApiResult<Vec<String>> {
        let response: LookupResponse = self.transport.get_json(&self.lookup_url(asset_id)).await?;
        let ids = response.into_ids();
        if ids.is_empty() {
            return Err(ApiError::not_found(format!(
                "No AAS registered for asset '{}' at {}",
                asset_id, self.base_url
            )));
        }
        debug!(
            "Discovery {} found {} AAS id(s) for asset {}",
            self.base_url,
            ids.len(),
            asset_id
        );
        Ok(ids)
    }
}

/// AAS registry client
pub struct HttpAasRegistryClient {
    base_url: String,
    transport: HttpTransport,
}

impl HttpAasRegistryClient {
    fn new(base_url: &str, transport: HttpTransport) -> Self {
        Self {
            base_url: trim_base(base_url),
            transport,
        }
    }
}

impl ServiceEndpoint for HttpAasRegistryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AasRegistryClient for HttpAasRegistryClient {
    async fn get_shell_descriptor_by_id(
        &self,
        aas_id: &str,
    ) -> ApiResult<AssetAdministrationShellDescriptor> {
        let url = format!("{}/shell-descriptors/{}", self.base_url, encode_id(aas_id));
        self.transport.get_json(&url).await
    }

    async fn get_shell_from_endpoint(&self, href: &str) -> ApiResult<AssetAdministrationShell> {
        self.transport.get_json(href).await
    }

    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel> {
        self.transport.get_json(href).await
    }
}

/// Submodel registry client
pub struct HttpSubmodelRegistryClient {
    base_url: String,
    transport: HttpTransport,
}

impl HttpSubmodelRegistryClient {
    fn new(base_url: &str, transport: HttpTransport) -> Self {
        Self {
            base_url: trim_base(base_url),
            transport,
        }
    }
}

impl ServiceEndpoint for HttpSubmodelRegistryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SubmodelRegistryClient for HttpSubmodelRegistryClient {
    async fn get_submodel_descriptor_by_id(
        &self,
        submodel_id: &str,
    ) -> ApiResult<SubmodelDescriptor> {
        let url = format!(
            "{}/submodel-descriptors/{}",
            self.base_url,
            encode_id(submodel_id)
        );
        self.transport.get_json(&url).await
    }

    async fn get_submodel_from_endpoint(&self, href: &str) -> ApiResult<Submodel> {
        self.transport.get_json(href).await
    }
}

/// AAS repository client
pub struct HttpAasRepositoryClient {
    base_url: String,
    transport: HttpTransport,
}

impl HttpAasRepositoryClient {
    fn new(base_url: &str, transport: HttpTransport) -> Self {
        Self {
            base_url: trim_base(base_url),
            transport,
        }
    }
}

impl ServiceEndpoint for HttpAasRepositoryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AasRepositoryClient for HttpAasRepositoryClient {
    async fn get_shell_by_id(&self, aas_id: &str) -> ApiResult<AssetAdministrationShell> {
        let url = format!("{}/shells/{}", self.base_url, encode_id(aas_id));
        self.transport.get_json(&url).await
    }
}

/// Submodel repository client
pub struct HttpSubmodelRepositoryClient {
    base_url: String,
    transport: HttpTransport,
}

impl HttpSubmodelRepositoryClient {
    fn new(base_url: &str, transport: HttpTransport) -> Self {
        Self {
            base_url: trim_base(base_url),
            transport,
        }
    }
}

impl ServiceEndpoint for HttpSubmodelRepositoryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SubmodelRepositoryClient for HttpSubmodelRepositoryClient {
    async fn get_submodel_by_id(&self, submodel_id: &str) -> ApiResult<Submodel> {
        let url = format!("{}/submodels/{}", self.base_url, encode_id(submodel_id));
        self.transport.get_json(&url).await
    }
}
