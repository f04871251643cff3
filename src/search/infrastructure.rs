// Copyright (c) 2025 - Cowboy AI, Inc.
//! Infrastructure lookup and per-role client fan-out
//!
//! [`InfrastructureStore`] supplies the configured infrastructures.
//! [`InfrastructureSearchService`] turns them into client lists, one per
//! service role, each client tagged with its infrastructure name.
//!
//! A URL configured in several infrastructures is queried once, under the
//! first infrastructure that lists it. Otherwise one repository shared by
//! two infrastructures would look like two repositories holding the same
//! shell.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::{
    AasRegistryClient, AasRepositoryClient, ClientFactory, DiscoveryClient, ServiceEndpoint,
    Source, SubmodelRegistryClient, SubmodelRepositoryClient,
};
use crate::domain::{InfrastructureConnection, SecurityConfig};
use crate::errors::ApiResult;

/// Source of configured infrastructures
#[async_trait]
pub trait InfrastructureStore: Send + Sync {
    /// Infrastructures added by administrators, without the default one
    async fn get_infrastructures(&self) -> ApiResult<Vec<InfrastructureConnection>>;

    /// The default infrastructure first, then all others
    async fn get_infrastructures_including_default(
        &self,
    ) -> ApiResult<Vec<InfrastructureConnection>>;

    /// The infrastructure flagged as default, if any
    async fn get_default_infrastructure(&self) -> ApiResult<Option<InfrastructureConnection>> {
        Ok(self
            .get_infrastructures_including_default()
            .await?
            .into_iter()
            .find(|infra| infra.is_default))
    }
}

/// Infrastructures fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct StaticInfrastructureStore {
    default: Option<InfrastructureConnection>,
    others: Vec<InfrastructureConnection>,
}

impl StaticInfrastructureStore {
    /// Create a store from an optional default and further infrastructures
    ///
    /// The default is flagged as such; the `is_default` flag of the others
    /// is cleared.
    pub fn new(
        default: Option<InfrastructureConnection>,
        others: Vec<InfrastructureConnection>,
    ) -> Self {
        Self {
            default: default.map(|infra| InfrastructureConnection {
                is_default: true,
                ..infra.normalized()
            }),
            others: others
                .into_iter()
                .map(|infra| InfrastructureConnection {
                    is_default: false,
                    ..infra.normalized()
                })
                .collect(),
        }
    }

    /// Build a store from a flat list, taking the first flagged entry as default
    pub fn from_list(infrastructures: Vec<InfrastructureConnection>) -> Self {
        let mut default = None;
        let mut others = Vec::new();
        for infra in infrastructures {
            if infra.is_default && default.is_none() {
                default = Some(infra);
            } else {
                others.push(infra);
            }
        }
        Self::new(default, others)
    }
}

#[async_trait]
impl InfrastructureStore for StaticInfrastructureStore {
    async fn get_infrastructures(&self) -> ApiResult<Vec<InfrastructureConnection>> {
        Ok(self.others.clone())
    }

    async fn get_infrastructures_including_default(
        &self,
    ) -> ApiResult<Vec<InfrastructureConnection>> {
        Ok(self.default.iter().chain(self.others.iter()).cloned().collect())
    }
}

/// Builds tagged client lists across every configured infrastructure
#[derive(Clone)]
pub struct InfrastructureSearchService {
    store: Arc<dyn InfrastructureStore>,
    factory: Arc<dyn ClientFactory>,
}

impl InfrastructureSearchService {
    pub fn new(store: Arc<dyn InfrastructureStore>, factory: Arc<dyn ClientFactory>) -> Self {
        Self { store, factory }
    }

    pub async fn discovery_sources(&self) -> ApiResult<Vec<Source<dyn DiscoveryClient>>> {
        let factory = Arc::clone(&self.factory);
        self.sources(
            |infra| &infra.discovery_urls,
            move |url, security| factory.discovery_client(url, security),
        )
        .await
    }

    pub async fn aas_registry_sources(&self) -> ApiResult<Vec<Source<dyn AasRegistryClient>>> {
        let factory = Arc::clone(&self.factory);
        self.sources(
            |infra| &infra.aas_registry_urls,
            move |url, security| factory.aas_registry_client(url, security),
        )
        .await
    }

    pub async fn submodel_registry_sources(
        &self,
    ) -> ApiResult<Vec<Source<dyn SubmodelRegistryClient>>> {
        let factory = Arc::clone(&self.factory);
        self.sources(
            |infra| &infra.submodel_registry_urls,
            move |url, security| factory.submodel_registry_client(url, security),
        )
        .await
    }

    pub async fn aas_repository_sources(&self) -> ApiResult<Vec<Source<dyn AasRepositoryClient>>> {
        let factory = Arc::clone(&self.factory);
        self.sources(
            |infra| &infra.aas_repository_urls,
            move |url, security| factory.aas_repository_client(url, security),
        )
        .await
    }

    pub async fn submodel_repository_sources(
        &self,
    ) -> ApiResult<Vec<Source<dyn SubmodelRepositoryClient>>> {
        let factory = Arc::clone(&self.factory);
        self.sources(
            |infra| &infra.submodel_repository_urls,
            move |url, security| factory.submodel_repository_client(url, security),
        )
        .await
    }

    /// First AAS repository of the default infrastructure
    pub async fn default_aas_repository(
        &self,
    ) -> ApiResult<Option<Source<dyn AasRepositoryClient>>> {
        let Some(infra) = self.store.get_default_infrastructure().await? else {
            return Ok(None);
        };
        Ok(infra.aas_repository_urls.first().and_then(|url| {
            build_source(&infra, url, |url, security| {
                self.factory.aas_repository_client(url, security)
            })
        }))
    }

    /// First submodel repository of the default infrastructure
    pub async fn default_submodel_repository(
        &self,
    ) -> ApiResult<Option<Source<dyn SubmodelRepositoryClient>>> {
        let Some(infra) = self.store.get_default_infrastructure().await? else {
            return Ok(None);
        };
        Ok(infra.submodel_repository_urls.first().and_then(|url| {
            build_source(&infra, url, |url, security| {
                self.factory.submodel_repository_client(url, security)
            })
        }))
    }

    /// First AAS registry of the named infrastructure, or of the default one
    pub async fn aas_registry_of(
        &self,
        infrastructure_name: Option<&str>,
    ) -> ApiResult<Option<Source<dyn AasRegistryClient>>> {
        let infrastructures = self.store.get_infrastructures_including_default().await?;
        let infra = match infrastructure_name {
            Some(name) => infrastructures.into_iter().find(|infra| infra.name == name),
            None => infrastructures.into_iter().find(|infra| infra.is_default),
        };
        Ok(infra.and_then(|infra| {
            infra.aas_registry_urls.first().and_then(|url| {
                build_source(&infra, url, |url, security| {
                    self.factory.aas_registry_client(url, security)
                })
            })
        }))
    }

    async fn sources<C, U, B>(&self, urls_of: U, build: B) -> ApiResult<Vec<Source<C>>>
    where
        C: ServiceEndpoint + ?Sized,
        U: Fn(&InfrastructureConnection) -> &Vec<String>,
        B: Fn(&str, &SecurityConfig) -> ApiResult<Arc<C>>,
    {
        let infrastructures = self.store.get_infrastructures_including_default().await?;
        let mut seen = HashSet::new();
        let mut sources = Vec::new();

        for infra in &infrastructures {
            for url in urls_of(infra) {
                if !seen.insert(url.clone()) {
                    debug!(
                        "Skipping {} in infrastructure {}, already configured elsewhere",
                        url, infra.name
                    );
                    continue;
                }
                if let Some(source) = build_source(infra, url, &build) {
                    sources.push(source);
                }
            }
        }

        Ok(sources)
    }
}

fn build_source<C, B>(infra: &InfrastructureConnection, url: &str, build: B) -> Option<Source<C>>
where
    C: ServiceEndpoint + ?Sized,
    B: Fn(&str, &SecurityConfig) -> ApiResult<Arc<C>>,
{
    match build(url, &infra.security) {
        Ok(client) => Some(Source::new(client, infra.name.clone())),
        Err(e) => {
            warn!(
                "Cannot create client for {} in infrastructure {}: {}",
                url, infra.name, e
            );
            None
        }
    }
}
