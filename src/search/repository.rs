// Copyright (c) 2025 - Cowboy AI, Inc.
//! Repository fan-out
//!
//! Two ways of asking many repositories for the same ID:
//!
//! - *first*: the first repository to answer wins. Used for the default
//!   repository and for single-result flows.
//! - *all*: every answer is kept with its origin, so callers can tell
//!   zero, one and many hits apart.
//!
//! A repository that answers with anything but success simply does not
//! have the entity.

use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::fan_out::{all_successes, first_success};
use super::registry::absent_unless_auth;
use crate::clients::{AasRepositoryClient, ServiceEndpoint, Source, SubmodelRepositoryClient};
use crate::domain::{AssetAdministrationShell, RepoSearchResult, Submodel};
use crate::errors::{ApiError, ApiResult};

/// Stateless fan-out over repository clients
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositorySearchService;

impl RepositorySearchService {
    pub fn new() -> Self {
        Self
    }

    /// Shell from the default repository
    pub async fn get_from_default_aas_repo(
        &self,
        aas_id: &str,
        default: &Source<dyn AasRepositoryClient>,
    ) -> ApiResult<RepoSearchResult<AssetAdministrationShell>> {
        self.get_first_from_all_aas_repos(aas_id, std::slice::from_ref(default))
            .await
    }

    /// Shell from whichever repository answers first
    pub async fn get_first_from_all_aas_repos(
        &self,
        aas_id: &str,
        sources: &[Source<dyn AasRepositoryClient>],
    ) -> ApiResult<RepoSearchResult<AssetAdministrationShell>> {
        fetch_first(sources, "AAS", aas_id, |client| async move {
            client.get_shell_by_id(aas_id).await
        })
        .await
    }

    /// Shell from every repository that has it
    pub async fn get_from_all_aas_repos(
        &self,
        aas_id: &str,
        sources: &[Source<dyn AasRepositoryClient>],
    ) -> ApiResult<Vec<RepoSearchResult<AssetAdministrationShell>>> {
        fetch_from_multiple_endpoints(sources, "AAS", aas_id, |client| async move {
            client.get_shell_by_id(aas_id).await
        })
        .await
    }

    /// Submodel from the default repository
    pub async fn get_from_default_submodel_repo(
        &self,
        submodel_id: &str,
        default: &Source<dyn SubmodelRepositoryClient>,
    ) -> ApiResult<RepoSearchResult<Submodel>> {
        self.get_first_from_all_submodel_repos(submodel_id, std::slice::from_ref(default))
            .await
    }

    /// Submodel from whichever repository answers first
    pub async fn get_first_from_all_submodel_repos(
        &self,
        submodel_id: &str,
        sources: &[Source<dyn SubmodelRepositoryClient>],
    ) -> ApiResult<RepoSearchResult<Submodel>> {
        fetch_first(sources, "submodel", submodel_id, |client| async move {
            client.get_submodel_by_id(submodel_id).await
        })
        .await
    }

    /// Submodel from every repository that has it
    pub async fn get_from_all_submodel_repos(
        &self,
        submodel_id: &str,
        sources: &[Source<dyn SubmodelRepositoryClient>],
    ) -> ApiResult<Vec<RepoSearchResult<Submodel>>> {
        fetch_from_multiple_endpoints(sources, "submodel", submodel_id, |client| async move {
            client.get_submodel_by_id(submodel_id).await
        })
        .await
    }
}

/// Run `fetch` against one source and tag a hit with its origin
async fn fetch_tagged<C, T, F, Fut>(
    source: &Source<C>,
    kind: &str,
    requested_id: &str,
    fetch: &F,
) -> ApiResult<RepoSearchResult<T>>
where
    C: ServiceEndpoint + ?Sized,
    F: Fn(Arc<C>) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    match fetch(Arc::clone(&source.client)).await {
        Ok(found) => Ok(RepoSearchResult::new(found, source.base_url())
            .in_infrastructure(source.infrastructure_name.clone())),
        Err(e) => {
            debug!(
                "Repository {} ({}) has no {} {}: {}",
                source.base_url(),
                source.infrastructure_name,
                kind,
                requested_id,
                e
            );
            Err(e)
        }
    }
}

async fn fetch_first<C, T, F, Fut>(
    sources: &[Source<C>],
    kind: &str,
    requested_id: &str,
    fetch: F,
) -> ApiResult<RepoSearchResult<T>>
where
    C: ServiceEndpoint + ?Sized,
    F: Fn(Arc<C>) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    if sources.is_empty() {
        return Err(ApiError::internal(format!("No {} repository configured", kind)));
    }

    first_success(
        sources
            .iter()
            .map(|source| fetch_tagged(source, kind, requested_id, &fetch)),
    )
    .await
    .map_err(|e| {
        absent_unless_auth(
            e,
            format!("No repository holds {} '{}'", kind, requested_id),
        )
    })
}

async fn fetch_from_multiple_endpoints<C, T, F, Fut>(
    sources: &[Source<C>],
    kind: &str,
    requested_id: &str,
    fetch: F,
) -> ApiResult<Vec<RepoSearchResult<T>>>
where
    C: ServiceEndpoint + ?Sized,
    F: Fn(Arc<C>) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let found = all_successes(
        sources
            .iter()
            .map(|source| fetch_tagged(source, kind, requested_id, &fetch)),
    )
    .await?;

    debug!(
        "{} of {} repositories hold {} {}",
        found.len(),
        sources.len(),
        kind,
        requested_id
    );
    Ok(found)
}
