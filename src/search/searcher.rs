// Copyright (c) 2025 - Cowboy AI, Inc.
//! AAS searcher
//!
//! Entry point for resolving a free-text search term. A full search walks
//! the [`SearchStage`]s in order and stops at the first stage that either
//! resolves a single shell or finds several candidates:
//!
//! 1. **Discovery**: the term is treated as an asset ID. Several AAS IDs
//!    end the search with a discovery list redirect; exactly one replaces
//!    the term as the AAS ID for the following stages.
//! 2. **Registry**: the first registry that delivers the shell wins.
//! 3. **Default repository**: the first AAS repository of the default
//!    infrastructure.
//! 4. **All repositories**: one hit resolves, several hits end with a
//!    registry list redirect.
//!
//! A hit in the default repository ends the search, so a shell held by the
//! default repository and by others resolves to the default copy. The
//! registry list redirect only appears when the default repository is not
//! among the holders.
//!
//! Every stage fans out across all configured infrastructures.
//! Authentication failures end the search immediately; any other failure
//! makes the stage count as empty.

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::discovery::search_aas_ids_by_asset_id;
use super::infrastructure::{InfrastructureSearchService, InfrastructureStore};
use super::registry::{search_aas_in_registries, search_submodel_in_registries};
use super::repository::RepositorySearchService;
use super::stage::{run_with_deadline, SearchStage, StageOutcome};
use crate::clients::ClientFactory;
use crate::domain::{
    submodel_repository_origin, AasData, AasSearchResult, AssetAdministrationShell, Redirect,
    RegistrySearchResult, RepoSearchResult, Submodel,
};
use crate::errors::{ApiError, ApiResult};

/// Resolves AAS and submodel IDs across every configured infrastructure
#[derive(Clone)]
pub struct AasSearcher {
    infrastructures: InfrastructureSearchService,
    repositories: RepositorySearchService,
    stage_timeout: Option<Duration>,
}

/// Mutable state carried from one stage to the next
struct SearchProgress<'a> {
    search_input: &'a str,
    aas_id: String,
    tried_default_repository: Option<String>,
}

impl AasSearcher {
    pub fn new(store: Arc<dyn InfrastructureStore>, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            infrastructures: InfrastructureSearchService::new(store, factory),
            repositories: RepositorySearchService::new(),
            stage_timeout: None,
        }
    }

    /// Bound every stage to the given duration
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = Some(timeout);
        self
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout
    }

    /// Resolve a search term to a shell or to a list redirect
    ///
    /// Returns `NOT_FOUND` when no stage finds anything.
    pub async fn perform_full_search(&self, search_input: &str) -> ApiResult<AasSearchResult> {
        let mut progress = SearchProgress {
            search_input,
            aas_id: search_input.to_string(),
            tried_default_repository: None,
        };

        let mut stage = SearchStage::FIRST;
        while !stage.is_terminal() {
            debug!("Search for '{}' entering stage {}", search_input, stage);
            let outcome = match stage {
                SearchStage::Discovery => {
                    run_with_deadline(stage, self.stage_timeout, self.discovery_stage(&mut progress))
                        .await?
                }
                SearchStage::Registry => {
                    run_with_deadline(stage, self.stage_timeout, self.registry_stage(&progress))
                        .await?
                }
                SearchStage::DefaultRepository => {
                    run_with_deadline(
                        stage,
                        self.stage_timeout,
                        self.default_repository_stage(&mut progress),
                    )
                    .await?
                }
                SearchStage::AllRepositories => {
                    run_with_deadline(
                        stage,
                        self.stage_timeout,
                        self.all_repositories_stage(&progress),
                    )
                    .await?
                }
                SearchStage::Exhausted => StageOutcome::NotFound,
            };

            if let Some(result) = outcome.into_result() {
                info!(
                    "Search for '{}' ended in stage {} with {}",
                    search_input, stage, result.redirect_url
                );
                return Ok(result);
            }
            stage = stage.next();
        }

        info!("Search for '{}' found nothing", search_input);
        Err(ApiError::not_found(format!(
            "No AAS found for '{}'",
            search_input
        )))
    }

    async fn discovery_stage(&self, progress: &mut SearchProgress<'_>) -> ApiResult<StageOutcome> {
        let ids = match self.perform_aas_discovery_search(progress.search_input).await {
            Ok(ids) => ids,
            Err(e) => return skip_stage(SearchStage::Discovery, e),
        };

        if ids.len() > 1 {
            info!(
                "Asset {} maps to {} shells",
                progress.search_input,
                ids.len()
            );
            return Ok(StageOutcome::Ambiguous(Redirect::DiscoveryList {
                asset_id: progress.search_input.to_string(),
            }));
        }
        if let Some(aas_id) = ids.into_iter().next() {
            debug!("Asset {} maps to AAS {}", progress.search_input, aas_id);
            progress.aas_id = aas_id;
        }
        Ok(StageOutcome::NotFound)
    }

    async fn registry_stage(&self, progress: &SearchProgress<'_>) -> ApiResult<StageOutcome> {
        match self.perform_registry_aas_search(&progress.aas_id).await {
            Ok(found) => Ok(StageOutcome::Resolved(Box::new(AasSearchResult::resolved(
                &progress.aas_id,
                found.registry_aas,
                found.registry_aas_data,
            )))),
            Err(e) => skip_stage(SearchStage::Registry, e),
        }
    }

    async fn default_repository_stage(
        &self,
        progress: &mut SearchProgress<'_>,
    ) -> ApiResult<StageOutcome> {
        let Some(default) = self.infrastructures.default_aas_repository().await? else {
            debug!("No default AAS repository configured");
            return Ok(StageOutcome::NotFound);
        };
        progress.tried_default_repository = Some(default.base_url().to_string());

        match self
            .repositories
            .get_from_default_aas_repo(&progress.aas_id, &default)
            .await
        {
            Ok(found) => Ok(StageOutcome::Resolved(Box::new(resolve_from_repository(
                &progress.aas_id,
                found,
            )))),
            Err(e) => skip_stage(SearchStage::DefaultRepository, e),
        }
    }

    async fn all_repositories_stage(&self, progress: &SearchProgress<'_>) -> ApiResult<StageOutcome> {
        let sources: Vec<_> = self
            .infrastructures
            .aas_repository_sources()
            .await?
            .into_iter()
            .filter(|source| {
                progress.tried_default_repository.as_deref() != Some(source.base_url())
            })
            .collect();
        if sources.is_empty() {
            return Ok(StageOutcome::NotFound);
        }

        let mut found = self
            .repositories
            .get_from_all_aas_repos(&progress.aas_id, &sources)
            .await?;

        match found.len() {
            0 => Ok(StageOutcome::NotFound),
            1 => {
                let single = found.remove(0);
                Ok(StageOutcome::Resolved(Box::new(resolve_from_repository(
                    &progress.aas_id,
                    single,
                ))))
            }
            n => {
                info!("AAS {} is held by {} repositories", progress.aas_id, n);
                Ok(StageOutcome::Ambiguous(Redirect::RegistryList {
                    aas_id: progress.search_input.to_string(),
                }))
            }
        }
    }

    /// AAS IDs linked to an asset ID across every discovery service
    pub async fn perform_aas_discovery_search(&self, asset_id: &str) -> ApiResult<Vec<String>> {
        let sources = self.infrastructures.discovery_sources().await?;
        search_aas_ids_by_asset_id(asset_id, &sources).await
    }

    /// Shell resolved through the first registry that can deliver it
    ///
    /// When a descriptor is found but its endpoint fails, that failure is
    /// returned; registries without a descriptor count as `NOT_FOUND`.
    pub async fn perform_registry_aas_search(
        &self,
        aas_id: &str,
    ) -> ApiResult<RegistrySearchResult> {
        let sources = self.infrastructures.aas_registry_sources().await?;
        search_aas_in_registries(aas_id, &sources).await
    }

    /// Shell from the default repository
    pub async fn get_aas_from_default_repo(
        &self,
        aas_id: &str,
    ) -> ApiResult<RepoSearchResult<AssetAdministrationShell>> {
        let default = self
            .infrastructures
            .default_aas_repository()
            .await?
            .ok_or_else(|| ApiError::internal("No default AAS repository configured"))?;
        self.repositories
            .get_from_default_aas_repo(aas_id, &default)
            .await
    }

    /// Every repository copy of a shell, in configuration order
    ///
    /// Returns `NOT_FOUND` when no repository holds it.
    pub async fn get_aas_from_all_repos(
        &self,
        aas_id: &str,
    ) -> ApiResult<Vec<RepoSearchResult<AssetAdministrationShell>>> {
        let sources = self.infrastructures.aas_repository_sources().await?;
        if sources.is_empty() {
            return Err(ApiError::internal("No AAS repository configured"));
        }

        let found = self
            .repositories
            .get_from_all_aas_repos(aas_id, &sources)
            .await?;
        if found.is_empty() {
            return Err(ApiError::not_found(format!(
                "No repository holds AAS '{}'",
                aas_id
            )));
        }
        Ok(found)
    }

    /// Repository copies of a shell grouped by infrastructure
    ///
    /// Groups follow configuration order, the default infrastructure first.
    pub async fn get_aas_from_all_repos_by_infrastructure(
        &self,
        aas_id: &str,
    ) -> ApiResult<Vec<(String, Vec<RepoSearchResult<AssetAdministrationShell>>)>> {
        let mut groups: Vec<(String, Vec<RepoSearchResult<AssetAdministrationShell>>)> =
            Vec::new();
        for found in self.get_aas_from_all_repos(aas_id).await? {
            let name = found.infrastructure_name.clone().unwrap_or_default();
            match groups.iter_mut().find(|(group, _)| *group == name) {
                Some((_, members)) => members.push(found),
                None => groups.push((name, vec![found])),
            }
        }
        Ok(groups)
    }

    /// Resolve a submodel by ID
    ///
    /// Tries the submodel registries, then the default submodel repository,
    /// then every other submodel repository.
    pub async fn perform_submodel_search(
        &self,
        submodel_id: &str,
    ) -> ApiResult<RepoSearchResult<Submodel>> {
        let registries = self.infrastructures.submodel_registry_sources().await?;
        match self
            .bounded("submodel registry", search_submodel_in_registries(submodel_id, &registries))
            .await
        {
            Ok(found) => return Ok(found),
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e) => debug!("Submodel {} not in any registry: {}", submodel_id, e),
        }

        let default = self.infrastructures.default_submodel_repository().await?;
        if let Some(default) = &default {
            match self
                .bounded(
                    "default submodel repository",
                    self.repositories
                        .get_from_default_submodel_repo(submodel_id, default),
                )
                .await
            {
                Ok(found) => return Ok(found),
                Err(e) if e.is_auth_failure() => return Err(e),
                Err(e) => debug!("Submodel {} not in default repository: {}", submodel_id, e),
            }
        }

        let tried = default.as_ref().map(|source| source.base_url().to_string());
        let sources: Vec<_> = self
            .infrastructures
            .submodel_repository_sources()
            .await?
            .into_iter()
            .filter(|source| tried.as_deref() != Some(source.base_url()))
            .collect();
        if sources.is_empty() {
            return Err(ApiError::not_found(format!(
                "Submodel '{}' not found",
                submodel_id
            )));
        }

        self.bounded(
            "submodel repositories",
            self.repositories
                .get_first_from_all_submodel_repos(submodel_id, &sources),
        )
        .await
    }

    /// Resolve every submodel referenced by a shell
    ///
    /// A submodel with a descriptor in `aas_data` is fetched through that
    /// descriptor's first endpoint via the registry of the shell's
    /// infrastructure; all others go through [`Self::perform_submodel_search`].
    /// Submodels that cannot be resolved are skipped. Results keep the
    /// order of the shell's submodel references.
    pub async fn get_submodels_for_aas(
        &self,
        aas: &AssetAdministrationShell,
        aas_data: &AasData,
    ) -> ApiResult<Vec<RepoSearchResult<Submodel>>> {
        let registry = self
            .infrastructures
            .aas_registry_of(aas_data.infrastructure_name.as_deref())
            .await?;

        let lookups = aas.submodel_ids().map(|submodel_id| {
            let registry = registry.clone();
            async move {
                let href = aas_data
                    .submodel_descriptors
                    .iter()
                    .find(|descriptor| descriptor.id == submodel_id)
                    .and_then(|descriptor| descriptor.first_endpoint_href());

                if let (Some(href), Some(registry)) = (href, &registry) {
                    match registry.client.get_submodel_from_endpoint(href).await {
                        Ok(submodel) => {
                            let location = submodel_repository_origin(href)
                                .unwrap_or_else(|| href.to_string());
                            return Ok(RepoSearchResult::new(submodel, location)
                                .in_infrastructure(registry.infrastructure_name.clone()));
                        }
                        Err(e) if e.is_auth_failure() => return Err(e),
                        Err(e) => debug!(
                            "Endpoint {} of submodel {} unreachable: {}",
                            href, submodel_id, e
                        ),
                    }
                }
                self.perform_submodel_search(submodel_id).await
            }
        });

        let mut submodels = Vec::new();
        for (submodel_id, result) in aas.submodel_ids().zip(join_all(lookups).await) {
            match result {
                Ok(found) => submodels.push(found),
                Err(e) if e.is_auth_failure() => return Err(e),
                Err(e) => warn!(
                    "Skipping submodel {} of AAS {}: {}",
                    submodel_id, aas.id, e
                ),
            }
        }
        Ok(submodels)
    }

    /// Apply the stage timeout to a lookup outside the full search
    async fn bounded<T, F>(&self, what: &str, work: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        match self.stage_timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.unwrap_or_else(|_| {
                warn!("Lookup in {} exceeded {:?}", what, limit);
                Err(ApiError::not_found(format!("Lookup in {} timed out", what)))
            }),
            None => work.await,
        }
    }
}

/// Shell found directly in a repository, without registry metadata
fn resolve_from_repository(
    aas_id: &str,
    found: RepoSearchResult<AssetAdministrationShell>,
) -> AasSearchResult {
    AasSearchResult::resolved(
        aas_id,
        found.search_result,
        AasData {
            submodel_descriptors: Vec::new(),
            aas_repository_origin: Some(found.location),
            infrastructure_name: found.infrastructure_name,
        },
    )
}

/// Treat a failed stage as empty unless authentication was refused
fn skip_stage(stage: SearchStage, err: ApiError) -> ApiResult<StageOutcome> {
    if err.is_auth_failure() {
        warn!("Search stage {} refused: {}", stage, err);
        return Err(err);
    }
    debug!("Search stage {} found nothing: {}", stage, err);
    Ok(StageOutcome::NotFound)
}
