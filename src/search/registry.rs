// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry search
//!
//! A registry hit is a descriptor lookup followed by a fetch from the
//! descriptor's first endpoint; the second endpoint is never tried.
//!
//! A registry that cannot answer the lookup counts as a miss. A descriptor
//! whose endpoint fails is a real failure: when no other registry delivers,
//! the endpoint's error code is returned instead of `NOT_FOUND`.

use tracing::{debug, info};

use super::fan_out::first_success;
use crate::clients::{AasRegistryClient, Source, SubmodelRegistryClient};
use crate::domain::{
    aas_repository_origin, submodel_repository_origin, AasData, RegistrySearchResult,
    RepoSearchResult, Submodel,
};
use crate::errors::{ApiError, ApiErrorCode, ApiResult};

/// Resolve a shell through the first registry that can deliver it
pub async fn search_aas_in_registries(
    aas_id: &str,
    sources: &[Source<dyn AasRegistryClient>],
) -> ApiResult<RegistrySearchResult> {
    if sources.is_empty() {
        return Err(ApiError::internal("No AAS registry configured"));
    }

    let result = first_success(sources.iter().map(|source| async move {
        let result = resolve_aas(aas_id, source).await;
        if let Err(e) = &result {
            debug!(
                "Registry {} ({}) could not resolve AAS {}: {}",
                source.base_url(),
                source.infrastructure_name,
                aas_id,
                e
            );
        }
        result
    }))
    .await
    .map_err(|e| missing_unless_failed(e, format!("No registry knows AAS '{}'", aas_id)))?;

    info!(
        "Resolved AAS {} via registry in infrastructure {:?}",
        aas_id, result.registry_aas_data.infrastructure_name
    );
    Ok(result)
}

async fn resolve_aas(
    aas_id: &str,
    source: &Source<dyn AasRegistryClient>,
) -> ApiResult<RegistrySearchResult> {
    let descriptor = source
        .client
        .get_shell_descriptor_by_id(aas_id)
        .await
        .map_err(descriptor_miss)?;
    let href = descriptor.first_endpoint_href().ok_or_else(|| {
        ApiError::not_found(format!("Descriptor of AAS '{}' has no endpoint", aas_id))
    })?;

    let aas = source
        .client
        .get_shell_from_endpoint(href)
        .await
        .map_err(|e| endpoint_failure(e, href, aas_id))?;

    Ok(RegistrySearchResult {
        registry_aas: aas,
        registry_aas_data: AasData {
            aas_repository_origin: aas_repository_origin(href),
            submodel_descriptors: descriptor.submodel_descriptors.clone(),
            infrastructure_name: Some(source.infrastructure_name.clone()),
        },
    })
}

/// Resolve a submodel through the first submodel registry that can deliver it
///
/// The location of the result is the repository behind the descriptor
/// endpoint.
pub async fn search_submodel_in_registries(
    submodel_id: &str,
    sources: &[Source<dyn SubmodelRegistryClient>],
) -> ApiResult<RepoSearchResult<Submodel>> {
    if sources.is_empty() {
        return Err(ApiError::internal("No submodel registry configured"));
    }

    first_success(sources.iter().map(|source| async move {
        let result = resolve_submodel(submodel_id, source).await;
        if let Err(e) = &result {
            debug!(
                "Submodel registry {} ({}) could not resolve submodel {}: {}",
                source.base_url(),
                source.infrastructure_name,
                submodel_id,
                e
            );
        }
        result
    }))
    .await
    .map_err(|e| {
        missing_unless_failed(
            e,
            format!("No registry knows submodel '{}'", submodel_id),
        )
    })
}

async fn resolve_submodel(
    submodel_id: &str,
    source: &Source<dyn SubmodelRegistryClient>,
) -> ApiResult<RepoSearchResult<Submodel>> {
    let descriptor = source
        .client
        .get_submodel_descriptor_by_id(submodel_id)
        .await
        .map_err(descriptor_miss)?;
    let href = descriptor.first_endpoint_href().ok_or_else(|| {
        ApiError::not_found(format!(
            "Descriptor of submodel '{}' has no endpoint",
            submodel_id
        ))
    })?;

    let submodel = source
        .client
        .get_submodel_from_endpoint(href)
        .await
        .map_err(|e| endpoint_failure(e, href, submodel_id))?;
    let location = submodel_repository_origin(href).unwrap_or_else(|| href.to_string());
    Ok(RepoSearchResult::new(submodel, location)
        .in_infrastructure(source.infrastructure_name.clone()))
}

fn descriptor_miss(err: ApiError) -> ApiError {
    let message = err.message.clone();
    absent_unless_auth(err, message)
}

fn endpoint_failure(err: ApiError, href: &str, id: &str) -> ApiError {
    debug!("Endpoint {} of {} failed: {}", href, id, err);
    ApiError::new(
        err.code,
        format!("Endpoint {} of '{}' failed: {}", href, id, err.message),
    )
}

/// Replace a plain `NOT_FOUND` by `message`, keep every other failure
fn missing_unless_failed(err: ApiError, message: String) -> ApiError {
    if err.code == ApiErrorCode::NotFound {
        ApiError::not_found(message)
    } else {
        err
    }
}

/// Keep authentication failures, turn everything else into `NOT_FOUND`
pub(crate) fn absent_unless_auth(err: ApiError, message: String) -> ApiError {
    if err.is_auth_failure() {
        err
    } else {
        ApiError::not_found(message)
    }
}
