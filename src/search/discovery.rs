// Copyright (c) 2025 - Cowboy AI, Inc.
//! Discovery search
//!
//! Asks every discovery service which AAS IDs belong to an asset ID and
//! merges the answers.

use std::collections::HashSet;
use tracing::debug;

use super::fan_out::all_successes;
use crate::clients::{DiscoveryClient, Source};
use crate::errors::{ApiError, ApiResult};

/// AAS IDs linked to an asset ID, across all given discovery services
///
/// IDs are deduplicated, keeping the order of first appearance. Returns
/// `INTERNAL_SERVER_ERROR` when no discovery service is configured and
/// `NOT_FOUND` when none of them knows the asset.
pub async fn search_aas_ids_by_asset_id(
    asset_id: &str,
    sources: &[Source<dyn DiscoveryClient>],
) -> ApiResult<Vec<String>> {
    if sources.is_empty() {
        return Err(ApiError::internal("No discovery service configured"));
    }

    let answers = all_successes(sources.iter().map(|source| async move {
        let result = source.client.get_aas_ids_by_asset_id(asset_id).await;
        if let Err(e) = &result {
            debug!(
                "Discovery {} ({}) has no entry for asset {}: {}",
                source.base_url(),
                source.infrastructure_name,
                asset_id,
                e
            );
        }
        result
    }))
    .await?;

    let mut seen = HashSet::new();
    let aas_ids: Vec<String> = answers
        .into_iter()
        .flatten()
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if aas_ids.is_empty() {
        return Err(ApiError::not_found(format!(
            "No AAS registered for asset '{}'",
            asset_id
        )));
    }
    Ok(aas_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ClientFactory, InMemoryNetwork};
    use crate::domain::SecurityConfig;
    use crate::errors::ApiErrorCode;
    use pretty_assertions::assert_eq;

    fn sources(network: &InMemoryNetwork, urls: &[&str]) -> Vec<Source<dyn DiscoveryClient>> {
        urls.iter()
            .map(|url| {
                Source::new(
                    network.discovery_client(url, &SecurityConfig::None).unwrap(),
                    "test",
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_merges_and_deduplicates() {
        let network = InMemoryNetwork::new();
        network
            .add_discovery_entry("http://d1", "asset", "aas-1")
            .add_discovery_entry("http://d2", "asset", "aas-2")
            .add_discovery_entry("http://d2", "asset", "aas-1");

        let ids = search_aas_ids_by_asset_id("asset", &sources(&network, &["http://d1", "http://d2"]))
            .await
            .unwrap();

        assert_eq!(ids, vec!["aas-1", "aas-2"]);
    }

    #[tokio::test]
    async fn test_unknown_asset_is_not_found() {
        let network = InMemoryNetwork::new();
        let err = search_aas_ids_by_asset_id("asset", &sources(&network, &["http://d1"]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_no_discovery_configured() {
        let err = search_aas_ids_by_asset_id("asset", &[]).await.unwrap_err();
        assert_eq!(err.code, ApiErrorCode::InternalServerError);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_absorbed() {
        let network = InMemoryNetwork::new();
        network
            .fail_with("http://d1", ApiErrorCode::InternalServerError)
            .add_discovery_entry("http://d2", "asset", "aas-1");

        let ids = search_aas_ids_by_asset_id("asset", &sources(&network, &["http://d1", "http://d2"]))
            .await
            .unwrap();
        assert_eq!(ids, vec!["aas-1"]);
    }
}
