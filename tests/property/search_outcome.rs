// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Search Outcomes
//!
//! Generates repository and discovery layouts and checks that the full
//! search picks the redirect the layout calls for.

use mnestix_aas_search::clients::InMemoryNetwork;
use mnestix_aas_search::domain::{encode_id, InfrastructureConnection};
use mnestix_aas_search::errors::ApiErrorCode;
use proptest::prelude::*;

use crate::fixtures::{
    searcher, shell_descriptor_fixture, shell_fixture, DISCOVERY_URL, REGISTRY_URL, REPO_URL,
};

const MAX_EXTRA_REPOS: usize = 5;

fn extra_repo(idx: usize) -> String {
    format!("http://repo-{}.plant:8081", idx)
}

/// Default infrastructure with `REPO_URL` as default repository plus extra repositories
fn infrastructure(extra_repos: usize) -> InfrastructureConnection {
    (0..extra_repos).fold(
        InfrastructureConnection::new("Default")
            .as_default()
            .with_discovery(DISCOVERY_URL)
            .with_aas_registry(REGISTRY_URL)
            .with_aas_repository(REPO_URL),
        |infra, idx| infra.with_aas_repository(extra_repo(idx)),
    )
}

/// AAS IDs safe to embed in a redirect
fn aas_id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:/._ -]{1,40}"
}

/// Which extra repositories hold the shell
fn holders_strategy() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), MAX_EXTRA_REPOS)
}

proptest! {
    /// Property: without registry and default repository hits, the number
    /// of holding repositories decides the outcome
    #[test]
    fn prop_repository_count_decides_outcome(
        aas_id in aas_id_strategy(),
        holders in holders_strategy(),
    ) {
        let network = InMemoryNetwork::new();
        for (idx, _) in holders.iter().enumerate().filter(|(_, holds)| **holds) {
            network.add_shell(&extra_repo(idx), shell_fixture(&aas_id));
        }
        let hits = holders.iter().filter(|holds| **holds).count();

        let result = tokio_test::block_on(
            searcher(&network, Some(infrastructure(MAX_EXTRA_REPOS)), vec![])
                .perform_full_search(&aas_id),
        );

        match hits {
            0 => prop_assert_eq!(result.unwrap_err().code, ApiErrorCode::NotFound),
            1 => {
                let result = result.unwrap();
                prop_assert_eq!(result.redirect_url, format!("/viewer/{}", encode_id(&aas_id)));
                prop_assert_eq!(result.aas.unwrap().id, aas_id);
            }
            _ => {
                let result = result.unwrap();
                prop_assert_eq!(result.redirect_url, format!("/viewer/registry?aasId={}", aas_id));
                prop_assert!(result.aas.is_none());
            }
        }
    }

    /// Property: a registry hit wins and no repository is ever asked
    #[test]
    fn prop_registry_hit_skips_repositories(
        aas_id in aas_id_strategy(),
        holders in holders_strategy(),
    ) {
        let network = InMemoryNetwork::new();
        network
            .add_shell_descriptor(REGISTRY_URL, shell_descriptor_fixture(&aas_id, REPO_URL))
            .add_shell(REPO_URL, shell_fixture(&aas_id));
        for (idx, _) in holders.iter().enumerate().filter(|(_, holds)| **holds) {
            network.add_shell(&extra_repo(idx), shell_fixture(&aas_id));
        }

        let result = tokio_test::block_on(
            searcher(&network, Some(infrastructure(MAX_EXTRA_REPOS)), vec![])
                .perform_full_search(&aas_id),
        )
        .unwrap();

        prop_assert!(result.is_resolved());
        prop_assert_eq!(network.calls_to(REPO_URL), 0);
        for idx in 0..MAX_EXTRA_REPOS {
            prop_assert_eq!(network.calls_to(&extra_repo(idx)), 0);
        }
    }

    /// Property: two or more discovered IDs short-circuit every later stage
    #[test]
    fn prop_discovery_ambiguity_short_circuits(
        asset_id in aas_id_strategy(),
        aas_ids in proptest::collection::hash_set("[a-z]{1,12}", 2..6),
        holders in holders_strategy(),
    ) {
        let network = InMemoryNetwork::new();
        for aas_id in &aas_ids {
            network
                .add_discovery_entry(DISCOVERY_URL, &asset_id, aas_id)
                .add_shell(REPO_URL, shell_fixture(aas_id));
        }
        for (idx, _) in holders.iter().enumerate().filter(|(_, holds)| **holds) {
            network.add_shell(&extra_repo(idx), shell_fixture(&asset_id));
        }

        let result = tokio_test::block_on(
            searcher(&network, Some(infrastructure(MAX_EXTRA_REPOS)), vec![])
                .perform_full_search(&asset_id),
        )
        .unwrap();

        prop_assert_eq!(result.redirect_url, format!("/viewer/discovery?assetId={}", asset_id));
        prop_assert!(result.aas.is_none());
        prop_assert_eq!(network.total_calls(), 1);
    }
}
