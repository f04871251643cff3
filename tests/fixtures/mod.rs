// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for mnestix-aas-search
//!
//! Provides deterministic service URLs, IDs and infrastructure layouts
//! backed by an [`InMemoryNetwork`].
//!
//! # Design Principles
//! - All URLs and IDs are fixed constants
//! - Fixtures are the only place that wires infrastructures to searchers
//! - Tests seed data through the network and assert on call counts

#![allow(dead_code)]

use std::sync::Arc;

use mnestix_aas_search::clients::InMemoryNetwork;
use mnestix_aas_search::domain::{
    encode_id, AssetAdministrationShell, AssetAdministrationShellDescriptor,
    InfrastructureConnection, SubmodelDescriptor,
};
use mnestix_aas_search::search::{AasSearcher, StaticInfrastructureStore};

// IDs used by the viewer test suite
pub const DUMMY_AAS_ID: &str = "dummy aasId";
pub const SECOND_AAS_ID: &str = "second aasId";
pub const IRRELEVANT_ASSET_ID: &str = "irrelevant assetId";
pub const SUBMODEL_ID: &str = "https://example.com/ids/sm/nameplate";

// Default infrastructure
pub const DEFAULT_INFRA: &str = "Default";
pub const DISCOVERY_URL: &str = "http://discovery.plant:8084";
pub const REGISTRY_URL: &str = "http://registry.plant:8083";
pub const SUBMODEL_REGISTRY_URL: &str = "http://sm-registry.plant:8085";
pub const REPO_URL: &str = "http://repo.plant:8081";
pub const SECOND_REPO_URL: &str = "http://repo2.plant:8081";
pub const SUBMODEL_REPO_URL: &str = "http://sm-repo.plant:8081";

// Supplier infrastructure
pub const SUPPLIER_INFRA: &str = "Supplier";
pub const SUPPLIER_DISCOVERY_URL: &str = "https://discovery.supplier.example";
pub const SUPPLIER_REGISTRY_URL: &str = "https://registry.supplier.example";
pub const SUPPLIER_REPO_URL: &str = "https://repo.supplier.example";
pub const SUPPLIER_SUBMODEL_REPO_URL: &str = "https://sm-repo.supplier.example";

/// Default infrastructure with one service of each role plus a second AAS repository
pub fn default_infrastructure() -> InfrastructureConnection {
    InfrastructureConnection::new(DEFAULT_INFRA)
        .as_default()
        .with_discovery(DISCOVERY_URL)
        .with_aas_registry(REGISTRY_URL)
        .with_submodel_registry(SUBMODEL_REGISTRY_URL)
        .with_aas_repository(REPO_URL)
        .with_aas_repository(SECOND_REPO_URL)
        .with_submodel_repository(SUBMODEL_REPO_URL)
}

/// Supplier infrastructure without a submodel registry
pub fn supplier_infrastructure() -> InfrastructureConnection {
    InfrastructureConnection::new(SUPPLIER_INFRA)
        .with_discovery(SUPPLIER_DISCOVERY_URL)
        .with_aas_registry(SUPPLIER_REGISTRY_URL)
        .with_aas_repository(SUPPLIER_REPO_URL)
        .with_submodel_repository(SUPPLIER_SUBMODEL_REPO_URL)
}

/// Searcher over the default infrastructure only
pub fn single_infrastructure_searcher(network: &InMemoryNetwork) -> AasSearcher {
    searcher(network, Some(default_infrastructure()), vec![])
}

/// Searcher over the default and the supplier infrastructure
pub fn multi_infrastructure_searcher(network: &InMemoryNetwork) -> AasSearcher {
    searcher(
        network,
        Some(default_infrastructure()),
        vec![supplier_infrastructure()],
    )
}

pub fn searcher(
    network: &InMemoryNetwork,
    default: Option<InfrastructureConnection>,
    others: Vec<InfrastructureConnection>,
) -> AasSearcher {
    AasSearcher::new(
        Arc::new(StaticInfrastructureStore::new(default, others)),
        Arc::new(network.clone()),
    )
}

/// Endpoint href of a shell in a repository
pub fn shell_href(repo_url: &str, aas_id: &str) -> String {
    format!("{}/shells/{}", repo_url, encode_id(aas_id))
}

/// Endpoint href of a submodel in a repository
pub fn submodel_href(repo_url: &str, submodel_id: &str) -> String {
    format!("{}/submodels/{}", repo_url, encode_id(submodel_id))
}

/// Shell descriptor pointing at a shell in a repository
pub fn shell_descriptor_fixture(aas_id: &str, repo_url: &str) -> AssetAdministrationShellDescriptor {
    AssetAdministrationShellDescriptor::new(aas_id, shell_href(repo_url, aas_id))
}

/// Submodel descriptor pointing at a submodel in a repository
pub fn submodel_descriptor_fixture(submodel_id: &str, repo_url: &str) -> SubmodelDescriptor {
    SubmodelDescriptor::new(submodel_id, submodel_href(repo_url, submodel_id))
}

/// Shell with a global asset ID and one submodel reference
pub fn shell_fixture(aas_id: &str) -> AssetAdministrationShell {
    AssetAdministrationShell::new(aas_id)
        .with_global_asset_id(IRRELEVANT_ASSET_ID)
        .with_submodel(SUBMODEL_ID)
}

/// Total calls received by every AAS repository of both infrastructures
pub fn repository_calls(network: &InMemoryNetwork) -> usize {
    [REPO_URL, SECOND_REPO_URL, SUPPLIER_REPO_URL]
        .iter()
        .map(|url| network.calls_to(url))
        .sum()
}
