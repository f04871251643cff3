// Copyright (c) 2025 - Cowboy AI, Inc.
//! Search result types
//!
//! All of these are built fresh per search call and never mutated.

use serde::{Deserialize, Serialize};

use super::descriptor::SubmodelDescriptor;
use super::identifier::encode_id;
use super::shell::AssetAdministrationShell;

/// An entity together with the repository that served it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSearchResult<T> {
    pub search_result: T,
    /// Base URL of the serving repository
    pub location: String,
    /// Name of the infrastructure the repository belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_name: Option<String>,
}

impl<T> RepoSearchResult<T> {
    pub fn new(search_result: T, location: impl Into<String>) -> Self {
        Self {
            search_result,
            location: location.into(),
            infrastructure_name: None,
        }
    }

    /// Tag the result with its infrastructure
    pub fn in_infrastructure(mut self, name: impl Into<String>) -> Self {
        self.infrastructure_name = Some(name.into());
        self
    }
}

/// Data the viewer needs next to a resolved shell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AasData {
    #[serde(default)]
    pub submodel_descriptors: Vec<SubmodelDescriptor>,
    /// Base URL of the repository hosting the shell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aas_repository_origin: Option<String>,
    /// Infrastructure the shell was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_name: Option<String>,
}

/// A shell resolved through a registry descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySearchResult {
    pub registry_aas: AssetAdministrationShell,
    pub registry_aas_data: AasData,
}

/// Where the viewer should navigate after a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Show one shell
    Viewer { aas_id: String },
    /// Several shells share the searched asset ID
    DiscoveryList { asset_id: String },
    /// Several repositories hold the searched shell ID
    RegistryList { aas_id: String },
}

impl Redirect {
    /// Relative URL of the redirect target
    pub fn url(&self) -> String {
        match self {
            Redirect::Viewer { aas_id } => format!("/viewer/{}", encode_id(aas_id)),
            Redirect::DiscoveryList { asset_id } => {
                format!("/viewer/discovery?assetId={}", asset_id)
            }
            Redirect::RegistryList { aas_id } => format!("/viewer/registry?aasId={}", aas_id),
        }
    }
}

/// Terminal output of a full search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AasSearchResult {
    pub redirect_url: String,
    /// `None` when the redirect points at a list view
    pub aas: Option<AssetAdministrationShell>,
    pub aas_data: Option<AasData>,
}

impl AasSearchResult {
    /// A single resolved shell, viewed under the searched AAS ID
    pub fn resolved(aas_id: &str, aas: AssetAdministrationShell, aas_data: AasData) -> Self {
        Self {
            redirect_url: Redirect::Viewer {
                aas_id: aas_id.to_string(),
            }
            .url(),
            aas: Some(aas),
            aas_data: Some(aas_data),
        }
    }

    /// A redirect to a list view
    pub fn list(redirect: Redirect) -> Self {
        Self {
            redirect_url: redirect.url(),
            aas: None,
            aas_data: None,
        }
    }

    /// Whether the result names exactly one shell
    pub fn is_resolved(&self) -> bool {
        self.aas.is_some()
    }
}
