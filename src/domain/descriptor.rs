// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry descriptors
//!
//! Registries do not hold entity bodies, only descriptors telling where
//! the body lives. A descriptor may list several endpoints; the search
//! always uses the first one, in source order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::shell::Reference;

/// Marker that separates a repository base URL from the shell path
const SHELLS_SEGMENT: &str = "/shells";

/// Marker that separates a repository base URL from the submodel path
const SUBMODELS_SEGMENT: &str = "/submodels";

/// Protocol details of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInformation {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_protocol: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Endpoint of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub interface: String,
    pub protocol_information: ProtocolInformation,
}

impl Endpoint {
    /// HTTP endpoint for the given interface and href
    pub fn http(interface: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            protocol_information: ProtocolInformation {
                href: href.into(),
                endpoint_protocol: Some("HTTP".to_string()),
                extra: Map::new(),
            },
        }
    }

    /// The URL this endpoint points at
    pub fn href(&self) -> &str {
        &self.protocol_information.href
    }
}

/// Submodel descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmodelDescriptor {
    /// Descriptor with a single endpoint
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: None,
            semantic_id: None,
            endpoints: vec![Endpoint::http("SUBMODEL-3.0", href)],
            extra: Map::new(),
        }
    }

    /// Href of the first endpoint
    pub fn first_endpoint_href(&self) -> Option<&str> {
        self.endpoints.first().map(Endpoint::href)
    }
}

/// Asset Administration Shell descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAdministrationShellDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administration: Option<Value>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub submodel_descriptors: Vec<SubmodelDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetAdministrationShellDescriptor {
    /// Descriptor with a single endpoint
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: None,
            global_asset_id: None,
            administration: None,
            endpoints: vec![Endpoint::http("AAS-3.0", href)],
            submodel_descriptors: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Attach a submodel descriptor
    pub fn with_submodel_descriptor(mut self, descriptor: SubmodelDescriptor) -> Self {
        self.submodel_descriptors.push(descriptor);
        self
    }

    /// Href of the first endpoint
    pub fn first_endpoint_href(&self) -> Option<&str> {
        self.endpoints.first().map(Endpoint::href)
    }
}

/// Base URL of the repository serving a shell endpoint
///
/// The endpoint href is cut right before the first `/shells` segment.
/// Hrefs without such a segment have no known origin.
///
/// ```rust
/// use mnestix_aas_search::domain::aas_repository_origin;
///
/// assert_eq!(
///     aas_repository_origin("https://repo.example.com/api/shells/YWFzLTE").as_deref(),
///     Some("https://repo.example.com/api")
/// );
/// assert_eq!(aas_repository_origin("https://repo.example.com/api/YWFzLTE"), None);
/// ```
pub fn aas_repository_origin(href: &str) -> Option<String> {
    origin_before(href, SHELLS_SEGMENT)
}

/// Base URL of the repository serving a submodel endpoint
pub fn submodel_repository_origin(href: &str) -> Option<String> {
    origin_before(href, SUBMODELS_SEGMENT)
}

fn origin_before(href: &str, segment: &str) -> Option<String> {
    href.find(segment).map(|idx| href[..idx].to_string())
}
