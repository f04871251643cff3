// Copyright (c) 2025 - Cowboy AI, Inc.
//! Infrastructure connections
//!
//! An infrastructure is an administrator-configured bundle of discovery,
//! registry and repository base URLs representing one deployment. The
//! search treats them as read-only.

use serde::{Deserialize, Serialize};

/// How requests to an infrastructure are authenticated
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityConfig {
    /// Plain requests
    #[default]
    None,
    /// A fixed header added to every request (API keys, bearer tokens)
    Header { name: String, value: String },
    /// Requests are routed through a proxy
    Proxy { url: String },
}

/// Named bundle of service URLs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConnection {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub discovery_urls: Vec<String>,
    #[serde(default)]
    pub aas_registry_urls: Vec<String>,
    #[serde(default)]
    pub submodel_registry_urls: Vec<String>,
    #[serde(default)]
    pub aas_repository_urls: Vec<String>,
    #[serde(default)]
    pub submodel_repository_urls: Vec<String>,
    #[serde(default)]
    pub concept_description_repository_urls: Vec<String>,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl InfrastructureConnection {
    /// Create an empty infrastructure with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Mark this infrastructure as the default one
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_discovery(mut self, url: impl Into<String>) -> Self {
        self.discovery_urls.push(url.into());
        self
    }

    pub fn with_aas_registry(mut self, url: impl Into<String>) -> Self {
        self.aas_registry_urls.push(url.into());
        self
    }

    pub fn with_submodel_registry(mut self, url: impl Into<String>) -> Self {
        self.submodel_registry_urls.push(url.into());
        self
    }

    pub fn with_aas_repository(mut self, url: impl Into<String>) -> Self {
        self.aas_repository_urls.push(url.into());
        self
    }

    pub fn with_submodel_repository(mut self, url: impl Into<String>) -> Self {
        self.submodel_repository_urls.push(url.into());
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// Drop blank entries and trailing slashes from every URL list
    pub fn normalized(mut self) -> Self {
        for urls in [
            &mut self.discovery_urls,
            &mut self.aas_registry_urls,
            &mut self.submodel_registry_urls,
            &mut self.aas_repository_urls,
            &mut self.submodel_repository_urls,
            &mut self.concept_description_repository_urls,
        ] {
            *urls = urls
                .iter()
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }
        self
    }

    /// Whether the infrastructure has no service configured at all
    pub fn is_empty(&self) -> bool {
        self.discovery_urls.is_empty()
            && self.aas_registry_urls.is_empty()
            && self.submodel_registry_urls.is_empty()
            && self.aas_repository_urls.is_empty()
            && self.submodel_repository_urls.is_empty()
            && self.concept_description_repository_urls.is_empty()
    }
}
