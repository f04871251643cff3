// Copyright (c) 2025 - Cowboy AI, Inc.
//! Search configuration
//!
//! Loaded from environment variables (the default infrastructure) and
//! optionally from a JSON document listing further infrastructures.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `DISCOVERY_API_URL` | discovery service(s) |
//! | `REGISTRY_API_URL` | AAS registry(ies) |
//! | `SUBMODEL_REGISTRY_API_URL` | submodel registry(ies) |
//! | `AAS_REPO_API_URL` | AAS repository(ies) |
//! | `SUBMODEL_REPO_API_URL` | submodel repository(ies) |
//! | `CONCEPT_DESCRIPTION_REPO_API_URL` | concept description repository(ies) |
//! | `AAS_SEARCH_REQUEST_TIMEOUT_SECS` | per-request timeout, default 30 |
//! | `AAS_SEARCH_STAGE_TIMEOUT_SECS` | per-stage deadline, default 60, `0` disables |
//!
//! URL variables accept a comma-separated list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clients::ClientFactory;
use crate::domain::InfrastructureConnection;
use crate::errors::ConfigError;
use crate::search::{AasSearcher, StaticInfrastructureStore};

/// Name given to the infrastructure built from environment variables
pub const DEFAULT_INFRASTRUCTURE_NAME: &str = "Default";

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Timeout of a single HTTP request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline of a single search stage in seconds, `None` for no deadline
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_secs: Option<u64>,

    /// Configured infrastructures, at most one flagged as default
    #[serde(default)]
    pub infrastructures: Vec<InfrastructureConnection>,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_stage_timeout() -> Option<u64> {
    Some(60)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            stage_timeout_secs: default_stage_timeout(),
            infrastructures: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let urls = |name: &str| -> Vec<String> {
            lookup(name)
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let default = InfrastructureConnection {
            discovery_urls: urls("DISCOVERY_API_URL"),
            aas_registry_urls: urls("REGISTRY_API_URL"),
            submodel_registry_urls: urls("SUBMODEL_REGISTRY_API_URL"),
            aas_repository_urls: urls("AAS_REPO_API_URL"),
            submodel_repository_urls: urls("SUBMODEL_REPO_API_URL"),
            concept_description_repository_urls: urls("CONCEPT_DESCRIPTION_REPO_API_URL"),
            ..InfrastructureConnection::new(DEFAULT_INFRASTRUCTURE_NAME).as_default()
        };

        let request_timeout_secs = parse_secs(&lookup, "AAS_SEARCH_REQUEST_TIMEOUT_SECS")?
            .unwrap_or_else(default_request_timeout);
        let stage_timeout_secs = match parse_secs(&lookup, "AAS_SEARCH_STAGE_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(secs),
            None => default_stage_timeout(),
        };

        let mut infrastructures = Vec::new();
        if default.is_empty() {
            debug!("No service URL in environment, default infrastructure omitted");
        } else {
            infrastructures.push(default);
        }

        Self {
            request_timeout_secs,
            stage_timeout_secs,
            infrastructures,
        }
        .validated()
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Read a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Append the infrastructures of another configuration
    ///
    /// Timeouts of `self` are kept.
    pub fn merge(mut self, other: SearchConfig) -> Result<Self, ConfigError> {
        self.infrastructures.extend(other.infrastructures);
        self.validated()
    }

    /// Normalize URLs and check structural rules
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.infrastructures = self
            .infrastructures
            .into_iter()
            .map(InfrastructureConnection::normalized)
            .collect();

        let mut names = HashSet::new();
        for infra in &self.infrastructures {
            if infra.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "infrastructure name must not be empty".to_string(),
                ));
            }
            if !names.insert(infra.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate infrastructure name '{}'",
                    infra.name
                )));
            }
        }

        let defaults = self.infrastructures.iter().filter(|i| i.is_default).count();
        if defaults > 1 {
            return Err(ConfigError::Invalid(format!(
                "{} infrastructures are flagged as default, at most one is allowed",
                defaults
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout_secs.map(Duration::from_secs)
    }

    /// Infrastructure store over the configured infrastructures
    pub fn store(&self) -> StaticInfrastructureStore {
        StaticInfrastructureStore::from_list(self.infrastructures.clone())
    }

    /// Searcher over the configured infrastructures
    pub fn searcher(&self, factory: Arc<dyn ClientFactory>) -> AasSearcher {
        let searcher = AasSearcher::new(Arc::new(self.store()), factory);
        match self.stage_timeout() {
            Some(timeout) => searcher.with_stage_timeout(timeout),
            None => searcher,
        }
    }

    #[cfg(feature = "http")]
    pub fn http_client_config(&self) -> crate::clients::HttpClientConfig {
        crate::clients::HttpClientConfig {
            timeout_secs: self.request_timeout_secs,
        }
    }
}

fn parse_secs<F>(lookup: &F, name: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
    }
}
