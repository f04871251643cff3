// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-source Asset Administration Shell search
//!
//! Resolves a free-text search term (an asset ID or an AAS ID) against the
//! discovery services, registries and repositories of one or more
//! configured infrastructures, and tells the viewer where to navigate:
//!
//! - `/viewer/{base64url(aasId)}` for a single resolved shell
//! - `/viewer/discovery?assetId=...` when an asset maps to several shells
//! - `/viewer/registry?aasId=...` when several repositories hold the shell
//!
//! Service access goes through the [`clients`] traits; [`search`] holds the
//! decision logic and [`config`] the environment/JSON loading.

pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod search;

// Re-export commonly used types
pub use config::SearchConfig;
pub use domain::{AasData, AasSearchResult, AssetAdministrationShell, InfrastructureConnection, Redirect};
pub use errors::{ApiError, ApiErrorCode, ApiResult, ConfigError};
pub use search::{AasSearcher, InfrastructureStore, StaticInfrastructureStore};
