// Copyright (c) 2025 - Cowboy AI, Inc.
//! AAS Domain Models
//!
//! The subset of the AAS v3 metamodel and the Part 2 HTTP conventions
//! that the search works with.
//!
//! # Entities and Descriptors
//!
//! - [`AssetAdministrationShell`] / [`Submodel`] - bodies served by repositories
//! - [`AssetAdministrationShellDescriptor`] / [`SubmodelDescriptor`] - registry records
//!
//! # Configuration
//!
//! - [`InfrastructureConnection`] - named bundle of service URLs
//!
//! # Results
//!
//! - [`RepoSearchResult`] - entity plus serving repository
//! - [`RegistrySearchResult`] - shell resolved through a descriptor
//! - [`AasSearchResult`] - terminal output of a full search

pub mod descriptor;
pub mod identifier;
pub mod infrastructure;
pub mod result;
pub mod shell;

pub use descriptor::{
    aas_repository_origin, submodel_repository_origin, AssetAdministrationShellDescriptor, Endpoint,
    ProtocolInformation, SubmodelDescriptor,
};
pub use identifier::{decode_id, encode_id, IdentifierError};
pub use infrastructure::{InfrastructureConnection, SecurityConfig};
pub use result::{AasData, AasSearchResult, Redirect, RegistrySearchResult, RepoSearchResult};
pub use shell::{AssetAdministrationShell, AssetInformation, Key, Reference, SpecificAssetId, Submodel};
