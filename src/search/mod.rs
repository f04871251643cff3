// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-source AAS search
//!
//! Layered bottom-up:
//!
//! - [`fan_out`] - concurrent first-success and all-successes combinators
//! - [`infrastructure`] - configured infrastructures turned into tagged clients
//! - [`discovery`], [`registry`], [`repository`] - one search per service role
//! - [`stage`] - the decision stages of a full search
//! - [`searcher`] - [`AasSearcher`], the entry point
//!
//! ```no_run
//! use std::sync::Arc;
//! use mnestix_aas_search::clients::InMemoryNetwork;
//! use mnestix_aas_search::domain::InfrastructureConnection;
//! use mnestix_aas_search::search::{AasSearcher, StaticInfrastructureStore};
//!
//! # async fn run() -> mnestix_aas_search::errors::ApiResult<()> {
//! let store = StaticInfrastructureStore::new(
//!     Some(InfrastructureConnection::new("plant").with_aas_repository("http://repo")),
//!     vec![],
//! );
//! let searcher = AasSearcher::new(Arc::new(store), Arc::new(InMemoryNetwork::new()));
//! let result = searcher.perform_full_search("urn:example:asset:1").await?;
//! println!("{}", result.redirect_url);
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod fan_out;
pub mod infrastructure;
pub mod registry;
pub mod repository;
pub mod searcher;
pub mod stage;

pub use infrastructure::{InfrastructureSearchService, InfrastructureStore, StaticInfrastructureStore};
pub use repository::RepositorySearchService;
pub use searcher::AasSearcher;
pub use stage::{SearchStage, StageOutcome};
