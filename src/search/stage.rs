// Copyright (c) 2025 - Cowboy AI, Inc.
//! Search stages
//!
//! A full search is a fixed sequence of stages. Each stage ends with one
//! of three outcomes and the driver stops at the first outcome that is
//! not [`StageOutcome::NotFound`].
//!
//! ```text
//! Discovery ──> Registry ──> DefaultRepository ──> AllRepositories ──> Exhausted
//!     │             │                 │                    │
//!     └─ Ambiguous  └─ Resolved       └─ Resolved          ├─ Resolved
//!                                                          └─ Ambiguous
//! ```
//!
//! Discovery never resolves a shell on its own; when it finds exactly one
//! AAS ID it hands that ID to the later stages and reports `NotFound`.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::domain::{AasSearchResult, Redirect};
use crate::errors::ApiResult;

/// One step of the full search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStage {
    /// Asset ID → AAS ID(s)
    Discovery,
    /// AAS ID → descriptor → shell
    Registry,
    /// AAS ID → shell in the default repository
    DefaultRepository,
    /// AAS ID → shell in every repository
    AllRepositories,
    /// Nothing left to try
    Exhausted,
}

impl SearchStage {
    /// Stage a full search starts in
    pub const FIRST: SearchStage = SearchStage::Discovery;

    /// Stage that follows this one
    pub fn next(self) -> SearchStage {
        match self {
            SearchStage::Discovery => SearchStage::Registry,
            SearchStage::Registry => SearchStage::DefaultRepository,
            SearchStage::DefaultRepository => SearchStage::AllRepositories,
            SearchStage::AllRepositories | SearchStage::Exhausted => SearchStage::Exhausted,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SearchStage::Exhausted
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStage::Discovery => "discovery",
            SearchStage::Registry => "registry",
            SearchStage::DefaultRepository => "default-repository",
            SearchStage::AllRepositories => "all-repositories",
            SearchStage::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// How a stage ended
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// Exactly one shell was found
    Resolved(Box<AasSearchResult>),
    /// Several candidates; the viewer has to list them
    Ambiguous(Redirect),
    /// Nothing here, try the next stage
    NotFound,
}

impl StageOutcome {
    /// Convert a terminal outcome into the search result
    pub fn into_result(self) -> Option<AasSearchResult> {
        match self {
            StageOutcome::Resolved(result) => Some(*result),
            StageOutcome::Ambiguous(redirect) => Some(AasSearchResult::list(redirect)),
            StageOutcome::NotFound => None,
        }
    }
}

/// Run a stage under an optional deadline
///
/// A stage that runs past the deadline counts as having found nothing.
pub async fn run_with_deadline<F>(
    stage: SearchStage,
    deadline: Option<Duration>,
    work: F,
) -> ApiResult<StageOutcome>
where
    F: Future<Output = ApiResult<StageOutcome>>,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Search stage {} exceeded {:?}, skipping", stage, limit);
                Ok(StageOutcome::NotFound)
            }
        },
        None => work.await,
    }
}
