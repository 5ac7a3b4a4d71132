//! Repository discovery error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that can occur during repository discovery.
///
/// Every variant is fatal: partial listings are discarded.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The owner could not be resolved.
    #[error("can't read owner information: {0}")]
    OwnerLookup(#[source] ApiError),

    /// The repository requested in single-repo mode does not exist.
    #[error("repository {owner}/{name} not found")]
    RepoNotFound { owner: String, name: String },

    /// The repository requested in single-repo mode could not be read.
    #[error("can't read repository: {0}")]
    Repository(#[source] ApiError),

    /// A page of the owner's repository listing could not be read.
    #[error("can't read repositories: {0}")]
    Listing(#[source] ApiError),
}
