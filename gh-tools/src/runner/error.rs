//! Runner error types.

use crate::artifacts::ArtifactError;
use crate::discovery::DiscoveryError;
use crate::find::FindError;
use crate::github::ApiError;
use crate::pull_requests::PrError;
use crate::watch::WatchError;

/// Errors that can occur while running a tool.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Client(#[from] ApiError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Find(#[from] FindError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Pr(#[from] PrError),
}
