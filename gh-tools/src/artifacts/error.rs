use crate::github::ApiError;
use thiserror::Error;

/// Errors that abort an artifact purge.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{repo}: can't list artifacts: {source}")]
    List {
        repo: String,
        #[source]
        source: ApiError,
    },

    #[error("{repo}: can't delete artifact {name}: {source}")]
    Delete {
        repo: String,
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("can't write output: {0}")]
    Output(#[from] std::io::Error),
}
