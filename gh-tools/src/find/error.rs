//! Tree walk error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that abort a walk. Output already written stays written.
#[derive(Debug, Error)]
pub enum FindError {
    /// The tree of a repository could not be read.
    #[error("{repo}: can't read tree: {source}")]
    Tree {
        repo: String,
        #[source]
        source: ApiError,
    },

    /// File contents could not be downloaded.
    #[error("{repo}: can't read {path}: {source}")]
    Contents {
        repo: String,
        path: String,
        #[source]
        source: ApiError,
    },

    /// The last commit of an entry could not be read.
    #[error("{repo}: can't read last commit of {path}: {source}")]
    Commit {
        repo: String,
        path: String,
        #[source]
        source: ApiError,
    },

    /// Scanning downloaded contents failed.
    #[error("{repo}: can't scan {path}: {source}")]
    Scan {
        repo: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output or diagnostic sink failed.
    #[error("can't write output: {0}")]
    Output(#[from] std::io::Error),
}
