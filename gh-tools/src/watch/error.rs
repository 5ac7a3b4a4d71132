//! Subscription toggling error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that abort a watch run.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A subscription call failed.
    #[error("{repo}: {source}")]
    Api {
        repo: String,
        #[source]
        source: ApiError,
    },

    /// Writing to the output sink failed.
    #[error("can't write output: {0}")]
    Output(#[from] std::io::Error),
}
