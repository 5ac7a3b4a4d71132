//! Pull request error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that abort a pull request run.
#[derive(Debug, Error)]
pub enum PrError {
    /// A reviewer login doesn't resolve to an account.
    #[error("reviewer {0} doesn't exist")]
    UnknownReviewer(String),

    /// An assignee login doesn't resolve to an account.
    #[error("assignee {0} doesn't exist")]
    UnknownAssignee(String),

    /// Looking up a login failed for another reason.
    #[error("can't get {role} {login}: {source}")]
    UserLookup {
        role: &'static str,
        login: String,
        #[source]
        source: ApiError,
    },

    /// The branch lookup failed.
    #[error("{repo}: error checking branch: {source}")]
    Branch {
        repo: String,
        #[source]
        source: ApiError,
    },

    /// Looking up the open pull request failed.
    #[error("{repo}: can't read pull requests: {source}")]
    PullLookup {
        repo: String,
        #[source]
        source: ApiError,
    },

    /// Opening the pull request failed.
    #[error("{repo}: error creating a PR: {source}")]
    Create {
        repo: String,
        #[source]
        source: ApiError,
    },

    /// A git command failed or couldn't be started.
    #[error("{repo}: git {command} error: {message}")]
    Git {
        repo: String,
        command: String,
        message: String,
    },

    /// The change script exited unsuccessfully.
    #[error("{repo}: failed to apply changes: {message}")]
    Script { repo: String, message: String },

    /// Preparing the script file or the working directory failed.
    #[error("can't prepare working directory: {0}")]
    Workspace(#[source] std::io::Error),

    /// Writing to the output sink failed.
    #[error("can't write output: {0}")]
    Output(#[from] std::io::Error),
}
