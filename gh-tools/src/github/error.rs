//! GitHub API error types.

use thiserror::Error;

/// Errors returned by the GitHub API collaborator.
///
/// `NotFound` and `Conflict` are split out of the generic case because some
/// call sites tolerate them (a missing ref or an empty repository).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource does not exist (HTTP 404).
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The request conflicts with the resource state (HTTP 409).
    /// GitHub answers this way for git data of an empty repository.
    #[error("{resource}: conflict, the repository may be empty")]
    Conflict { resource: String },

    /// Any other non-success HTTP status.
    #[error("{resource}: unexpected status {status}")]
    Status { resource: String, status: u16 },

    /// Transport or GitHub level failure reported by octocrab.
    #[error("GitHub API error: {0}")]
    GitHub(#[source] octocrab::Error),

    /// The response body could not be interpreted.
    #[error("unexpected response for {resource}: {message}")]
    UnexpectedResponse { resource: String, message: String },
}

impl ApiError {
    /// Classifies an octocrab error, promoting 404 and 409 responses to their
    /// dedicated variants.
    pub(crate) fn from_octocrab(error: octocrab::Error, resource: impl Into<String>) -> Self {
        let status = match &error {
            octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
            _ => None,
        };
        Self::from_status(status, resource).unwrap_or(Self::GitHub(error))
    }

    /// Maps a bare HTTP status to an error, or `None` for success statuses.
    pub(crate) fn from_status(status: Option<u16>, resource: impl Into<String>) -> Option<Self> {
        match status? {
            200..=299 => None,
            404 => Some(Self::NotFound {
                resource: resource.into(),
            }),
            409 => Some(Self::Conflict {
                resource: resource.into(),
            }),
            status => Some(Self::Status {
                resource: resource.into(),
                status,
            }),
        }
    }

    /// Returns true for HTTP 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for the statuses a tree lookup answers with when the ref
    /// does not exist (404) or the repository is empty (409).
    #[must_use]
    pub fn is_missing_ref_or_empty(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Conflict { .. })
    }
}
