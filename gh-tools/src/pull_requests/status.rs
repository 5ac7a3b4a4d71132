//! Pull request status types.

use serde::Serialize;

/// Outcome of processing one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrStatus {
    /// A new pull request was opened.
    Created {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// An existing pull request was updated.
    Patched {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// The repository was left alone.
    Skipped {
        /// Reason printed after the repository name.
        reason: String,
    },
}

impl PrStatus {
    pub(crate) fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns the status as a short string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Patched { .. } => "patched",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// Returns the PR URL if one was created or patched.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Created { url, .. } | Self::Patched { url, .. } => Some(url),
            Self::Skipped { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pr_status_to_string() {
        let created = PrStatus::Created {
            number: 1,
            url: "https://github.com/acme/api/pull/1".to_string(),
        };
        assert_eq!(created.as_str(), "created");
        assert_eq!(created.url(), Some("https://github.com/acme/api/pull/1"));

        let skipped = PrStatus::skipped("no changes");
        assert_eq!(skipped.as_str(), "skipped");
        assert_eq!(skipped.url(), None);
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(PrStatus::Patched {
            number: 7,
            url: "u".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "patched");
        assert_eq!(json["number"], 7);
    }
}
