//! Repository selection options shared by every tool.

use super::{compile_pattern, ConfigError, Target};
use crate::discovery::RepoFilter;

/// Raw repository selection flags.
#[derive(Debug, Clone, Default)]
pub struct RepoOptions {
    /// `owner[/repo]`.
    pub target: String,

    /// Pattern repository names must match.
    pub repo: Option<String>,

    /// Pattern repository names must not match.
    pub no_repo: Option<String>,

    /// Include archived repositories.
    pub archived: bool,

    /// Exclude private repositories.
    pub no_private: bool,

    /// Exclude public repositories.
    pub no_public: bool,

    /// Exclude forks.
    pub no_fork: bool,
}

impl RepoOptions {
    /// Creates options selecting every repository of `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Validates the flags into a [`RepoFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed target, conflicting visibility
    /// flags or a pattern that doesn't compile.
    pub fn to_filter(&self) -> Result<RepoFilter, ConfigError> {
        let target = Target::parse(&self.target)?;

        if self.no_private && self.no_public {
            return Err(ConfigError::VisibilityConflict);
        }

        let mut filter = RepoFilter::new(target.owner);
        filter.repo = target.repo;
        filter.repo_regex = self
            .repo
            .as_deref()
            .map(|pattern| compile_pattern("repo", pattern))
            .transpose()?;
        filter.no_repo_regex = self
            .no_repo
            .as_deref()
            .map(|pattern| compile_pattern("no-repo", pattern))
            .transpose()?;
        filter.archived = self.archived;
        filter.no_private = self.no_private;
        filter.no_public = self.no_public;
        filter.no_fork = self.no_fork;

        Ok(filter)
    }
}
