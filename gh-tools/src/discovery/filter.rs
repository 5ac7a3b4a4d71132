//! Repository selection predicates.

use crate::github::Repository;
use regex::Regex;

/// Criteria used to select the repositories of one owner.
///
/// When [`RepoFilter::repo`] is set the finder runs in single-repo mode and
/// none of the other criteria apply.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    /// The owner login. Can be a user or an organization.
    pub owner: String,

    /// The repository name in single-repo mode.
    pub repo: Option<String>,

    /// Repository names must match this pattern.
    pub repo_regex: Option<Regex>,

    /// Repository names must not match this pattern.
    pub no_repo_regex: Option<Regex>,

    /// Include archived repositories.
    pub archived: bool,

    /// Exclude private repositories.
    pub no_private: bool,

    /// Exclude public repositories.
    pub no_public: bool,

    /// Exclude forks.
    pub no_fork: bool,
}

impl RepoFilter {
    /// Creates a filter that admits every non-archived repository of `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }

    /// Selects exactly one repository by name.
    #[must_use]
    pub fn single(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Only admits repositories whose name matches `regex`.
    #[must_use]
    pub fn matching(mut self, regex: Regex) -> Self {
        self.repo_regex = Some(regex);
        self
    }

    /// Rejects repositories whose name matches `regex`.
    #[must_use]
    pub fn rejecting(mut self, regex: Regex) -> Self {
        self.no_repo_regex = Some(regex);
        self
    }

    /// Includes archived repositories.
    #[must_use]
    pub fn with_archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Excludes private repositories.
    #[must_use]
    pub fn without_private(mut self) -> Self {
        self.no_private = true;
        self
    }

    /// Excludes public repositories.
    #[must_use]
    pub fn without_public(mut self) -> Self {
        self.no_public = true;
        self
    }

    /// Excludes forks.
    #[must_use]
    pub fn without_forks(mut self) -> Self {
        self.no_fork = true;
        self
    }

    /// Returns the single repository name, if in single-repo mode.
    pub fn single_repo(&self) -> Option<&str> {
        self.repo.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns true when no repository can ever pass.
    pub fn admits_nothing(&self) -> bool {
        self.no_private && self.no_public
    }

    /// Checks one repository against every predicate, in order.
    pub fn admits(&self, repo: &Repository) -> bool {
        if repo.archived && !self.archived {
            return false;
        }

        if repo.private {
            if self.no_private {
                return false;
            }
        } else if self.no_public {
            return false;
        }

        if repo.fork && self.no_fork {
            return false;
        }

        if let Some(regex) = &self.repo_regex {
            if !regex.is_match(&repo.name) {
                return false;
            }
        }

        if let Some(regex) = &self.no_repo_regex {
            if regex.is_match(&repo.name) {
                return false;
            }
        }

        true
    }

    /// Keeps the admitted repositories, preserving order.
    pub fn apply(&self, repos: Vec<Repository>) -> Vec<Repository> {
        repos.into_iter().filter(|repo| self.admits(repo)).collect()
    }
}
