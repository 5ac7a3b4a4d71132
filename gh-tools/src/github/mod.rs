//! GitHub API collaborator.
//!
//! [`GitHubApi`] is the capability interface the repository finder and the
//! tree walker are written against. [`SubscriptionApi`], [`ArtifactApi`] and
//! [`PullRequestApi`] cover the calls of the other tools. [`OctocrabClient`]
//! implements all of them on top of octocrab.

mod client;
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod fake;
mod models;
mod pulls;
mod repo_admin;

pub use client::OctocrabClient;
pub use error::ApiError;
#[cfg(any(test, feature = "test-utils"))]
pub use fake::FakeGitHub;
pub use models::{
    CommitInfo, EntryKind, Owner, OwnerKind, RepoPage, Repository, Tree, TreeEntry,
};
pub use pulls::PullRequest;
pub use repo_admin::{Artifact, Subscription};

use async_trait::async_trait;

/// Read access to owners, repositories and their git data.
///
/// Every call is a single request; pagination is driven by the caller.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Looks up a user or organization.
    async fn resolve_owner(&self, login: &str) -> Result<Owner, ApiError>;

    /// Fetches a single repository.
    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError>;

    /// Fetches one page of repositories owned by a user.
    async fn list_user_repos(
        &self,
        owner: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepoPage, ApiError>;

    /// Fetches one page of repositories owned by an organization.
    async fn list_org_repos(&self, org: &str, page: u32, per_page: u8)
        -> Result<RepoPage, ApiError>;

    /// Fetches the full recursive tree of `branch`.
    async fn get_tree(&self, repo: &Repository, branch: &str) -> Result<Tree, ApiError>;

    /// Downloads the contents of a blob entry.
    async fn get_blob(&self, repo: &Repository, entry: &TreeEntry) -> Result<Vec<u8>, ApiError>;

    /// Finds the most recent commit on `branch` touching `path`.
    async fn last_commit(
        &self,
        repo: &Repository,
        branch: &str,
        path: &str,
    ) -> Result<Option<CommitInfo>, ApiError>;
}

/// Notification subscriptions of the authenticated user.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Returns the current subscription, `None` when not watching.
    async fn subscription(&self, repo: &Repository) -> Result<Option<Subscription>, ApiError>;

    /// Subscribes to notifications.
    async fn watch(&self, repo: &Repository) -> Result<Subscription, ApiError>;

    /// Deletes the subscription.
    async fn unwatch(&self, repo: &Repository) -> Result<(), ApiError>;
}

/// GitHub Actions artifacts.
#[async_trait]
pub trait ArtifactApi: Send + Sync {
    /// Lists every artifact of a repository.
    async fn artifacts(&self, repo: &Repository) -> Result<Vec<Artifact>, ApiError>;

    /// Deletes one artifact.
    async fn delete_artifact(&self, repo: &Repository, artifact: &Artifact)
        -> Result<(), ApiError>;
}

/// Branches, pull requests, reviewers and assignees.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Returns whether a user account exists.
    async fn user_exists(&self, login: &str) -> Result<bool, ApiError>;

    /// Returns whether `branch` exists on the remote.
    async fn branch_exists(&self, repo: &Repository, branch: &str) -> Result<bool, ApiError>;

    /// Finds the open pull request whose head is `branch`.
    async fn find_open_pull(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<PullRequest>, ApiError>;

    /// Opens a pull request from `head` into the default branch.
    async fn create_pull(
        &self,
        repo: &Repository,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, ApiError>;

    /// Updates the title and/or body of a pull request.
    async fn update_pull(
        &self,
        repo: &Repository,
        number: u64,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<PullRequest, ApiError>;

    /// Logins with a pending review request.
    async fn requested_reviewers(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<String>, ApiError>;

    /// Requests reviews.
    async fn request_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError>;

    /// Withdraws review requests.
    async fn remove_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError>;

    /// Logins assigned to an issue or pull request.
    async fn assignees(&self, repo: &Repository, number: u64) -> Result<Vec<String>, ApiError>;

    /// Adds assignees.
    async fn add_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError>;

    /// Removes assignees.
    async fn remove_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError>;
}
