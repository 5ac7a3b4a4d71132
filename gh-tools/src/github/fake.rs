//! In-memory [`GitHubApi`] used by tests.

use super::{
    ApiError, Artifact, ArtifactApi, CommitInfo, GitHubApi, Owner, OwnerKind, PullRequest,
    PullRequestApi, RepoPage, Repository, Subscription, SubscriptionApi, Tree, TreeEntry,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Canned GitHub data keyed by owner and repository full name.
///
/// Every call is appended to a log so tests can assert on which requests
/// were (or were not) made.
#[derive(Debug, Default)]
pub struct FakeGitHub {
    owners: HashMap<String, OwnerKind>,
    repos: HashMap<String, Vec<Repository>>,
    trees: HashMap<String, Tree>,
    tree_statuses: HashMap<String, u16>,
    blobs: HashMap<(String, String), Vec<u8>>,
    commits: HashMap<(String, String), CommitInfo>,
    failing_page: Option<u32>,
    failing_reviewers: bool,
    branches: HashSet<(String, String)>,
    state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
}

/// Data the mutating calls change.
#[derive(Debug, Default)]
struct FakeState {
    subscriptions: HashMap<String, Subscription>,
    artifacts: HashMap<String, Vec<Artifact>>,
    pulls: HashMap<(String, String), PullRequest>,
    reviewers: HashMap<(String, u64), Vec<String>>,
    assignees: HashMap<(String, u64), Vec<String>>,
    next_pull: u64,
}

impl FakeGitHub {
    /// Creates an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a personal account.
    #[must_use]
    pub fn with_user(mut self, login: &str) -> Self {
        self.owners.insert(login.to_string(), OwnerKind::User);
        self
    }

    /// Registers an organization account.
    #[must_use]
    pub fn with_org(mut self, login: &str) -> Self {
        self.owners.insert(login.to_string(), OwnerKind::Organization);
        self
    }

    /// Adds a repository to its owner's listing.
    #[must_use]
    pub fn with_repo(mut self, repo: Repository) -> Self {
        self.repos.entry(repo.owner.clone()).or_default().push(repo);
        self
    }

    /// Sets the tree returned for a repository.
    #[must_use]
    pub fn with_tree(mut self, full_name: &str, entries: Vec<TreeEntry>) -> Self {
        self.trees.insert(
            full_name.to_string(),
            Tree {
                entries,
                truncated: false,
            },
        );
        self
    }

    /// Sets a tree flagged as truncated.
    #[must_use]
    pub fn with_truncated_tree(mut self, full_name: &str, entries: Vec<TreeEntry>) -> Self {
        self.trees.insert(
            full_name.to_string(),
            Tree {
                entries,
                truncated: true,
            },
        );
        self
    }

    /// Makes the tree lookup of a repository fail with an HTTP status.
    #[must_use]
    pub fn with_tree_status(mut self, full_name: &str, status: u16) -> Self {
        self.tree_statuses.insert(full_name.to_string(), status);
        self
    }

    /// Sets the contents of a file.
    #[must_use]
    pub fn with_blob(mut self, full_name: &str, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.blobs
            .insert((full_name.to_string(), path.to_string()), contents.into());
        self
    }

    /// Sets the last commit touching a path.
    #[must_use]
    pub fn with_commit(mut self, full_name: &str, path: &str, commit: CommitInfo) -> Self {
        self.commits
            .insert((full_name.to_string(), path.to_string()), commit);
        self
    }

    /// Makes the listing fail when this page is requested.
    #[must_use]
    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Sets the subscription of the authenticated user.
    #[must_use]
    pub fn with_subscription(self, full_name: &str, subscription: Subscription) -> Self {
        self.lock_state()
            .subscriptions
            .insert(full_name.to_string(), subscription);
        self
    }

    /// Sets the Actions artifacts of a repository.
    #[must_use]
    pub fn with_artifacts(self, full_name: &str, artifacts: Vec<Artifact>) -> Self {
        self.lock_state()
            .artifacts
            .insert(full_name.to_string(), artifacts);
        self
    }

    /// Adds a remote branch.
    #[must_use]
    pub fn with_branch(mut self, full_name: &str, branch: &str) -> Self {
        self.branches
            .insert((full_name.to_string(), branch.to_string()));
        self
    }

    /// Adds a remote branch with an open pull request.
    #[must_use]
    pub fn with_pull(self, full_name: &str, branch: &str, number: u64) -> Self {
        let fake = self.with_branch(full_name, branch);
        fake.lock_state().pulls.insert(
            (full_name.to_string(), branch.to_string()),
            PullRequest {
                number,
                html_url: format!("https://github.com/{full_name}/pull/{number}"),
            },
        );
        fake
    }

    /// Sets the pending review requests of a pull request.
    #[must_use]
    pub fn with_reviewers(self, full_name: &str, number: u64, logins: &[&str]) -> Self {
        self.lock_state().reviewers.insert(
            (full_name.to_string(), number),
            logins.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Sets the assignees of a pull request.
    #[must_use]
    pub fn with_assignees(self, full_name: &str, number: u64, logins: &[&str]) -> Self {
        self.lock_state().assignees.insert(
            (full_name.to_string(), number),
            logins.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Makes review requests fail.
    #[must_use]
    pub fn failing_review_requests(mut self) -> Self {
        self.failing_reviewers = true;
        self
    }

    /// Current subscription of a repository.
    pub fn subscription_of(&self, full_name: &str) -> Option<Subscription> {
        self.lock_state().subscriptions.get(full_name).copied()
    }

    /// Remaining artifacts of a repository.
    pub fn artifacts_of(&self, full_name: &str) -> Vec<Artifact> {
        self.lock_state()
            .artifacts
            .get(full_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Open pull request for a branch.
    pub fn pull_of(&self, full_name: &str, branch: &str) -> Option<PullRequest> {
        self.lock_state()
            .pulls
            .get(&(full_name.to_string(), branch.to_string()))
            .cloned()
    }

    /// Pending review requests of a pull request.
    pub fn reviewers_of(&self, full_name: &str, number: u64) -> Vec<String> {
        self.lock_state()
            .reviewers
            .get(&(full_name.to_string(), number))
            .cloned()
            .unwrap_or_default()
    }

    /// Assignees of a pull request.
    pub fn assignees_of(&self, full_name: &str, number: u64) -> Vec<String> {
        self.lock_state()
            .assignees
            .get(&(full_name.to_string(), number))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the log of calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls().clone()
    }

    /// Returns how many calls start with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<String>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn page(&self, owner: &str, page: u32, per_page: u8) -> Result<RepoPage, ApiError> {
        if self.failing_page == Some(page) {
            return Err(ApiError::Status {
                resource: format!("{owner} repositories page {page}"),
                status: 500,
            });
        }

        let repos = self.repos.get(owner).map(Vec::as_slice).unwrap_or_default();
        let per_page = usize::from(per_page.max(1));
        let start = (page.max(1) as usize - 1) * per_page;
        let end = (start + per_page).min(repos.len());
        let items = repos.get(start..end).unwrap_or_default().to_vec();

        Ok(RepoPage {
            items,
            next_page: (end < repos.len()).then_some(page + 1),
        })
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn resolve_owner(&self, login: &str) -> Result<Owner, ApiError> {
        self.record(format!("owner {login}"));
        self.owners
            .get(login)
            .map(|kind| Owner {
                login: login.to_string(),
                kind: *kind,
            })
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/users/{login}"),
            })
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError> {
        self.record(format!("repo {owner}/{name}"));
        self.repos
            .get(owner)
            .and_then(|repos| repos.iter().find(|r| r.name == name))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/repos/{owner}/{name}"),
            })
    }

    async fn list_user_repos(
        &self,
        owner: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepoPage, ApiError> {
        self.record(format!("user-repos {owner} {page}"));
        self.page(owner, page, per_page)
    }

    async fn list_org_repos(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepoPage, ApiError> {
        self.record(format!("org-repos {org} {page}"));
        self.page(org, page, per_page)
    }

    async fn get_tree(&self, repo: &Repository, branch: &str) -> Result<Tree, ApiError> {
        self.record(format!("tree {} {branch}", repo.full_name));
        let resource = format!("/repos/{}/git/trees/{branch}", repo.full_name);
        if let Some(status) = self.tree_statuses.get(&repo.full_name) {
            if let Some(error) = ApiError::from_status(Some(*status), resource.as_str()) {
                return Err(error);
            }
        }
        self.trees
            .get(&repo.full_name)
            .cloned()
            .ok_or(ApiError::NotFound { resource })
    }

    async fn get_blob(&self, repo: &Repository, entry: &TreeEntry) -> Result<Vec<u8>, ApiError> {
        self.record(format!("blob {} {}", repo.full_name, entry.path));
        self.blobs
            .get(&(repo.full_name.clone(), entry.path.clone()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/repos/{}/git/blobs/{}", repo.full_name, entry.sha),
            })
    }

    async fn last_commit(
        &self,
        repo: &Repository,
        branch: &str,
        path: &str,
    ) -> Result<Option<CommitInfo>, ApiError> {
        self.record(format!("commit {} {branch} {path}", repo.full_name));
        Ok(self
            .commits
            .get(&(repo.full_name.clone(), path.to_string()))
            .cloned())
    }
}

#[async_trait]
impl SubscriptionApi for FakeGitHub {
    async fn subscription(&self, repo: &Repository) -> Result<Option<Subscription>, ApiError> {
        self.record(format!("subscription {}", repo.full_name));
        Ok(self.subscription_of(&repo.full_name))
    }

    async fn watch(&self, repo: &Repository) -> Result<Subscription, ApiError> {
        self.record(format!("watch {}", repo.full_name));
        let subscription = Subscription {
            subscribed: true,
            ignored: false,
        };
        self.lock_state()
            .subscriptions
            .insert(repo.full_name.clone(), subscription);
        Ok(subscription)
    }

    async fn unwatch(&self, repo: &Repository) -> Result<(), ApiError> {
        self.record(format!("unwatch {}", repo.full_name));
        self.lock_state().subscriptions.remove(&repo.full_name);
        Ok(())
    }
}

#[async_trait]
impl ArtifactApi for FakeGitHub {
    async fn artifacts(&self, repo: &Repository) -> Result<Vec<Artifact>, ApiError> {
        self.record(format!("artifacts {}", repo.full_name));
        Ok(self.artifacts_of(&repo.full_name))
    }

    async fn delete_artifact(
        &self,
        repo: &Repository,
        artifact: &Artifact,
    ) -> Result<(), ApiError> {
        self.record(format!("delete-artifact {} {}", repo.full_name, artifact.id));
        if let Some(artifacts) = self.lock_state().artifacts.get_mut(&repo.full_name) {
            artifacts.retain(|a| a.id != artifact.id);
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestApi for FakeGitHub {
    async fn user_exists(&self, login: &str) -> Result<bool, ApiError> {
        self.record(format!("user {login}"));
        Ok(self.owners.contains_key(login))
    }

    async fn branch_exists(&self, repo: &Repository, branch: &str) -> Result<bool, ApiError> {
        self.record(format!("branch {} {branch}", repo.full_name));
        Ok(self
            .branches
            .contains(&(repo.full_name.clone(), branch.to_string())))
    }

    async fn find_open_pull(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<PullRequest>, ApiError> {
        self.record(format!("find-pull {} {branch}", repo.full_name));
        Ok(self.pull_of(&repo.full_name, branch))
    }

    async fn create_pull(
        &self,
        repo: &Repository,
        head: &str,
        title: &str,
        _body: &str,
    ) -> Result<PullRequest, ApiError> {
        self.record(format!("create-pull {} {head} {title}", repo.full_name));
        let mut state = self.lock_state();
        state.next_pull += 1;
        let number = state.next_pull;
        let pull = PullRequest {
            number,
            html_url: format!("https://github.com/{}/pull/{number}", repo.full_name),
        };
        state
            .pulls
            .insert((repo.full_name.clone(), head.to_string()), pull.clone());
        Ok(pull)
    }

    async fn update_pull(
        &self,
        repo: &Repository,
        number: u64,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<PullRequest, ApiError> {
        self.record(format!(
            "update-pull {} {number} {} {}",
            repo.full_name,
            title.unwrap_or("-"),
            body.unwrap_or("-")
        ));
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{}/pull/{number}", repo.full_name),
        })
    }

    async fn requested_reviewers(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<String>, ApiError> {
        Ok(self.reviewers_of(&repo.full_name, number))
    }

    async fn request_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        self.record(format!(
            "request-reviewers {} {number} {}",
            repo.full_name,
            logins.join(",")
        ));
        if self.failing_reviewers {
            return Err(ApiError::Status {
                resource: format!("/repos/{}/pulls/{number}/requested_reviewers", repo.full_name),
                status: 422,
            });
        }
        self.lock_state()
            .reviewers
            .entry((repo.full_name.clone(), number))
            .or_default()
            .extend(logins.iter().cloned());
        Ok(())
    }

    async fn remove_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        self.record(format!(
            "remove-reviewers {} {number} {}",
            repo.full_name,
            logins.join(",")
        ));
        if let Some(reviewers) = self
            .lock_state()
            .reviewers
            .get_mut(&(repo.full_name.clone(), number))
        {
            reviewers.retain(|r| !logins.contains(r));
        }
        Ok(())
    }

    async fn assignees(&self, repo: &Repository, number: u64) -> Result<Vec<String>, ApiError> {
        Ok(self.assignees_of(&repo.full_name, number))
    }

    async fn add_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        self.record(format!(
            "add-assignees {} {number} {}",
            repo.full_name,
            logins.join(",")
        ));
        self.lock_state()
            .assignees
            .entry((repo.full_name.clone(), number))
            .or_default()
            .extend(logins.iter().cloned());
        Ok(())
    }

    async fn remove_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        self.record(format!(
            "remove-assignees {} {number} {}",
            repo.full_name,
            logins.join(",")
        ));
        if let Some(assignees) = self
            .lock_state()
            .assignees
            .get_mut(&(repo.full_name.clone(), number))
        {
            assignees.retain(|a| !logins.contains(a));
        }
        Ok(())
    }
}
