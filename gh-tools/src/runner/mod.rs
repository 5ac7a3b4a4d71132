//! Orchestrates discovery and the per-tool work.
//!
//! Every tool resolves its repository set with [`RepoFinder`] first, then
//! processes the repositories one at a time. Results go to `out`, warnings
//! and non-fatal failures to `diag`.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::artifacts::{purge_artifacts, ArtifactConfig, PurgeTotals};
use crate::discovery::{RepoFilter, RepoFinder};
use crate::find::{FindConfig, MatchBudget, TreeWalker};
use crate::github::{
    ArtifactApi, GitHubApi, OctocrabClient, PullRequestApi, Repository, SubscriptionApi,
};
use crate::pull_requests::{GitScript, PrConfig, PrMaker};
use crate::summary::RunSummary;
use crate::watch::{watch_repositories, WatchConfig};
use std::io::Write;
use tracing::info;

/// Runs the tools against one GitHub client.
pub struct Runner<A = OctocrabClient> {
    config: RunnerConfig,
    api: A,
}

impl Runner {
    /// Builds a runner with an authenticated octocrab client.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Client`] if the client can't be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = OctocrabClient::new(config.token())?;
        Ok(Self { config, api })
    }
}

impl<A: GitHubApi> Runner<A> {
    /// Builds a runner around an existing client.
    pub fn with_client(config: RunnerConfig, api: A) -> Self {
        Self { config, api }
    }

    /// Returns the GitHub client.
    pub fn api(&self) -> &A {
        &self.api
    }

    async fn discover(&self, filter: &RepoFilter) -> Result<Vec<Repository>, RunnerError> {
        let repos = RepoFinder::new(&self.api).find(filter).await?;
        info!(owner = %filter.owner, count = repos.len(), "Found repositories");
        Ok(repos)
    }

    /// Searches the trees of the selected repositories.
    ///
    /// Returns the budget in its post-walk state.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on discovery or walk failures.
    pub async fn find<W, D>(
        &self,
        config: &FindConfig,
        out: &mut W,
        diag: &mut D,
    ) -> Result<MatchBudget, RunnerError>
    where
        W: Write,
        D: Write,
    {
        let repos = self.discover(&config.filter).await?;
        let mut budget = config.budget();
        TreeWalker::new(&self.api, config)
            .walk(&repos, &mut budget, out, diag)
            .await?;
        Ok(budget)
    }

    /// Lists or toggles notification subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on discovery or subscription failures.
    pub async fn watch<W>(&self, config: &WatchConfig, out: &mut W) -> Result<(), RunnerError>
    where
        A: SubscriptionApi,
        W: Write,
    {
        let repos = self.discover(&config.filter).await?;
        watch_repositories(&self.api, &repos, config.action, out).await?;
        Ok(())
    }

    /// Deletes (or counts) Actions artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on discovery, listing or deletion failures.
    pub async fn purge_artifacts<W>(
        &self,
        config: &ArtifactConfig,
        out: &mut W,
    ) -> Result<PurgeTotals, RunnerError>
    where
        A: ArtifactApi,
        W: Write,
    {
        let repos = self.discover(&config.filter).await?;
        Ok(purge_artifacts(&self.api, &repos, config.dry_run, out).await?)
    }

    /// Applies the script to every selected repository and opens or
    /// updates pull requests.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on discovery failures and the fatal
    /// failures of [`PrMaker::run`].
    pub async fn pr<W, D>(
        &self,
        config: &PrConfig,
        out: &mut W,
        diag: &mut D,
    ) -> Result<RunSummary, RunnerError>
    where
        A: PullRequestApi,
        W: Write,
        D: Write,
    {
        let repos = self.discover(&config.filter).await?;
        let applier = GitScript::new(config, self.config.token())?;
        Ok(PrMaker::new(&self.api, &applier, config)
            .run(&repos, out, diag)
            .await?)
    }
}
