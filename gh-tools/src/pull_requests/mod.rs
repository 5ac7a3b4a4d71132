//! Scripted pull request creation across repositories.
//!
//! For every repository a branch is cloned, changed by a shell script and
//! pushed, then a pull request is opened (or, in patch mode, the existing
//! one is updated) with the requested reviewers and assignees.

mod config;
mod error;
mod git;
mod status;

pub use config::{PrConfig, PrOptions, DEFAULT_SHELL};
pub use error::PrError;
pub use git::{ApplyOutcome, ChangeApplier, GitScript};
pub use status::PrStatus;

use crate::github::{ApiError, PullRequest, PullRequestApi, Repository};
use crate::summary::RunSummary;
use std::io::Write;
use tracing::{debug, info, info_span, Instrument};

/// Drives the pull request workflow over a set of repositories.
pub struct PrMaker<'a, A: ?Sized, G: ?Sized> {
    api: &'a A,
    applier: &'a G,
    config: &'a PrConfig,
}

impl<'a, A, G> PrMaker<'a, A, G>
where
    A: PullRequestApi + ?Sized,
    G: ChangeApplier + ?Sized,
{
    pub fn new(api: &'a A, applier: &'a G, config: &'a PrConfig) -> Self {
        Self {
            api,
            applier,
            config,
        }
    }

    /// Processes `repos` one at a time.
    ///
    /// Each repository gets one line on `out`: its name followed by what
    /// happened. Reviewer, assignee and update failures go to `diag` and
    /// don't stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`PrError`] for unknown reviewers or assignees and for the
    /// first branch, clone, script, push or creation failure.
    pub async fn run<W, D>(
        &self,
        repos: &[Repository],
        out: &mut W,
        diag: &mut D,
    ) -> Result<RunSummary, PrError>
    where
        W: Write,
        D: Write,
    {
        let mut summary = RunSummary::new();

        if repos.is_empty() {
            writeln!(out, "No matching repositories")?;
            return Ok(summary);
        }

        self.validate_logins().await?;

        for repo in repos {
            let span = info_span!("pr", repo = %repo.full_name, branch = %self.config.branch);
            write!(out, "{}", repo.full_name)?;
            let result = self
                .process_repository(repo, out, diag)
                .instrument(span)
                .await;
            writeln!(out)?;
            summary.record(&result?);
        }

        info!(
            created = summary.created,
            patched = summary.patched,
            skipped = summary.skipped,
            "Pull request run finished"
        );
        Ok(summary)
    }

    async fn validate_logins(&self) -> Result<(), PrError> {
        for login in &self.config.reviewers {
            if !self.user_exists("reviewer", login).await? {
                return Err(PrError::UnknownReviewer(login.clone()));
            }
        }
        for login in &self.config.assignees {
            if !self.user_exists("assignee", login).await? {
                return Err(PrError::UnknownAssignee(login.clone()));
            }
        }
        Ok(())
    }

    async fn user_exists(&self, role: &'static str, login: &str) -> Result<bool, PrError> {
        self.api
            .user_exists(login)
            .await
            .map_err(|source| PrError::UserLookup {
                role,
                login: login.to_string(),
                source,
            })
    }

    async fn process_repository<W, D>(
        &self,
        repo: &Repository,
        out: &mut W,
        diag: &mut D,
    ) -> Result<PrStatus, PrError>
    where
        W: Write,
        D: Write,
    {
        let config = self.config;
        let branch_exists = self
            .api
            .branch_exists(repo, &config.branch)
            .await
            .map_err(|source| PrError::Branch {
                repo: repo.full_name.clone(),
                source,
            })?;

        let existing = if branch_exists {
            let pull = self.find_pull(repo).await?;
            if !config.patch {
                write!(out, " the remote branch already exists")?;
                if let Some(pull) = &pull {
                    write!(out, " {}", pull.html_url)?;
                }
                return Ok(PrStatus::skipped("the remote branch already exists"));
            }
            match pull {
                Some(pull) => {
                    write!(out, " {}", pull.html_url)?;
                    Some(pull)
                }
                None => {
                    write!(out, " no PR found")?;
                    return Ok(PrStatus::skipped("no PR found"));
                }
            }
        } else if config.patch {
            write!(out, " branch not found")?;
            return Ok(PrStatus::skipped("branch not found"));
        } else {
            None
        };

        match self.applier.apply(repo).await? {
            ApplyOutcome::Pushed => {}
            ApplyOutcome::NoChanges => {
                write!(out, " no changes")?;
                if !config.patch {
                    return Ok(PrStatus::skipped("no changes"));
                }
            }
            ApplyOutcome::EmptyRepository => {
                write!(out, " empty repository")?;
                return Ok(PrStatus::skipped("empty repository"));
            }
        }

        let (pull, created) = match existing {
            Some(pull) => (pull, false),
            None => {
                let pull = self
                    .api
                    .create_pull(repo, &config.branch, &config.title, &config.description)
                    .await
                    .map_err(|source| PrError::Create {
                        repo: repo.full_name.clone(),
                        source,
                    })?;
                write!(out, " {}", pull.html_url)?;
                (pull, true)
            }
        };
        debug!(number = pull.number, created, "Pull request ready");

        if let Err(e) = self.sync_reviewers(repo, pull.number).await {
            writeln!(diag, "{}: {e}", repo.full_name)?;
        }
        if let Err(e) = self.sync_assignees(repo, pull.number).await {
            writeln!(diag, "{}: {e}", repo.full_name)?;
        }
        if config.patch {
            if let Err(e) = self.update_pull(repo, pull.number).await {
                writeln!(diag, "{}: error updating PR: {e}", repo.full_name)?;
            }
        }

        let PullRequest { number, html_url } = pull;
        Ok(if created {
            PrStatus::Created {
                number,
                url: html_url,
            }
        } else {
            PrStatus::Patched {
                number,
                url: html_url,
            }
        })
    }

    async fn find_pull(&self, repo: &Repository) -> Result<Option<PullRequest>, PrError> {
        self.api
            .find_open_pull(repo, &self.config.branch)
            .await
            .map_err(|source| PrError::PullLookup {
                repo: repo.full_name.clone(),
                source,
            })
    }

    async fn sync_reviewers(&self, repo: &Repository, number: u64) -> Result<(), SyncError> {
        let wanted = &self.config.reviewers;
        if wanted.is_empty() {
            return Ok(());
        }

        let current = if self.config.patch {
            self.api
                .requested_reviewers(repo, number)
                .await
                .map_err(|e| SyncError::new("error requesting PR reviewers", e))?
        } else {
            Vec::new()
        };
        let (add, remove) = plan_sync(wanted, &current);

        if !add.is_empty() {
            self.api
                .request_reviewers(repo, number, &add)
                .await
                .map_err(|e| SyncError::new("error requesting a PR review", e))?;
        }
        if !remove.is_empty() {
            self.api
                .remove_reviewers(repo, number, &remove)
                .await
                .map_err(|e| SyncError::new("error removing reviewers", e))?;
        }
        Ok(())
    }

    async fn sync_assignees(&self, repo: &Repository, number: u64) -> Result<(), SyncError> {
        let wanted = &self.config.assignees;
        if wanted.is_empty() {
            return Ok(());
        }

        let current = if self.config.patch {
            self.api
                .assignees(repo, number)
                .await
                .map_err(|e| SyncError::new("error retrieving PR", e))?
        } else {
            Vec::new()
        };
        let (add, remove) = plan_sync(wanted, &current);

        if !add.is_empty() {
            self.api
                .add_assignees(repo, number, &add)
                .await
                .map_err(|e| SyncError::new("error assigning the PR", e))?;
        }
        if !remove.is_empty() {
            self.api
                .remove_assignees(repo, number, &remove)
                .await
                .map_err(|e| SyncError::new("error removing assignees", e))?;
        }
        Ok(())
    }

    async fn update_pull(&self, repo: &Repository, number: u64) -> Result<(), ApiError> {
        let title = self.config.title_update();
        let body = self.config.description_update();
        if title.is_none() && body.is_none() {
            return Ok(());
        }
        self.api.update_pull(repo, number, title, body).await?;
        Ok(())
    }
}

/// A failed reviewer or assignee call, reported without aborting.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
struct SyncError {
    context: &'static str,
    source: ApiError,
}

impl SyncError {
    fn new(context: &'static str, source: ApiError) -> Self {
        Self { context, source }
    }
}

/// Splits logins into the ones to add and the current ones to remove.
/// Comparison ignores case.
fn plan_sync(wanted: &[String], current: &[String]) -> (Vec<String>, Vec<String>) {
    let add = wanted
        .iter()
        .filter(|login| !contains(current, login))
        .cloned()
        .collect();
    let remove = current
        .iter()
        .filter(|login| !contains(wanted, login))
        .cloned()
        .collect();
    (add, remove)
}

fn contains(logins: &[String], login: &str) -> bool {
    logins.iter().any(|l| l.eq_ignore_ascii_case(login))
}
