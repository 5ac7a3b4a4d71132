//! Applying the change script to a fresh clone with the `git` binary.

use super::{PrConfig, PrError};
use crate::github::Repository;
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::process::{Output, Stdio};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

/// What happened when changes were applied to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A commit was pushed to the branch.
    Pushed,
    /// The script left the tree clean.
    NoChanges,
    /// The remote repository has no commits.
    EmptyRepository,
}

/// Produces and pushes the changes of one repository.
#[async_trait]
pub trait ChangeApplier: Send + Sync {
    /// Applies the changes to `repo` and pushes them to the PR branch.
    async fn apply(&self, repo: &Repository) -> Result<ApplyOutcome, PrError>;
}

/// Clones the repository, runs a shell script in the checkout and pushes
/// the resulting commit.
#[derive(Debug)]
pub struct GitScript {
    token: String,
    shell: String,
    script: NamedTempFile,
    branch: String,
    commit_message: String,
    patch: bool,
}

impl GitScript {
    /// Writes the script to a temporary file shared by every repository.
    ///
    /// # Errors
    ///
    /// Returns [`PrError::Workspace`] if the script file can't be written.
    pub fn new(config: &PrConfig, token: impl Into<String>) -> Result<Self, PrError> {
        let mut script = tempfile::Builder::new()
            .prefix("gh-pr-script")
            .tempfile()
            .map_err(PrError::Workspace)?;
        script
            .write_all(config.script.as_bytes())
            .and_then(|()| script.flush())
            .map_err(PrError::Workspace)?;

        Ok(Self {
            token: token.into(),
            shell: config.shell.clone(),
            script,
            branch: config.branch.clone(),
            commit_message: config.commit_message.clone(),
            patch: config.patch,
        })
    }

    async fn git(&self, repo: &Repository, dir: &Path, args: &[&str]) -> Result<Output, PrError> {
        let command = args.first().copied().unwrap_or_default();
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.git_error(repo, command, &e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.git_error(repo, command, stderr.trim()));
        }

        Ok(output)
    }

    fn git_error(&self, repo: &Repository, command: &str, message: &str) -> PrError {
        PrError::Git {
            repo: repo.full_name.clone(),
            command: command.to_string(),
            message: redact(message, &self.token),
        }
    }

    async fn clone(&self, repo: &Repository, dir: &Path) -> Result<(), PrError> {
        let url = authenticated_url(&repo.clone_url, &self.token)
            .map_err(|message| self.git_error(repo, "clone", &message))?;

        debug!(patch = self.patch, "Cloning repository");
        if self.patch {
            self.git(repo, dir, &["clone", "--branch", &self.branch, &url, "."])
                .await?;
        } else {
            self.git(repo, dir, &["clone", "--depth", "1", &url, "."])
                .await?;
        }
        Ok(())
    }

    async fn is_empty(&self, dir: &Path) -> Result<bool, PrError> {
        let status = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(PrError::Workspace)?;
        Ok(!status.success())
    }

    async fn run_script(&self, repo: &Repository, dir: &Path) -> Result<(), PrError> {
        debug!(shell = %self.shell, "Running script");
        let output = Command::new(&self.shell)
            .arg(self.script.path())
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PrError::Script {
                repo: repo.full_name.clone(),
                message: format!("can't run {}: {e}", self.shell),
            })?;

        if !output.status.success() {
            let mut message = output.status.to_string();
            for stream in [&output.stdout, &output.stderr] {
                let text = String::from_utf8_lossy(stream);
                if !text.trim().is_empty() {
                    message.push('\n');
                    message.push_str(text.trim_end());
                }
            }
            warn!(status = %output.status, "Script failed");
            return Err(PrError::Script {
                repo: repo.full_name.clone(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ChangeApplier for GitScript {
    async fn apply(&self, repo: &Repository) -> Result<ApplyOutcome, PrError> {
        let dir = tempfile::tempdir().map_err(PrError::Workspace)?;
        let path = dir.path();

        self.clone(repo, path).await?;
        if self.is_empty(path).await? {
            info!("Remote repository is empty");
            return Ok(ApplyOutcome::EmptyRepository);
        }

        if !self.patch {
            self.git(repo, path, &["checkout", "-b", &self.branch]).await?;
        }

        self.run_script(repo, path).await?;

        self.git(repo, path, &["add", "-A"]).await?;
        let status = self.git(repo, path, &["status", "--porcelain"]).await?;
        if String::from_utf8_lossy(&status.stdout).trim().is_empty() {
            info!("No changes detected");
            return Ok(ApplyOutcome::NoChanges);
        }

        self.git(repo, path, &["commit", "-m", &self.commit_message])
            .await?;

        let refspec = format!("HEAD:refs/heads/{}", self.branch);
        self.git(repo, path, &["push", "origin", &refspec]).await?;
        info!(branch = %self.branch, "Pushed changes");

        Ok(ApplyOutcome::Pushed)
    }
}

/// Embeds the access token in an HTTPS clone URL.
fn authenticated_url(clone_url: &str, token: &str) -> Result<String, String> {
    let mut url = Url::parse(clone_url).map_err(|e| format!("invalid clone url {clone_url}: {e}"))?;
    url.set_username("x-access-token")
        .and_then(|()| url.set_password(Some(token)))
        .map_err(|()| format!("can't add credentials to {clone_url}"))?;
    Ok(url.into())
}

fn redact(message: &str, token: &str) -> String {
    if token.is_empty() {
        message.to_string()
    } else {
        message.replace(token, "***")
    }
}
