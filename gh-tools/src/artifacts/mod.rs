//! GitHub Actions artifact purging.
//!
//! Every artifact of every selected repository is deleted, one call at a
//! time. In dry-run mode the artifacts are only counted.

mod error;

pub use error::ArtifactError;

use crate::config::{ConfigError, RepoOptions};
use crate::discovery::RepoFilter;
use crate::github::{ArtifactApi, Repository};
use crate::size::format_bytes;
use std::io::Write;
use tracing::{debug, info, info_span, Instrument};

/// Raw purge flags.
#[derive(Debug, Clone, Default)]
pub struct ArtifactOptions {
    /// Repository selection.
    pub repos: RepoOptions,
    /// Count artifacts without deleting them.
    pub dry_run: bool,
}

/// Validated purge configuration.
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Repository selection.
    pub filter: RepoFilter,
    /// Count artifacts without deleting them.
    pub dry_run: bool,
}

impl ArtifactConfig {
    /// Validates raw options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid repository selection.
    pub fn from_options(options: ArtifactOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            filter: options.repos.to_filter()?,
            dry_run: options.dry_run,
        })
    }
}

/// Per-repository or aggregate purge totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeTotals {
    /// Artifacts deleted (or found in dry-run mode).
    pub artifacts: u64,
    /// Combined size of those artifacts in bytes.
    pub bytes: u64,
}

impl PurgeTotals {
    fn add(&mut self, other: Self) {
        self.artifacts += other.artifacts;
        self.bytes += other.bytes;
    }
}

/// Purges artifacts from `repos`, printing one line per repository and a
/// total line when more than one repository was processed.
///
/// # Errors
///
/// Returns [`ArtifactError`] on the first failed listing or deletion.
pub async fn purge_artifacts<A, W>(
    api: &A,
    repos: &[Repository],
    dry_run: bool,
    out: &mut W,
) -> Result<PurgeTotals, ArtifactError>
where
    A: ArtifactApi + ?Sized,
    W: Write,
{
    let mut totals = PurgeTotals::default();

    for repo in repos {
        let span = info_span!("purge", repo = %repo.full_name, dry_run);
        let purged = purge_repository(api, repo, dry_run, out)
            .instrument(span)
            .await?;
        totals.add(purged);
    }

    if repos.len() > 1 {
        writeln!(
            out,
            "Total: {} {} artifacts ({}) in {} repos",
            verb(dry_run),
            totals.artifacts,
            format_bytes(totals.bytes),
            repos.len()
        )?;
    }

    Ok(totals)
}

async fn purge_repository<A, W>(
    api: &A,
    repo: &Repository,
    dry_run: bool,
    out: &mut W,
) -> Result<PurgeTotals, ArtifactError>
where
    A: ArtifactApi + ?Sized,
    W: Write,
{
    let artifacts = api
        .artifacts(repo)
        .await
        .map_err(|source| ArtifactError::List {
            repo: repo.full_name.clone(),
            source,
        })?;
    debug!(count = artifacts.len(), "Listed artifacts");

    write!(out, "{}", repo.full_name)?;

    let mut purged = PurgeTotals::default();
    let mut result = Ok(());
    for artifact in &artifacts {
        if !dry_run {
            if let Err(source) = api.delete_artifact(repo, artifact).await {
                result = Err(ArtifactError::Delete {
                    repo: repo.full_name.clone(),
                    name: artifact.name.clone(),
                    source,
                });
                break;
            }
        }
        purged.artifacts += 1;
        purged.bytes += artifact.size_in_bytes;
    }

    // The line is completed even when a deletion failed part way.
    if purged.artifacts > 0 {
        write!(
            out,
            " {} {} out of {} artifacts ({})",
            verb(dry_run),
            purged.artifacts,
            artifacts.len(),
            format_bytes(purged.bytes)
        )?;
    }
    writeln!(out)?;

    result?;
    info!(artifacts = purged.artifacts, bytes = purged.bytes, "Repository done");
    Ok(purged)
}

fn verb(dry_run: bool) -> &'static str {
    if dry_run {
        "found"
    } else {
        "purged"
    }
}
