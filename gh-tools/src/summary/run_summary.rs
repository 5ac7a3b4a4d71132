//! Run summary types.

use crate::pull_requests::PrStatus;
use std::fmt;

/// Summary of a complete pull request run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of repositories processed.
    pub repositories: usize,

    /// Number of pull requests opened.
    pub created: usize,

    /// Number of existing pull requests updated.
    pub patched: usize,

    /// Number of repositories left alone.
    pub skipped: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with the outcome of one repository.
    pub fn record(&mut self, status: &PrStatus) {
        self.repositories += 1;
        match status {
            PrStatus::Created { .. } => self.created += 1,
            PrStatus::Patched { .. } => self.patched += 1,
            PrStatus::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Returns true if any pull request was opened or updated.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.created > 0 || self.patched > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} repositories: {} created, {} patched, {} skipped",
            self.repositories, self.created, self.patched, self.skipped
        )
    }
}
