//! Result budgets of a walk.

/// Global, per-repository and per-grep match limits with their counters.
///
/// A limit of zero means unbounded. Counters only move up; the per-repository
/// counter is reset by [`MatchBudget::start_repository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchBudget {
    max_results: usize,
    max_repo_results: usize,
    max_grep_results: usize,
    matched: usize,
    repo_matched: usize,
}

impl MatchBudget {
    /// Creates a budget with the given limits.
    pub fn new(max_results: usize, max_repo_results: usize, max_grep_results: usize) -> Self {
        Self {
            max_results,
            max_repo_results,
            max_grep_results,
            ..Self::default()
        }
    }

    /// Creates a budget without limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Resets the per-repository counter.
    pub fn start_repository(&mut self) {
        self.repo_matched = 0;
    }

    /// Returns true once the global limit is reached.
    pub fn global_exhausted(&self) -> bool {
        self.max_results > 0 && self.matched >= self.max_results
    }

    /// Returns true once the current repository's limit is reached.
    pub fn repository_exhausted(&self) -> bool {
        self.max_repo_results > 0 && self.repo_matched >= self.max_repo_results
    }

    /// Line limit for one grep call, zero for unbounded.
    pub fn grep_limit(&self) -> usize {
        self.max_grep_results
    }

    /// Counts one matching entry.
    pub fn record_match(&mut self) {
        self.matched += 1;
        self.repo_matched += 1;
    }

    /// Entries matched across all repositories.
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Entries matched in the current repository.
    pub fn repo_matched(&self) -> usize {
        self.repo_matched
    }
}
