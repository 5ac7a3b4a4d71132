//! Any-of pattern lists.

use crate::config::{compile_pattern, ConfigError};
use regex::Regex;

/// An ordered list of patterns, tested until the first match.
///
/// An empty list neither admits nor rejects anything: both
/// [`PatternList::admits`] and [`PatternList::rejects`] let values through.
#[derive(Debug, Clone, Default)]
pub struct PatternList(Vec<Regex>);

impl PatternList {
    /// Compiles every pattern given for `flag`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] for the first pattern that doesn't
    /// compile.
    pub fn compile<S: AsRef<str>>(flag: &'static str, patterns: &[S]) -> Result<Self, ConfigError> {
        patterns
            .iter()
            .map(|pattern| compile_pattern(flag, pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Returns true when the list holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any pattern matches.
    pub fn any_match(&self, value: &str) -> bool {
        self.0.iter().any(|regex| regex.is_match(value))
    }

    /// Inclusion check: passes when empty or when any pattern matches.
    pub fn admits(&self, value: &str) -> bool {
        self.is_empty() || self.any_match(value)
    }

    /// Exclusion check: true when non-empty and any pattern matches.
    pub fn rejects(&self, value: &str) -> bool {
        !self.is_empty() && self.any_match(value)
    }
}
