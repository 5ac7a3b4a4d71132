//! Find options and their validation.

use super::{MatchBudget, PatternList, SizePredicate};
use crate::config::{compile_bytes_pattern, ConfigError, RepoOptions};
use crate::discovery::RepoFilter;
use crate::github::{EntryKind, TreeEntry};
use regex::bytes::Regex;

/// Entry type restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// `f`: files only.
    File,
    /// `d`: directories only.
    Directory,
}

impl EntryType {
    /// Parses `f` or `d`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidType`] for anything else.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        match input {
            "f" => Ok(Self::File),
            "d" => Ok(Self::Directory),
            other => Err(ConfigError::InvalidType(other.to_string())),
        }
    }

    /// Returns true if the entry has this type.
    pub fn admits(self, entry: &TreeEntry) -> bool {
        match self {
            Self::File => entry.kind == EntryKind::Blob,
            Self::Directory => entry.kind == EntryKind::Tree,
        }
    }
}

/// Raw find flags, as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Repository selection.
    pub repos: RepoOptions,
    /// Branch to walk instead of the default branch.
    pub branch: Option<String>,
    /// `f` or `d`.
    pub entry_type: Option<String>,
    /// Descend at least this many directory levels.
    pub min_depth: i64,
    /// Descend at most this many directory levels.
    pub max_depth: i64,
    /// Global match limit.
    pub max_results: i64,
    /// Per-repository match limit.
    pub max_repo_results: i64,
    /// Per-file grep line limit.
    pub max_grep_results: i64,
    /// Patterns the basename must match (any of).
    pub name: Vec<String>,
    /// Patterns rejecting the basename.
    pub no_name: Vec<String>,
    /// Patterns the full path must match (any of).
    pub path: Vec<String>,
    /// Patterns rejecting the full path.
    pub no_path: Vec<String>,
    /// Pattern file contents must match.
    pub grep: Option<String>,
    /// Pattern rejecting file contents.
    pub no_grep: Option<String>,
    /// `[+-]<digits><unit>`.
    pub size: Option<String>,
    /// List repositories without matches instead of matches.
    pub no_matches: bool,
    /// Add type, author, size and commit date to each entry.
    pub list_details: bool,
}

/// Validated find configuration.
#[derive(Debug, Clone)]
pub struct FindConfig {
    /// Repository selection.
    pub filter: RepoFilter,
    /// Branch override.
    pub branch: Option<String>,
    /// Entry type restriction.
    pub entry_type: Option<EntryType>,
    /// Minimum depth, zero for none.
    pub min_depth: usize,
    /// Maximum depth, zero for none.
    pub max_depth: usize,
    /// Global match limit, zero for none.
    pub max_results: usize,
    /// Per-repository match limit, zero for none.
    pub max_repo_results: usize,
    /// Per-file grep line limit, zero for none.
    pub max_grep_results: usize,
    /// Basename patterns, any of which must match.
    pub name: PatternList,
    /// Basename patterns, none of which may match.
    pub no_name: PatternList,
    /// Full path patterns, any of which must match.
    pub path: PatternList,
    /// Full path patterns, none of which may match.
    pub no_path: PatternList,
    /// Content pattern; matching lines are printed.
    pub grep: Option<Regex>,
    /// Content pattern rejecting a file, checked before `grep`.
    pub no_grep: Option<Regex>,
    /// File size bound.
    pub size: Option<SizePredicate>,
    /// Print repositories without matches instead of the matches.
    pub no_matches: bool,
    /// Print type, author, size and commit date for each entry.
    pub list_details: bool,
}

impl FindConfig {
    /// Validates raw options.
    ///
    /// `grep`, `no-grep` and `size` restrict the walk to files. `no-matches`
    /// lifts the global limit and caps the per-repository and per-grep
    /// limits at one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn from_options(options: FindOptions) -> Result<Self, ConfigError> {
        let filter = options.repos.to_filter()?;

        let name = PatternList::compile("name", &options.name)?;
        let no_name = PatternList::compile("no-name", &options.no_name)?;
        let path = PatternList::compile("path", &options.path)?;
        let no_path = PatternList::compile("no-path", &options.no_path)?;

        let mut entry_type = options
            .entry_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(EntryType::parse)
            .transpose()?;

        let grep = options
            .grep
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile_bytes_pattern("grep", p))
            .transpose()?;
        let no_grep = options
            .no_grep
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile_bytes_pattern("no-grep", p))
            .transpose()?;
        if grep.is_some() || no_grep.is_some() {
            entry_type = Some(EntryType::File);
        }

        let min_depth = non_negative("min-depth", options.min_depth)?;
        let max_depth = non_negative("max-depth", options.max_depth)?;
        if min_depth > 0 && max_depth > 0 && max_depth < min_depth {
            return Err(ConfigError::DepthRange);
        }
        let mut max_results = non_negative("max-results", options.max_results)?;
        let mut max_repo_results = non_negative("max-repo-results", options.max_repo_results)?;
        let mut max_grep_results = non_negative("max-grep-results", options.max_grep_results)?;

        let size = options
            .size
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<SizePredicate>()
                    .map_err(|_| ConfigError::InvalidSize(s.to_string()))
            })
            .transpose()?;
        if size.is_some() {
            entry_type = Some(EntryType::File);
        }

        if options.no_matches {
            max_results = 0;
            max_repo_results = 1;
            max_grep_results = 1;
        }

        Ok(Self {
            filter,
            branch: options.branch.filter(|b| !b.is_empty()),
            entry_type,
            min_depth,
            max_depth,
            max_results,
            max_repo_results,
            max_grep_results,
            name,
            no_name,
            path,
            no_path,
            grep,
            no_grep,
            size,
            no_matches: options.no_matches,
            list_details: options.list_details,
        })
    }

    /// Creates the budget a walk starts with.
    pub fn budget(&self) -> MatchBudget {
        MatchBudget::new(
            self.max_results,
            self.max_repo_results,
            self.max_grep_results,
        )
    }
}

impl FindConfig {
    /// Applies the metadata predicates to one entry, in order: depth, type,
    /// size, rejected paths, matched paths, rejected names, matched names.
    ///
    /// Content predicates are not evaluated here.
    pub fn admits(&self, entry: &TreeEntry) -> bool {
        let level = super::depth(&entry.path);
        if self.min_depth > 0 && level < self.min_depth {
            return false;
        }
        if self.max_depth > 0 && level > self.max_depth {
            return false;
        }

        if let Some(entry_type) = self.entry_type {
            if !entry_type.admits(entry) {
                return false;
            }
        }

        if let Some(size) = &self.size {
            if !size.matches(entry.size.unwrap_or(0)) {
                return false;
            }
        }

        if self.no_path.rejects(&entry.path) || !self.path.admits(&entry.path) {
            return false;
        }

        let basename = entry.basename();
        !self.no_name.rejects(basename) && self.name.admits(basename)
    }
}

fn non_negative(flag: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Negative(flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FindOptions {
        FindOptions {
            repos: RepoOptions::new("acme"),
            ..FindOptions::default()
        }
    }

    #[test]
    fn defaults_are_unbounded() {
        let config = FindConfig::from_options(options()).unwrap();
        assert_eq!(config.entry_type, None);
        assert_eq!(config.budget(), MatchBudget::unlimited());
        assert!(config.name.is_empty());
        assert!(config.grep.is_none());
    }

    #[test]
    fn content_and_size_imply_files() {
        for opts in [
            FindOptions {
                grep: Some("TODO".to_string()),
                ..options()
            },
            FindOptions {
                no_grep: Some("TODO".to_string()),
                entry_type: Some("d".to_string()),
                ..options()
            },
            FindOptions {
                size: Some("+1k".to_string()),
                ..options()
            },
        ] {
            let config = FindConfig::from_options(opts).unwrap();
            assert_eq!(config.entry_type, Some(EntryType::File));
        }
    }

    #[test]
    fn no_matches_overrides_limits() {
        let config = FindConfig::from_options(FindOptions {
            no_matches: true,
            max_results: 10,
            max_repo_results: 5,
            max_grep_results: 5,
            ..options()
        })
        .unwrap();

        assert_eq!(config.max_results, 0);
        assert_eq!(config.max_repo_results, 1);
        assert_eq!(config.max_grep_results, 1);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            (
                FindOptions {
                    entry_type: Some("x".to_string()),
                    ..options()
                },
                "invalid type: x",
            ),
            (
                FindOptions {
                    max_depth: -1,
                    ..options()
                },
                "max-depth should be positive",
            ),
            (
                FindOptions {
                    max_grep_results: -3,
                    ..options()
                },
                "max-grep-results should be positive",
            ),
            (
                FindOptions {
                    min_depth: 3,
                    max_depth: 2,
                    ..options()
                },
                "min-depth should be less than max-depth",
            ),
            (
                FindOptions {
                    size: Some("10 KBaz".to_string()),
                    ..options()
                },
                "invalid size 10 KBaz",
            ),
            (
                FindOptions {
                    repos: RepoOptions::new(""),
                    ..FindOptions::default()
                },
                "owner is required",
            ),
        ];

        for (opts, message) in cases {
            let err = FindConfig::from_options(opts).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn names_the_bad_pattern_flag() {
        let err = FindConfig::from_options(FindOptions {
            name: vec!["ok".to_string(), "(".to_string()],
            ..options()
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid name pattern: (:"));

        let err = FindConfig::from_options(FindOptions {
            grep: Some("[".to_string()),
            ..options()
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid grep pattern: [:"));
    }

    #[test]
    fn equal_depth_bounds_are_valid() {
        let config = FindConfig::from_options(FindOptions {
            min_depth: 2,
            max_depth: 2,
            ..options()
        })
        .unwrap();
        assert_eq!((config.min_depth, config.max_depth), (2, 2));
    }

    #[test]
    fn filters_by_depth() {
        let config = FindConfig::from_options(FindOptions {
            min_depth: 2,
            max_depth: 2,
            ..options()
        })
        .unwrap();
        assert!(!config.admits(&TreeEntry::blob("a", 1)));
        assert!(config.admits(&TreeEntry::blob("a/b", 1)));
        assert!(!config.admits(&TreeEntry::blob("a/b/c", 1)));
    }

    #[test]
    fn filters_by_type() {
        let config = FindConfig::from_options(FindOptions {
            entry_type: Some("d".to_string()),
            ..options()
        })
        .unwrap();
        assert!(config.admits(&TreeEntry::tree("src")));
        assert!(!config.admits(&TreeEntry::blob("src/a.go", 1)));
    }

    #[test]
    fn filters_by_size() {
        let config = FindConfig::from_options(FindOptions {
            size: Some("-1k".to_string()),
            ..options()
        })
        .unwrap();
        assert!(config.admits(&TreeEntry::blob("small", 1000)));
        assert!(!config.admits(&TreeEntry::blob("large", 1001)));
        assert!(!config.admits(&TreeEntry::tree("dir")));
    }

    #[test]
    fn path_rejects_win_over_path_matches() {
        let config = FindConfig::from_options(FindOptions {
            path: vec!["^src/".to_string()],
            no_path: vec!["vendor".to_string()],
            ..options()
        })
        .unwrap();
        assert!(config.admits(&TreeEntry::blob("src/a.go", 1)));
        assert!(!config.admits(&TreeEntry::blob("src/vendor/b.go", 1)));
        assert!(!config.admits(&TreeEntry::blob("README.md", 1)));
    }

    #[test]
    fn names_match_basename_only() {
        let config = FindConfig::from_options(FindOptions {
            name: vec!["^b".to_string()],
            no_name: vec!["_test".to_string()],
            ..options()
        })
        .unwrap();
        assert!(config.admits(&TreeEntry::blob("src/vendor/b.go", 1)));
        assert!(!config.admits(&TreeEntry::blob("b/a.go", 1)));
        assert!(!config.admits(&TreeEntry::blob("src/b_test.go", 1)));
    }
}
