//! File hierarchy search across repositories.
//!
//! [`TreeWalker`] fetches the recursive tree of each repository and runs
//! every entry through the predicates of a [`FindConfig`], cheapest first:
//! budgets, depth, type, size, paths, names, then the content patterns
//! which need a download. Results are written to the output sink as they
//! are found.

mod budget;
mod config;
mod error;
mod grep;
mod output;
mod patterns;
mod size_predicate;

pub use budget::MatchBudget;
pub use config::{EntryType, FindConfig, FindOptions};
pub use error::FindError;
pub use grep::{grep, GrepMatch, GrepResults, BINARY_PEEK};
pub use output::{FindMatch, DETAIL_DATE_FORMAT};
pub use patterns::PatternList;
pub use size_predicate::{SizeOp, SizePredicate};

use crate::github::{GitHubApi, Repository, TreeEntry};
use regex::bytes::Regex;
use std::io::Write;
use tracing::{debug, info_span, Instrument};

/// Number of path components, `1 + count of '/'`.
pub fn depth(path: &str) -> usize {
    path.bytes().filter(|&b| b == b'/').count() + 1
}

/// Walks repository trees and reports matching entries.
#[derive(Debug)]
pub struct TreeWalker<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    config: &'a FindConfig,
}

impl<'a, A: GitHubApi + ?Sized> TreeWalker<'a, A> {
    /// Creates a walker.
    pub fn new(api: &'a A, config: &'a FindConfig) -> Self {
        Self { api, config }
    }

    /// Walks `repos` in order, writing one line per result to `out` and
    /// warnings to `diag`.
    ///
    /// `budget` carries the global counter across repositories and is left
    /// in its post-walk state. Repositories whose branch doesn't exist or
    /// which are empty are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FindError`] on the first API, scan or write failure.
    pub async fn walk<W, D>(
        &self,
        repos: &[Repository],
        budget: &mut MatchBudget,
        out: &mut W,
        diag: &mut D,
    ) -> Result<(), FindError>
    where
        W: Write,
        D: Write,
    {
        for repo in repos {
            if budget.global_exhausted() {
                debug!(matched = budget.matched(), "Result limit reached");
                break;
            }

            budget.start_repository();
            let span = info_span!("walk_repository", repo = %repo.full_name);
            self.walk_repository(repo, budget, out, diag)
                .instrument(span)
                .await?;

            if self.config.no_matches && budget.repo_matched() == 0 {
                writeln!(
                    out,
                    "{}",
                    FindMatch::NoMatches {
                        repo: &repo.full_name
                    }
                )?;
            }
        }

        Ok(())
    }

    async fn walk_repository<W, D>(
        &self,
        repo: &Repository,
        budget: &mut MatchBudget,
        out: &mut W,
        diag: &mut D,
    ) -> Result<(), FindError>
    where
        W: Write,
        D: Write,
    {
        let branch = self
            .config
            .branch
            .as_deref()
            .unwrap_or(&repo.default_branch);

        let tree = match self.api.get_tree(repo, branch).await {
            Ok(tree) => tree,
            Err(e) if e.is_missing_ref_or_empty() => {
                debug!(branch, error = %e, "Skipping repository");
                return Ok(());
            }
            Err(source) => {
                return Err(FindError::Tree {
                    repo: repo.full_name.clone(),
                    source,
                })
            }
        };
        debug!(branch, entries = tree.entries.len(), "Read tree");

        if tree.truncated {
            writeln!(diag, "WARNING: results were truncated for {}", repo.full_name)?;
        }

        for entry in &tree.entries {
            if budget.global_exhausted() || budget.repository_exhausted() {
                break;
            }
            if !self.config.admits(entry) {
                continue;
            }
            self.visit(repo, branch, entry, budget, out).await?;
        }

        Ok(())
    }

    /// Runs the content predicates and emits the entry's results.
    async fn visit<W: Write>(
        &self,
        repo: &Repository,
        branch: &str,
        entry: &TreeEntry,
        budget: &mut MatchBudget,
        out: &mut W,
    ) -> Result<(), FindError> {
        let mut contents = None;

        if let Some(pattern) = &self.config.no_grep {
            if entry.is_blob() {
                let results = self.scan(repo, entry, &mut contents, pattern, 1).await?;
                if !results.matches.is_empty() {
                    return Ok(());
                }
            }
        }

        if let Some(pattern) = &self.config.grep {
            if entry.is_blob() {
                let results = self
                    .scan(repo, entry, &mut contents, pattern, budget.grep_limit())
                    .await?;
                if results.matches.is_empty() {
                    return Ok(());
                }

                budget.record_match();
                if !self.config.no_matches {
                    for found in &results.matches {
                        let line = FindMatch::Grep {
                            repo: &repo.full_name,
                            path: &entry.path,
                            line_number: found.line_number,
                            line: &found.line,
                        };
                        writeln!(out, "{line}")?;
                    }
                }
                return Ok(());
            }
        }

        budget.record_match();
        if self.config.no_matches {
            return Ok(());
        }

        if !self.config.list_details {
            let line = FindMatch::Entry {
                repo: &repo.full_name,
                path: &entry.path,
            };
            writeln!(out, "{line}")?;
            return Ok(());
        }

        let commit = self
            .api
            .last_commit(repo, branch, &entry.path)
            .await
            .map_err(|source| FindError::Commit {
                repo: repo.full_name.clone(),
                path: entry.path.clone(),
                source,
            })?;
        let line = FindMatch::Detail {
            repo: &repo.full_name,
            kind: entry.kind,
            author: commit.as_ref().and_then(|c| c.author_login.as_deref()),
            size: entry.size.unwrap_or(0),
            date: commit.as_ref().and_then(|c| c.date),
            path: &entry.path,
        };
        writeln!(out, "{line}")?;

        Ok(())
    }

    /// Greps an entry, downloading its contents on first use.
    async fn scan(
        &self,
        repo: &Repository,
        entry: &TreeEntry,
        contents: &mut Option<Vec<u8>>,
        pattern: &Regex,
        limit: usize,
    ) -> Result<GrepResults, FindError> {
        if contents.is_none() {
            let blob = self
                .api
                .get_blob(repo, entry)
                .await
                .map_err(|source| FindError::Contents {
                    repo: repo.full_name.clone(),
                    path: entry.path.clone(),
                    source,
                })?;
            *contents = Some(blob);
        }

        let results = grep(contents.as_deref().unwrap_or_default(), pattern, limit).map_err(
            |source| FindError::Scan {
                repo: repo.full_name.clone(),
                path: entry.path.clone(),
                source,
            },
        )?;
        if results.is_binary {
            debug!(path = %entry.path, "Skipping binary contents");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoOptions;
    use crate::github::{CommitInfo, FakeGitHub};
    use chrono::{TimeZone, Utc};

    fn config(options: FindOptions) -> FindConfig {
        FindConfig::from_options(FindOptions {
            repos: RepoOptions::new("acme"),
            ..options
        })
        .unwrap()
    }

    fn sample_tree() -> Vec<TreeEntry> {
        vec![
            TreeEntry::blob("README.md", 120),
            TreeEntry::tree("src"),
            TreeEntry::blob("src/a.go", 2048),
            TreeEntry::tree("src/vendor"),
            TreeEntry::blob("src/vendor/b.go", 4096),
        ]
    }

    struct Run {
        out: String,
        diag: String,
        budget: MatchBudget,
        result: Result<(), FindError>,
    }

    async fn run(fake: &FakeGitHub, repos: &[Repository], config: &FindConfig) -> Run {
        let mut budget = config.budget();
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let result = TreeWalker::new(fake, config)
            .walk(repos, &mut budget, &mut out, &mut diag)
            .await;
        Run {
            out: String::from_utf8(out).unwrap(),
            diag: String::from_utf8(diag).unwrap(),
            budget,
            result,
        }
    }

    #[test]
    fn depth_counts_separators() {
        assert_eq!(depth("a"), 1);
        assert_eq!(depth("a/b"), 2);
        assert_eq!(depth(""), 1);
        assert_eq!(depth("/"), 2);
        assert_eq!(depth("a//b"), 3);
    }

    #[tokio::test]
    async fn finds_readme_by_name() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new().with_tree("acme/widgets", sample_tree());
        let config = config(FindOptions {
            name: vec!["^README".to_string()],
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/widgets README.md\n");
        assert_eq!(run.budget.matched(), 1);
    }

    #[tokio::test]
    async fn lists_every_entry_without_predicates() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new().with_tree("acme/widgets", sample_tree());

        let run = run(&fake, &[repo], &config(FindOptions::default())).await;

        run.result.unwrap();
        assert_eq!(run.out.lines().count(), 5);
        assert_eq!(run.budget.matched(), 5);
    }

    #[tokio::test]
    async fn no_matches_lists_only_repositories_without_hits() {
        let repos = [
            Repository::new("acme", "has-readme"),
            Repository::new("acme", "no-readme"),
        ];
        let fake = FakeGitHub::new()
            .with_tree("acme/has-readme", sample_tree())
            .with_tree("acme/no-readme", vec![TreeEntry::blob("main.go", 10)]);
        let config = config(FindOptions {
            name: vec!["^README".to_string()],
            no_matches: true,
            ..FindOptions::default()
        });

        let run = run(&fake, &repos, &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/no-readme\n");
    }

    #[tokio::test]
    async fn no_matches_reports_skipped_repositories() {
        let repos = [
            Repository::new("acme", "empty"),
            Repository::new("acme", "missing-branch"),
        ];
        let fake = FakeGitHub::new()
            .with_tree_status("acme/empty", 409)
            .with_tree_status("acme/missing-branch", 404);
        let config = config(FindOptions {
            no_matches: true,
            ..FindOptions::default()
        });

        let run = run(&fake, &repos, &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/empty\nacme/missing-branch\n");
    }

    #[tokio::test]
    async fn skips_empty_and_missing_branches() {
        let repos = [
            Repository::new("acme", "empty"),
            Repository::new("acme", "widgets"),
        ];
        let fake = FakeGitHub::new()
            .with_tree_status("acme/empty", 409)
            .with_tree("acme/widgets", vec![TreeEntry::blob("main.go", 10)]);

        let run = run(&fake, &repos, &config(FindOptions::default())).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/widgets main.go\n");
    }

    #[tokio::test]
    async fn other_tree_errors_abort_and_keep_output() {
        let repos = [
            Repository::new("acme", "first"),
            Repository::new("acme", "broken"),
            Repository::new("acme", "never"),
        ];
        let fake = FakeGitHub::new()
            .with_tree("acme/first", vec![TreeEntry::blob("a", 1)])
            .with_tree_status("acme/broken", 500)
            .with_tree("acme/never", vec![TreeEntry::blob("b", 1)]);

        let run = run(&fake, &repos, &config(FindOptions::default())).await;

        assert!(matches!(run.result, Err(FindError::Tree { .. })));
        assert_eq!(run.out, "acme/first a\n");
        assert_eq!(fake.count_calls("tree acme/never"), 0);
    }

    #[tokio::test]
    async fn warns_about_truncated_trees() {
        let repo = Repository::new("acme", "huge");
        let fake =
            FakeGitHub::new().with_truncated_tree("acme/huge", vec![TreeEntry::blob("a", 1)]);

        let run = run(&fake, &[repo], &config(FindOptions::default())).await;

        run.result.unwrap();
        assert_eq!(run.diag, "WARNING: results were truncated for acme/huge\n");
        assert_eq!(run.out, "acme/huge a\n");
    }

    #[tokio::test]
    async fn global_limit_stops_the_whole_walk() {
        let repos = [
            Repository::new("acme", "one"),
            Repository::new("acme", "two"),
        ];
        let fake = FakeGitHub::new()
            .with_tree("acme/one", sample_tree())
            .with_tree("acme/two", sample_tree());
        let config = config(FindOptions {
            max_results: 2,
            ..FindOptions::default()
        });

        let run = run(&fake, &repos, &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/one README.md\nacme/one src\n");
        assert!(run.budget.global_exhausted());
        assert_eq!(fake.count_calls("tree acme/two"), 0);
    }

    #[tokio::test]
    async fn repository_limit_moves_to_next_repository() {
        let repos = [
            Repository::new("acme", "one"),
            Repository::new("acme", "two"),
        ];
        let fake = FakeGitHub::new()
            .with_tree("acme/one", sample_tree())
            .with_tree("acme/two", sample_tree());
        let config = config(FindOptions {
            max_repo_results: 1,
            entry_type: Some("f".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &repos, &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/one README.md\nacme/two README.md\n");
        assert_eq!(run.budget.matched(), 2);
    }

    #[tokio::test]
    async fn grep_emits_lines_and_counts_files() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree(
                "acme/widgets",
                vec![
                    TreeEntry::blob("a.txt", 10),
                    TreeEntry::blob("b.txt", 10),
                    TreeEntry::blob("c.txt", 10),
                ],
            )
            .with_blob("acme/widgets", "a.txt", "TODO one\nok\nTODO two\n")
            .with_blob("acme/widgets", "b.txt", "nothing here\n")
            .with_blob("acme/widgets", "c.txt", "TODO three\n");
        let config = config(FindOptions {
            grep: Some("TODO".to_string()),
            max_results: 1,
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(
            run.out,
            "acme/widgets a.txt 1 TODO one\nacme/widgets a.txt 3 TODO two\n"
        );
        assert_eq!(run.budget.matched(), 1);
        assert_eq!(fake.count_calls("blob"), 1);
    }

    #[tokio::test]
    async fn grep_limit_applies_per_file() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree(
                "acme/widgets",
                vec![TreeEntry::blob("a.txt", 10), TreeEntry::blob("b.txt", 10)],
            )
            .with_blob("acme/widgets", "a.txt", "x\nx\nx\n")
            .with_blob("acme/widgets", "b.txt", "x\nx\n");
        let config = config(FindOptions {
            grep: Some("x".to_string()),
            max_grep_results: 1,
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(
            run.out,
            "acme/widgets a.txt 1 x\nacme/widgets b.txt 1 x\n"
        );
        assert_eq!(run.budget.matched(), 2);
    }

    #[tokio::test]
    async fn grep_skips_binary_files() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree("acme/widgets", vec![TreeEntry::blob("logo.png", 10)])
            .with_blob("acme/widgets", "logo.png", b"PNG\0TODO\n".to_vec());
        let config = config(FindOptions {
            grep: Some("TODO".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert!(run.out.is_empty());
        assert_eq!(run.budget.matched(), 0);
    }

    #[tokio::test]
    async fn no_grep_rejects_matching_contents() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree(
                "acme/widgets",
                vec![TreeEntry::blob("a.go", 10), TreeEntry::blob("b.go", 10)],
            )
            .with_blob("acme/widgets", "a.go", "// Code generated by tool. DO NOT EDIT.\n")
            .with_blob("acme/widgets", "b.go", "package b\n");
        let config = config(FindOptions {
            no_grep: Some("DO NOT EDIT".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/widgets b.go\n");
    }

    #[tokio::test]
    async fn no_grep_is_applied_before_grep() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree(
                "acme/widgets",
                vec![TreeEntry::blob("a.go", 10), TreeEntry::blob("b.go", 10)],
            )
            .with_blob(
                "acme/widgets",
                "a.go",
                "// Code generated by tool. DO NOT EDIT.\nfunc A() {}\n",
            )
            .with_blob("acme/widgets", "b.go", "func B() {}\n");
        let config = config(FindOptions {
            grep: Some("^func".to_string()),
            no_grep: Some("DO NOT EDIT".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/widgets b.go 1 func B() {}\n");
        assert_eq!(run.budget.matched(), 1);
    }

    #[tokio::test]
    async fn content_is_downloaded_once_for_both_patterns() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree("acme/widgets", vec![TreeEntry::blob("a.go", 10)])
            .with_blob("acme/widgets", "a.go", "package a\nfunc A() {}\n");
        let config = config(FindOptions {
            grep: Some("^func".to_string()),
            no_grep: Some("DO NOT EDIT".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(run.out, "acme/widgets a.go 2 func A() {}\n");
        assert_eq!(fake.count_calls("blob"), 1);
    }

    #[tokio::test]
    async fn missing_contents_abort() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new().with_tree("acme/widgets", vec![TreeEntry::blob("a", 1)]);
        let config = config(FindOptions {
            grep: Some("x".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        assert!(matches!(run.result, Err(FindError::Contents { .. })));
    }

    #[tokio::test]
    async fn lists_details() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new()
            .with_tree(
                "acme/widgets",
                vec![TreeEntry::blob("README.md", 120), TreeEntry::tree("docs")],
            )
            .with_commit(
                "acme/widgets",
                "README.md",
                CommitInfo {
                    author_login: Some("octocat".to_string()),
                    date: Some(Utc.with_ymd_and_hms(2021, 3, 9, 8, 7, 6).unwrap()),
                },
            );
        let config = config(FindOptions {
            list_details: true,
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(
            run.out,
            "acme/widgets f octocat 120 Mar 9 08:07:06 2021 README.md\n\
             acme/widgets d - 0 - docs\n"
        );
        assert_eq!(fake.count_calls("commit acme/widgets main"), 2);
    }

    #[tokio::test]
    async fn walks_branch_override() {
        let repo = Repository::new("acme", "widgets");
        let fake = FakeGitHub::new().with_tree("acme/widgets", vec![TreeEntry::blob("a", 1)]);
        let config = config(FindOptions {
            branch: Some("develop".to_string()),
            ..FindOptions::default()
        });

        let run = run(&fake, &[repo], &config).await;

        run.result.unwrap();
        assert_eq!(fake.calls(), ["tree acme/widgets develop"]);
    }
}
