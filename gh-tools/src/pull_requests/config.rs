//! Validated configuration of a pull request run.

use crate::config::{ConfigError, RepoOptions};
use crate::discovery::RepoFilter;
use bstr::ByteSlice;
use std::path::PathBuf;

/// Shell used when none is given.
pub const DEFAULT_SHELL: &str = "bash";

/// Raw pull request flags.
#[derive(Debug, Clone, Default)]
pub struct PrOptions {
    /// Repository selection. Archived repositories are never included.
    pub repos: RepoOptions,
    /// Branch holding the changes.
    pub branch: String,
    /// Shell that runs the script.
    pub shell: String,
    /// Inline script.
    pub script: Option<String>,
    /// File to read the script from when no inline script is given.
    pub script_file: Option<PathBuf>,
    /// Pull request title.
    pub title: Option<String>,
    /// Commit message, defaults to the title and description.
    pub commit_message: Option<String>,
    /// Pull request body.
    pub description: Option<String>,
    /// Logins to request reviews from.
    pub reviewers: Vec<String>,
    /// Logins to assign.
    pub assignees: Vec<String>,
    /// Update existing pull requests instead of opening new ones.
    pub patch: bool,
}

/// Validated pull request configuration.
#[derive(Debug, Clone)]
pub struct PrConfig {
    /// Repository selection, archived repositories excluded.
    pub filter: RepoFilter,
    /// Validated branch name.
    pub branch: String,
    /// Shell that runs the script.
    pub shell: String,
    /// Script contents, inline or read from the script file.
    pub script: String,
    /// Pull request title, empty only in patch mode without a title.
    pub title: String,
    /// Message of the pushed commit.
    pub commit_message: String,
    /// Pull request body, possibly empty.
    pub description: String,
    /// Normalized reviewer logins.
    pub reviewers: Vec<String>,
    /// Normalized assignee logins.
    pub assignees: Vec<String>,
    /// Update existing pull requests instead of opening new ones.
    pub patch: bool,
    /// Whether a title was given explicitly.
    title_given: bool,
}

impl PrConfig {
    /// Validates raw options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing or invalid branch, a missing
    /// shell or script, an unreadable script file, neither title nor commit
    /// message, or any repository selection error.
    pub fn from_options(options: PrOptions) -> Result<Self, ConfigError> {
        let mut filter = options.repos.to_filter()?;
        filter.archived = false;

        if options.branch.is_empty() {
            return Err(ConfigError::Required("branch"));
        }
        validate_branch(&options.branch)?;

        if options.shell.is_empty() {
            return Err(ConfigError::Required("shell"));
        }

        let mut script = options.script.unwrap_or_default();
        if script.is_empty() {
            if let Some(path) = &options.script_file {
                script = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }
        if script.is_empty() {
            return Err(ConfigError::Required("script"));
        }

        let title = options.title.unwrap_or_default();
        let commit_message = options.commit_message.unwrap_or_default();
        let description = options.description.unwrap_or_default();
        if title.is_empty() && commit_message.is_empty() {
            return Err(ConfigError::TitleRequired);
        }

        let commit_message = if commit_message.is_empty() {
            default_commit_message(&title, &description)
        } else {
            commit_message
        };
        let title_given = !title.is_empty();
        let title = if title_given {
            title
        } else {
            commit_message.lines().next().unwrap_or_default().to_string()
        };

        Ok(Self {
            filter,
            branch: options.branch,
            shell: options.shell,
            script,
            title,
            commit_message,
            description,
            reviewers: normalize_logins(&options.reviewers),
            assignees: normalize_logins(&options.assignees),
            patch: options.patch,
            title_given,
        })
    }

    /// Title to set when patching an existing pull request.
    pub(crate) fn title_update(&self) -> Option<&str> {
        self.title_given.then_some(self.title.as_str())
    }

    /// Body to set when patching an existing pull request.
    pub(crate) fn description_update(&self) -> Option<&str> {
        (!self.description.is_empty()).then_some(self.description.as_str())
    }
}

fn validate_branch(branch: &str) -> Result<(), ConfigError> {
    gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidBranch {
            branch: branch.to_string(),
            message: e.to_string(),
        })
}

fn default_commit_message(title: &str, description: &str) -> String {
    if description.is_empty() {
        title.to_string()
    } else {
        format!("{title}\n\n{description}")
    }
}

/// Trims, lower-cases and de-duplicates logins, keeping first occurrences.
pub(crate) fn normalize_logins(logins: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(logins.len());
    for login in logins {
        let login = login.trim().to_lowercase();
        if !login.is_empty() && !unique.contains(&login) {
            unique.push(login);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options() -> PrOptions {
        PrOptions {
            repos: RepoOptions::new("acme"),
            branch: "chore/bump".to_string(),
            shell: DEFAULT_SHELL.to_string(),
            script: Some("touch x".to_string()),
            title: Some("Bump deps".to_string()),
            ..PrOptions::default()
        }
    }

    #[test]
    fn requires_branch() {
        let err = PrConfig::from_options(PrOptions {
            branch: String::new(),
            ..options()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "branch is required");
    }

    #[test]
    fn rejects_invalid_branch() {
        let err = PrConfig::from_options(PrOptions {
            branch: "bad..name".to_string(),
            ..options()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBranch { .. }));
    }

    #[test]
    fn requires_shell_and_script() {
        let err = PrConfig::from_options(PrOptions {
            shell: String::new(),
            ..options()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "shell is required");

        let err = PrConfig::from_options(PrOptions {
            script: None,
            ..options()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "script is required");
    }

    #[test]
    fn reads_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "echo hi > greeting").unwrap();

        let config = PrConfig::from_options(PrOptions {
            script: None,
            script_file: Some(file.path().to_path_buf()),
            ..options()
        })
        .unwrap();
        assert_eq!(config.script, "echo hi > greeting");
    }

    #[test]
    fn reports_unreadable_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PrConfig::from_options(PrOptions {
            script: None,
            script_file: Some(dir.path().join("missing.sh")),
            ..options()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn requires_title_or_commit_message() {
        let err = PrConfig::from_options(PrOptions {
            title: None,
            ..options()
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "either title or commit-message must be provided"
        );
    }

    #[test]
    fn builds_commit_message_from_title_and_description() {
        let config = PrConfig::from_options(PrOptions {
            description: Some("Routine update.".to_string()),
            ..options()
        })
        .unwrap();
        assert_eq!(config.commit_message, "Bump deps\n\nRoutine update.");
        assert_eq!(config.title_update(), Some("Bump deps"));
    }

    #[test]
    fn takes_title_from_commit_message() {
        let config = PrConfig::from_options(PrOptions {
            title: None,
            commit_message: Some("Bump deps\n\nDetails".to_string()),
            ..options()
        })
        .unwrap();
        assert_eq!(config.title, "Bump deps");
        assert_eq!(config.title_update(), None);
    }

    #[test]
    fn never_includes_archived_repositories() {
        let mut repos = RepoOptions::new("acme");
        repos.archived = true;
        let config = PrConfig::from_options(PrOptions {
            repos,
            ..options()
        })
        .unwrap();
        assert!(!config.filter.archived);
    }

    #[test]
    fn normalizes_logins() {
        let logins = vec![
            " Alice ".to_string(),
            "bob".to_string(),
            "ALICE".to_string(),
            String::new(),
        ];
        assert_eq!(normalize_logins(&logins), vec!["alice", "bob"]);
    }
}
