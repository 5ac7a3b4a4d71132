//! The `owner[/repo]` positional argument.

use super::ConfigError;

/// Owner and optional repository taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// User or organization login.
    pub owner: String,

    /// Repository name, selects single-repo mode.
    pub repo: Option<String>,
}

impl Target {
    /// Parses `owner` or `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] for more than one slash and
    /// [`ConfigError::OwnerRequired`] for an empty owner.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut parts = input.split('/');
        let owner = parts.next().unwrap_or_default().to_string();
        let repo = parts.next().map(str::to_string);
        if parts.next().is_some() {
            return Err(ConfigError::InvalidTarget(input.to_string()));
        }
        if owner.is_empty() {
            return Err(ConfigError::OwnerRequired);
        }

        Ok(Self {
            owner,
            repo: repo.filter(|name| !name.is_empty()),
        })
    }
}
