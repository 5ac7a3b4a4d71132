//! Configuration error types.

use thiserror::Error;

/// Errors detected while validating options, before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No owner was given.
    #[error("owner is required")]
    OwnerRequired,

    /// The target is not in `owner[/repo]` form.
    #[error("invalid owner or repository name {0}")]
    InvalidTarget(String),

    /// Both visibilities were excluded.
    #[error("no-private and no-public are mutually exclusive")]
    VisibilityConflict,

    /// A pattern failed to compile.
    #[error("invalid {flag} pattern: {pattern}: {source}")]
    Pattern {
        flag: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The entry type is neither `f` nor `d`.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// A depth or limit is negative.
    #[error("{0} should be positive")]
    Negative(&'static str),

    /// The minimum depth exceeds the maximum depth.
    #[error("min-depth should be less than max-depth")]
    DepthRange,

    /// The size predicate can't be parsed.
    #[error("invalid size {0}")]
    InvalidSize(String),

    /// `--watch` and `--unwatch` were both given.
    #[error("watch and unwatch are mutually exclusive")]
    WatchConflict,

    /// A required option is missing.
    #[error("{0} is required")]
    Required(&'static str),

    /// The branch name is not a valid git reference name.
    #[error("invalid branch name {branch}: {message}")]
    InvalidBranch { branch: String, message: String },

    /// Neither a title nor a commit message was given.
    #[error("either title or commit-message must be provided")]
    TitleRequired,

    /// Failed to read a file.
    #[error("can't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("can't parse {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// No access token could be found.
    #[error("access token is required")]
    TokenRequired,
}
