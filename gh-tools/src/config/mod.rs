//! Option validation and token resolution.
//!
//! Everything here runs before the first network call: a [`ConfigError`]
//! means nothing was attempted.

mod auth;
mod error;
mod selection;
mod target;

pub use auth::{auth_file_path, resolve_token, token_from_file, GITHUB_TOKEN_ENV, TOKEN_ENV};
pub use error::ConfigError;
pub use selection::RepoOptions;
pub use target::Target;

use regex::Regex;

/// Compiles one pattern, naming the flag it came from on failure.
pub(crate) fn compile_pattern(flag: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        flag,
        pattern: pattern.to_string(),
        source,
    })
}

/// Compiles a pattern matched against raw file contents.
pub(crate) fn compile_bytes_pattern(
    flag: &'static str,
    pattern: &str,
) -> Result<regex::bytes::Regex, ConfigError> {
    regex::bytes::Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        flag,
        pattern: pattern.to_string(),
        source,
    })
}
