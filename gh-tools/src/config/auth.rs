//! Access token resolution.

use super::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tool specific token variable, checked first.
pub const TOKEN_ENV: &str = "GHTOOLS_TOKEN";

/// Generic token variable.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Deserialize)]
struct AuthFile {
    oauth_token: Option<String>,
}

/// Location of the auth file, `~/.config/gh-tools/auth.toml`.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("gh-tools").join("auth.toml"))
}

/// Resolves the access token.
///
/// An explicit token wins, then [`TOKEN_ENV`], then [`GITHUB_TOKEN_ENV`],
/// then the `oauth_token` key of the auth file.
///
/// # Errors
///
/// Returns [`ConfigError::TokenRequired`] when no source yields a token, or
/// a read/parse error if the auth file exists but is unusable.
pub fn resolve_token(explicit: Option<&str>) -> Result<String, ConfigError> {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    for var in [TOKEN_ENV, GITHUB_TOKEN_ENV] {
        if let Some(token) = std::env::var(var).ok().filter(|t| !t.is_empty()) {
            debug!(source = var, "Using token from environment");
            return Ok(token);
        }
    }

    if let Some(path) = auth_file_path() {
        if let Some(token) = token_from_file(&path)? {
            debug!(path = %path.display(), "Using token from auth file");
            return Ok(token);
        }
    }

    Err(ConfigError::TokenRequired)
}

/// Reads `oauth_token` from an auth file. A missing file yields `None`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Toml`] if the file exists
/// but can't be read or parsed.
pub fn token_from_file(path: &Path) -> Result<Option<String>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let auth: AuthFile = toml::from_str(&contents).map_err(|e| ConfigError::Toml {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(auth.oauth_token.filter(|t| !t.is_empty()))
}
