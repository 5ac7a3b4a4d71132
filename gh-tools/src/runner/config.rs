//! Runner configuration.

/// Configuration shared by every tool run.
#[derive(Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls, clones and pushes.
    token: String,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("token", &"***")
            .finish()
    }
}
