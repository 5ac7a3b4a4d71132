//! Notification subscription listing and toggling.

mod error;

pub use error::WatchError;

use crate::config::{ConfigError, RepoOptions};
use crate::discovery::RepoFilter;
use crate::github::{ApiError, Repository, Subscription, SubscriptionApi};
use std::fmt;
use std::io::Write;
use tracing::{debug, info_span, Instrument};

/// What to do with each repository's subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatchAction {
    /// Only print the status.
    #[default]
    List,
    /// Subscribe where not subscribed.
    Watch,
    /// Delete existing subscriptions.
    Unwatch,
}

/// Raw watch flags.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Repository selection.
    pub repos: RepoOptions,
    /// Subscribe to notifications.
    pub watch: bool,
    /// Unsubscribe from notifications.
    pub unwatch: bool,
}

/// Validated watch configuration.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Repository selection.
    pub filter: RepoFilter,
    /// What to do with each subscription.
    pub action: WatchAction,
}

impl WatchConfig {
    /// Validates raw options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WatchConflict`] when both actions are requested,
    /// or any repository selection error.
    pub fn from_options(options: WatchOptions) -> Result<Self, ConfigError> {
        let filter = options.repos.to_filter()?;
        let action = match (options.watch, options.unwatch) {
            (true, true) => return Err(ConfigError::WatchConflict),
            (true, false) => WatchAction::Watch,
            (false, true) => WatchAction::Unwatch,
            (false, false) => WatchAction::List,
        };
        Ok(Self { filter, action })
    }
}

/// Subscription state as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    Watching,
    Ignoring,
    NotWatching,
}

impl From<Option<&Subscription>> for WatchStatus {
    fn from(subscription: Option<&Subscription>) -> Self {
        match subscription {
            None => Self::NotWatching,
            Some(sub) if sub.ignored => Self::Ignoring,
            Some(_) => Self::Watching,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Watching => "watching",
            Self::Ignoring => "ignoring",
            Self::NotWatching => "not watching",
        })
    }
}

/// Prints `<owner/repo> <status>[ -> <new status>]` for each repository,
/// applying `action` on the way.
///
/// # Errors
///
/// Returns [`WatchError`] on the first failed call; the current line is
/// terminated first.
pub async fn watch_repositories<A, W>(
    api: &A,
    repos: &[Repository],
    action: WatchAction,
    out: &mut W,
) -> Result<(), WatchError>
where
    A: SubscriptionApi + ?Sized,
    W: Write,
{
    for repo in repos {
        let span = info_span!("watch", repo = %repo.full_name, ?action);
        let result = update_subscription(api, repo, action, out)
            .instrument(span)
            .await;
        writeln!(out)?;
        result?;
    }

    Ok(())
}

async fn update_subscription<A, W>(
    api: &A,
    repo: &Repository,
    action: WatchAction,
    out: &mut W,
) -> Result<(), WatchError>
where
    A: SubscriptionApi + ?Sized,
    W: Write,
{
    let api_error = |source: ApiError| WatchError::Api {
        repo: repo.full_name.clone(),
        source,
    };

    write!(out, "{}", repo.full_name)?;

    let current = api.subscription(repo).await.map_err(api_error)?;
    write!(out, " {}", WatchStatus::from(current.as_ref()))?;

    let subscribed = current.is_some_and(|sub| sub.subscribed);
    let updated = match action {
        WatchAction::Watch if !subscribed => Some(api.watch(repo).await.map_err(api_error)?),
        WatchAction::Unwatch if subscribed => {
            api.unwatch(repo).await.map_err(api_error)?;
            None
        }
        _ => return Ok(()),
    };

    debug!("Subscription changed");
    write!(out, " -> {}", WatchStatus::from(updated.as_ref()))?;
    Ok(())
}
