#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod artifacts;
pub mod config;
pub mod discovery;
pub mod find;
pub mod github;
pub mod pull_requests;
pub mod rate_limit;
pub mod runner;
pub mod size;
pub mod summary;
pub mod watch;

pub use artifacts::{purge_artifacts, ArtifactConfig, ArtifactError, ArtifactOptions, PurgeTotals};
pub use config::{resolve_token, ConfigError, RepoOptions, Target};
pub use discovery::{DiscoveryError, RepoFilter, RepoFinder};
pub use find::{FindConfig, FindError, FindMatch, FindOptions, MatchBudget, TreeWalker};
pub use github::{
    ApiError, ArtifactApi, GitHubApi, OctocrabClient, PullRequestApi, Repository, SubscriptionApi,
};
pub use pull_requests::{
    ApplyOutcome, ChangeApplier, GitScript, PrConfig, PrError, PrMaker, PrOptions, PrStatus,
};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use size::SizeError;
pub use summary::RunSummary;
pub use watch::{watch_repositories, WatchAction, WatchConfig, WatchError, WatchOptions, WatchStatus};
