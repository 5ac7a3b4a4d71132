//! CLI for gh-tools.
//!
//! One subcommand per tool. Results are written to stdout, warnings and
//! logs to stderr.

use clap::{Args, Parser, Subcommand};
use gh_tools::{
    resolve_token, ArtifactConfig, ArtifactOptions, FindConfig, FindOptions, PrConfig, PrOptions,
    RepoOptions, Runner, RunnerConfig, RunnerError, WatchConfig, WatchOptions,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Walk, search and mutate the GitHub repositories of a user or an organization.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GitHub access token. Falls back to GITHUB_TOKEN and ~/.config/gh-tools/auth.toml.
    #[arg(long, global = true, env = "GHTOOLS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find files and directories across repositories.
    Find(FindArgs),
    /// List or change notification subscriptions.
    Watch(WatchArgs),
    /// Purge GitHub Actions artifacts.
    PurgeArtifacts(PurgeArgs),
    /// Apply a script to repositories and open pull requests.
    Pr(PrArgs),
}

/// Repository selection shared by every tool.
#[derive(Args, Debug)]
struct RepoArgs {
    /// Repository owner (user or organization), optionally followed by /repo.
    #[arg(value_name = "OWNER[/REPO]")]
    target: String,

    /// The pattern to match repository names.
    #[arg(long)]
    repo: Option<String>,

    /// The pattern to reject repository names.
    #[arg(long)]
    no_repo: Option<String>,
}

#[derive(Args, Debug)]
struct VisibilityArgs {
    /// Don't include private repositories.
    #[arg(long)]
    no_private: bool,

    /// Don't include public repositories.
    #[arg(long)]
    no_public: bool,

    /// Don't include fork repositories.
    #[arg(long)]
    no_fork: bool,
}

impl RepoArgs {
    fn into_options(self, visibility: Option<VisibilityArgs>) -> RepoOptions {
        let mut options = RepoOptions::new(self.target);
        options.repo = self.repo;
        options.no_repo = self.no_repo;
        if let Some(visibility) = visibility {
            options.no_private = visibility.no_private;
            options.no_public = visibility.no_public;
            options.no_fork = visibility.no_fork;
        }
        options
    }
}

#[derive(Args, Debug)]
struct FindArgs {
    #[command(flatten)]
    repos: RepoArgs,

    #[command(flatten)]
    visibility: VisibilityArgs,

    /// Include archived repositories.
    #[arg(long)]
    archived: bool,

    /// The branch name if different from the default.
    #[arg(long)]
    branch: Option<String>,

    /// Entry type: f for files, d for directories.
    #[arg(long = "type", value_name = "TYPE")]
    entry_type: Option<String>,

    /// Descend at least n directory levels.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_depth: i64,

    /// Descend at most n directory levels.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_depth: i64,

    /// Limit the number of matched entries.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_results: i64,

    /// Limit the number of matched entries per repository.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_repo_results: i64,

    /// Limit the number of grep results per file.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_grep_results: i64,

    /// The pattern to match the last component of the pathname. Repeatable.
    #[arg(long)]
    name: Vec<String>,

    /// The pattern to reject the last component of the pathname. Repeatable.
    #[arg(long)]
    no_name: Vec<String>,

    /// The pattern to match the pathname. Repeatable.
    #[arg(long)]
    path: Vec<String>,

    /// The pattern to reject the pathname. Repeatable.
    #[arg(long)]
    no_path: Vec<String>,

    /// The pattern to match the file contents.
    #[arg(long)]
    grep: Option<String>,

    /// The pattern to reject the file contents.
    #[arg(long)]
    no_grep: Option<String>,

    /// Limit results by file size: [+-]<n><unit>.
    #[arg(long, allow_hyphen_values = true)]
    size: Option<String>,

    /// List repositories with no matches.
    #[arg(long)]
    no_matches: bool,

    /// List details: type, author, size and last commit date.
    #[arg(long)]
    list_details: bool,
}

impl FindArgs {
    fn into_options(self) -> FindOptions {
        let mut repos = self.repos.into_options(Some(self.visibility));
        repos.archived = self.archived;
        FindOptions {
            repos,
            branch: self.branch,
            entry_type: self.entry_type,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            max_results: self.max_results,
            max_repo_results: self.max_repo_results,
            max_grep_results: self.max_grep_results,
            name: self.name,
            no_name: self.no_name,
            path: self.path,
            no_path: self.no_path,
            grep: self.grep,
            no_grep: self.no_grep,
            size: self.size,
            no_matches: self.no_matches,
            list_details: self.list_details,
        }
    }
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[command(flatten)]
    repos: RepoArgs,

    /// Subscribe to repository notifications.
    #[arg(long)]
    watch: bool,

    /// Unsubscribe from repository notifications.
    #[arg(long)]
    unwatch: bool,
}

#[derive(Args, Debug)]
struct PurgeArgs {
    #[command(flatten)]
    repos: RepoArgs,

    /// Count artifacts without deleting them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct PrArgs {
    #[command(flatten)]
    repos: RepoArgs,

    #[command(flatten)]
    visibility: VisibilityArgs,

    /// The PR branch name.
    #[arg(long, default_value = "")]
    branch: String,

    /// The shell used to run the script.
    #[arg(long, default_value = gh_tools::pull_requests::DEFAULT_SHELL)]
    shell: String,

    /// The script that applies the changes.
    #[arg(long)]
    script: Option<String>,

    /// Read the script from a file.
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// The PR title.
    #[arg(long)]
    title: Option<String>,

    /// The commit message.
    #[arg(long)]
    commit_message: Option<String>,

    /// The PR description.
    #[arg(long = "desc")]
    description: Option<String>,

    /// The user login to request a review from. Repeatable.
    #[arg(long = "review")]
    reviewers: Vec<String>,

    /// The user login to assign the PR to. Repeatable.
    #[arg(long = "assign")]
    assignees: Vec<String>,

    /// Apply changes to the existing PR.
    #[arg(long)]
    patch: bool,
}

impl PrArgs {
    fn into_options(self) -> PrOptions {
        PrOptions {
            repos: self.repos.into_options(Some(self.visibility)),
            branch: self.branch,
            shell: self.shell,
            script: self.script,
            script_file: self.script_file,
            title: self.title,
            commit_message: self.commit_message,
            description: self.description,
            reviewers: self.reviewers,
            assignees: self.assignees,
            patch: self.patch,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Explicitly install aws-lc-rs as the default crypto provider for rustls.
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("A rustls crypto provider was already installed");
    }

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!();
            ExitCode::from(130)
        }
    }
}

/// Logs go to stderr so stdout only carries results. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Validates the flags, then resolves the token and runs the tool.
async fn run(cli: Cli) -> Result<(), RunnerError> {
    let token = cli.token;
    let (mut out, mut diag) = output_streams();

    match cli.command {
        Command::Find(args) => {
            let config = FindConfig::from_options(args.into_options())?;
            runner(token.as_deref())?
                .find(&config, &mut out, &mut diag)
                .await?;
        }
        Command::Watch(args) => {
            let config = WatchConfig::from_options(WatchOptions {
                repos: args.repos.into_options(None),
                watch: args.watch,
                unwatch: args.unwatch,
            })?;
            runner(token.as_deref())?.watch(&config, &mut out).await?;
        }
        Command::PurgeArtifacts(args) => {
            let config = ArtifactConfig::from_options(ArtifactOptions {
                repos: args.repos.into_options(None),
                dry_run: args.dry_run,
            })?;
            runner(token.as_deref())?
                .purge_artifacts(&config, &mut out)
                .await?;
        }
        Command::Pr(args) => {
            let config = PrConfig::from_options(args.into_options())?;
            let summary = runner(token.as_deref())?
                .pr(&config, &mut out, &mut diag)
                .await?;
            if summary.repositories > 0 {
                debug!(%summary, "Run summary");
            }
        }
    }

    Ok(())
}

/// Result and diagnostic sinks. The handles are unlocked: tracing events
/// from runtime worker threads also write to stderr and must never wait on
/// a lock held across an await.
fn output_streams() -> (io::Stdout, io::Stderr) {
    (io::stdout(), io::stderr())
}

fn runner(token: Option<&str>) -> Result<Runner, RunnerError> {
    let token = resolve_token(token)?;
    Runner::new(RunnerConfig::new(token))
}
