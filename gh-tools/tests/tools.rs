//! End-to-end runs of every tool against the in-memory GitHub.

use gh_tools::github::{Artifact, FakeGitHub, Subscription, TreeEntry};
use gh_tools::{
    ArtifactConfig, ArtifactOptions, FindConfig, FindOptions, RepoOptions, Repository, Runner,
    RunnerConfig, WatchConfig, WatchOptions,
};

fn runner(fake: FakeGitHub) -> Runner<FakeGitHub> {
    Runner::with_client(RunnerConfig::new("test-token"), fake)
}

fn org() -> FakeGitHub {
    FakeGitHub::new()
        .with_org("acme")
        .with_repo(Repository::new("acme", "api"))
        .with_repo(Repository::new("acme", "web").private())
        .with_repo(Repository::new("acme", "legacy").archived())
        .with_repo(Repository::new("acme", "fork").fork())
}

#[tokio::test]
async fn finds_files_across_an_organization() {
    let fake = org()
        .with_tree(
            "acme/api",
            vec![
                TreeEntry::tree("src"),
                TreeEntry::blob("src/main.rs", 120),
                TreeEntry::blob("Cargo.toml", 40),
            ],
        )
        .with_tree("acme/web", vec![TreeEntry::blob("index.html", 80)])
        .with_tree("acme/fork", vec![TreeEntry::blob("src/lib.rs", 10)]);
    let config = FindConfig::from_options(FindOptions {
        repos: RepoOptions {
            no_fork: true,
            ..RepoOptions::new("acme")
        },
        name: vec![r"\.rs$".to_string()],
        ..FindOptions::default()
    })
    .unwrap();

    let mut out = Vec::new();
    let mut diag = Vec::<u8>::new();
    let budget = runner(fake)
        .find(&config, &mut out, &mut diag)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "acme/api src/main.rs\n");
    assert!(diag.is_empty());
    assert_eq!(budget.matched(), 1);
}

#[tokio::test]
async fn greps_contents_of_a_single_repository() {
    let fake = org()
        .with_tree(
            "acme/api",
            vec![
                TreeEntry::blob("src/main.rs", 40),
                TreeEntry::blob("logo.png", 4),
            ],
        )
        .with_blob("acme/api", "src/main.rs", "fn main() {\n    todo!()\n}\n")
        .with_blob("acme/api", "logo.png", vec![0x89, b'P', 0, 0]);
    let config = FindConfig::from_options(FindOptions {
        repos: RepoOptions::new("acme/api"),
        grep: Some("todo!".to_string()),
        ..FindOptions::default()
    })
    .unwrap();

    let mut out = Vec::new();
    runner(fake)
        .find(&config, &mut out, &mut Vec::<u8>::new())
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "acme/api src/main.rs 2     todo!()\n"
    );
}

#[tokio::test]
async fn warns_about_truncated_trees() {
    let fake = org().with_truncated_tree("acme/api", vec![TreeEntry::blob("a.txt", 1)]);
    let config = FindConfig::from_options(FindOptions {
        repos: RepoOptions::new("acme/api"),
        ..FindOptions::default()
    })
    .unwrap();

    let mut out = Vec::new();
    let mut diag = Vec::new();
    runner(fake)
        .find(&config, &mut out, &mut diag)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "acme/api a.txt\n");
    assert_eq!(
        String::from_utf8(diag).unwrap(),
        "WARNING: results were truncated for acme/api\n"
    );
}

#[tokio::test]
async fn reports_unknown_owner() {
    let config = FindConfig::from_options(FindOptions {
        repos: RepoOptions::new("nobody"),
        ..FindOptions::default()
    })
    .unwrap();

    let err = runner(FakeGitHub::new())
        .find(&config, &mut Vec::<u8>::new(), &mut Vec::<u8>::new())
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("can't read owner information: "));
}

#[tokio::test]
async fn watches_matching_repositories() {
    let fake = org().with_subscription(
        "acme/api",
        Subscription {
            subscribed: true,
            ignored: false,
        },
    );
    let config = WatchConfig::from_options(WatchOptions {
        repos: RepoOptions {
            repo: Some("^(api|web)$".to_string()),
            ..RepoOptions::new("acme")
        },
        watch: true,
        unwatch: false,
    })
    .unwrap();

    let runner = runner(fake);
    let mut out = Vec::new();
    runner.watch(&config, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "acme/api watching\nacme/web not watching -> watching\n"
    );
    assert!(runner.api().subscription_of("acme/web").is_some());
}

#[tokio::test]
async fn purges_artifacts_with_totals() {
    let fake = org()
        .with_artifacts(
            "acme/api",
            vec![Artifact {
                id: 11,
                name: "coverage".to_string(),
                size_in_bytes: 2048,
            }],
        )
        .with_artifacts(
            "acme/fork",
            vec![Artifact {
                id: 12,
                name: "dist".to_string(),
                size_in_bytes: 999,
            }],
        );
    let config = ArtifactConfig::from_options(ArtifactOptions {
        repos: RepoOptions::new("acme"),
        dry_run: false,
    })
    .unwrap();

    let runner = runner(fake);
    let mut out = Vec::new();
    let totals = runner.purge_artifacts(&config, &mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "acme/api purged 1 out of 1 artifacts (2.0 kB)\n\
         acme/web\n\
         acme/fork purged 1 out of 1 artifacts (999 B)\n\
         Total: purged 2 artifacts (3.0 kB) in 3 repos\n"
    );
    assert_eq!(totals.artifacts, 2);
    assert!(runner.api().artifacts_of("acme/api").is_empty());
}

#[tokio::test]
async fn pr_reports_when_nothing_matches() {
    let config = gh_tools::PrConfig::from_options(gh_tools::PrOptions {
        repos: RepoOptions {
            repo: Some("^nothing$".to_string()),
            ..RepoOptions::new("acme")
        },
        branch: "chore/bump".to_string(),
        shell: "bash".to_string(),
        script: Some("true".to_string()),
        title: Some("Bump".to_string()),
        ..gh_tools::PrOptions::default()
    })
    .unwrap();

    let runner = runner(org());
    let mut out = Vec::new();
    let summary = runner
        .pr(&config, &mut out, &mut Vec::<u8>::new())
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "No matching repositories\n");
    assert_eq!(summary.repositories, 0);
    assert_eq!(runner.api().count_calls("branch"), 0);
}
