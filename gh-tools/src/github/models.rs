//! Domain types read from the GitHub API.

use chrono::{DateTime, Utc};

/// Kind of account that owns repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    /// A personal account.
    User,
    /// An organization account.
    Organization,
}

/// A resolved repository owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Account login.
    pub login: String,

    /// Account kind, decides which listing endpoint is used.
    pub kind: OwnerKind,
}

/// A repository as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Login of the owning account.
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Default branch name (e.g., "main").
    pub default_branch: String,

    /// Whether the repository is private.
    pub private: bool,

    /// Whether the repository is a fork.
    pub fork: bool,

    /// Whether the repository is archived.
    pub archived: bool,

    /// HTTPS clone URL.
    pub clone_url: String,
}

impl Repository {
    /// Creates a public, non-fork, non-archived repository on `main`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            full_name: format!("{owner}/{name}"),
            clone_url: format!("https://github.com/{owner}/{name}.git"),
            default_branch: "main".to_string(),
            private: false,
            fork: false,
            archived: false,
            owner,
            name,
        }
    }

    /// Marks the repository private.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Marks the repository a fork.
    #[must_use]
    pub fn fork(mut self) -> Self {
        self.fork = true;
        self
    }

    /// Marks the repository archived.
    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }
}

/// One page of a repository listing.
#[derive(Debug, Clone, Default)]
pub struct RepoPage {
    /// Repositories on this page, in API order.
    pub items: Vec<Repository>,

    /// Number of the next page, `None` on the last one.
    pub next_page: Option<u32>,
}

/// Type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// A submodule commit.
    Commit,
}

impl EntryKind {
    /// Single letter used by the detailed listing: `f`, `d` or empty.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Blob => "f",
            Self::Tree => "d",
            Self::Commit => "",
        }
    }
}

/// An entry of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Slash separated path relative to the repository root.
    pub path: String,

    /// Entry type.
    pub kind: EntryKind,

    /// Size in bytes, reported for blobs only.
    pub size: Option<u64>,

    /// Object id, used to download blob contents.
    pub sha: String,
}

impl TreeEntry {
    /// Creates a blob entry.
    pub fn blob(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            sha: format!("blob:{path}"),
            path,
            kind: EntryKind::Blob,
            size: Some(size),
        }
    }

    /// Creates a directory entry.
    pub fn tree(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            sha: format!("tree:{path}"),
            path,
            kind: EntryKind::Tree,
            size: None,
        }
    }

    /// Returns true for file entries.
    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    /// Last path component.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// A full recursive tree listing.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// All entries, in API order.
    pub entries: Vec<TreeEntry>,

    /// Set when GitHub cut the listing short.
    pub truncated: bool,
}

/// The latest commit touching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Login of the GitHub account linked to the commit author, if any.
    pub author_login: Option<String>,

    /// Author date.
    pub date: Option<DateTime<Utc>>,
}
