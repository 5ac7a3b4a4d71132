//! Octocrab backed implementation of [`GitHubApi`].

use super::{
    ApiError, CommitInfo, EntryKind, GitHubApi, Owner, OwnerKind, RepoPage, Repository, Tree,
    TreeEntry,
};
use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// GitHub client used by every tool.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Octocrab,
}

impl OctocrabClient {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::GitHub`] if the underlying HTTP client can't be built.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .map_err(ApiError::GitHub)?;
        Ok(Self { octocrab })
    }

    /// Wraps an already configured octocrab instance.
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Returns the underlying octocrab instance.
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// Sends a DELETE request, treating any non-2xx status as an error.
    pub(super) async fn delete(
        &self,
        route: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ApiError> {
        let response = self
            .octocrab
            ._delete(route, body)
            .await
            .map_err(|e| ApiError::from_octocrab(e, route))?;
        match ApiError::from_status(Some(response.status().as_u16()), route) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_repos(&self, route: String, params: &ListParams) -> Result<RepoPage, ApiError> {
        debug!(route = %route, page = params.page, "Listing repositories");
        let page: Page<RepositoryPayload> = self
            .octocrab
            .get(&route, Some(params))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;

        Ok(RepoPage {
            next_page: page.next.as_ref().map(|_| params.page + 1),
            items: page.items.into_iter().map(Repository::from).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
    page: u32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginPayload {
    pub(super) login: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    full_name: Option<String>,
    owner: Option<LoginPayload>,
    default_branch: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
    clone_url: Option<String>,
}

impl From<RepositoryPayload> for Repository {
    fn from(payload: RepositoryPayload) -> Self {
        let owner = payload.owner.map(|o| o.login).unwrap_or_default();
        let full_name = payload
            .full_name
            .unwrap_or_else(|| format!("{}/{}", owner, payload.name));
        let clone_url = payload
            .clone_url
            .unwrap_or_else(|| format!("https://github.com/{full_name}.git"));
        Self {
            owner,
            name: payload.name,
            full_name,
            default_branch: payload.default_branch.unwrap_or_else(|| "main".to_string()),
            private: payload.private,
            fork: payload.fork,
            archived: payload.archived,
            clone_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreePayload {
    #[serde(default)]
    tree: Vec<TreeEntryPayload>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntryPayload {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BlobPayload {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    author: Option<LoginPayload>,
    commit: CommitDetailPayload,
}

#[derive(Debug, Deserialize)]
struct CommitDetailPayload {
    author: Option<SignaturePayload>,
}

#[derive(Debug, Deserialize)]
struct SignaturePayload {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct CommitParams<'a> {
    sha: &'a str,
    path: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Serialize)]
struct TreeParams {
    recursive: u8,
}

fn decode_blob(payload: BlobPayload, resource: &str) -> Result<Vec<u8>, ApiError> {
    match payload.encoding.as_str() {
        "base64" => {
            let compact: String = payload
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| ApiError::UnexpectedResponse {
                    resource: resource.to_string(),
                    message: e.to_string(),
                })
        }
        "utf-8" | "utf8" => Ok(payload.content.into_bytes()),
        other => Err(ApiError::UnexpectedResponse {
            resource: resource.to_string(),
            message: format!("unsupported blob encoding {other}"),
        }),
    }
}

#[async_trait]
impl GitHubApi for OctocrabClient {
    async fn resolve_owner(&self, login: &str) -> Result<Owner, ApiError> {
        let route = format!("/users/{login}");
        let payload: OwnerPayload = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;

        let kind = match payload.kind.as_str() {
            "User" => OwnerKind::User,
            "Organization" => OwnerKind::Organization,
            other => {
                return Err(ApiError::UnexpectedResponse {
                    resource: route,
                    message: format!("unknown owner type {other}"),
                })
            }
        };

        Ok(Owner {
            login: payload.login,
            kind,
        })
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<Repository, ApiError> {
        let route = format!("/repos/{owner}/{name}");
        let payload: RepositoryPayload = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        Ok(payload.into())
    }

    async fn list_user_repos(
        &self,
        owner: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepoPage, ApiError> {
        let params = ListParams {
            per_page,
            page,
            kind: Some("owner"),
        };
        self.list_repos(format!("/users/{owner}/repos"), &params)
            .await
    }

    async fn list_org_repos(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepoPage, ApiError> {
        let params = ListParams {
            per_page,
            page,
            kind: None,
        };
        self.list_repos(format!("/orgs/{org}/repos"), &params).await
    }

    async fn get_tree(&self, repo: &Repository, branch: &str) -> Result<Tree, ApiError> {
        let route = format!("/repos/{}/git/trees/{branch}", repo.full_name);
        let payload: TreePayload = self
            .octocrab
            .get(&route, Some(&TreeParams { recursive: 1 }))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;

        let entries = payload
            .tree
            .into_iter()
            .map(|entry| TreeEntry {
                kind: match entry.kind.as_str() {
                    "tree" => EntryKind::Tree,
                    "commit" => EntryKind::Commit,
                    _ => EntryKind::Blob,
                },
                path: entry.path,
                size: entry.size,
                sha: entry.sha,
            })
            .collect();

        Ok(Tree {
            entries,
            truncated: payload.truncated,
        })
    }

    async fn get_blob(&self, repo: &Repository, entry: &TreeEntry) -> Result<Vec<u8>, ApiError> {
        let route = format!("/repos/{}/git/blobs/{}", repo.full_name, entry.sha);
        let payload: BlobPayload = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        decode_blob(payload, &route)
    }

    async fn last_commit(
        &self,
        repo: &Repository,
        branch: &str,
        path: &str,
    ) -> Result<Option<CommitInfo>, ApiError> {
        let route = format!("/repos/{}/commits", repo.full_name);
        let params = CommitParams {
            sha: branch,
            path,
            per_page: 1,
            page: 1,
        };
        let commits: Vec<CommitPayload> = self
            .octocrab
            .get(&route, Some(&params))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;

        Ok(commits.into_iter().next().map(|commit| CommitInfo {
            author_login: commit.author.map(|a| a.login),
            date: commit.commit.author.and_then(|a| a.date),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_blob_with_line_breaks() {
        let payload = BlobPayload {
            content: "aGVsbG8g\nd29ybGQ=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(decode_blob(payload, "blob").unwrap(), b"hello world");
    }

    #[test]
    fn rejects_unknown_blob_encoding() {
        let payload = BlobPayload {
            content: String::new(),
            encoding: "rot13".to_string(),
        };
        assert!(matches!(
            decode_blob(payload, "blob"),
            Err(ApiError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn converts_repository_payload() {
        let payload: RepositoryPayload = serde_json::from_value(serde_json::json!({
            "name": "widgets",
            "full_name": "acme/widgets",
            "owner": { "login": "acme" },
            "default_branch": "trunk",
            "private": true,
            "fork": false,
            "archived": true,
            "clone_url": "https://github.com/acme/widgets.git"
        }))
        .unwrap();

        let repo = Repository::from(payload);
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.full_name, "acme/widgets");
        assert_eq!(repo.default_branch, "trunk");
        assert!(repo.private);
        assert!(repo.archived);
        assert!(!repo.fork);
    }

    #[test]
    fn parses_commit_author_and_date() {
        let commits: Vec<CommitPayload> = serde_json::from_value(serde_json::json!([{
            "author": { "login": "octocat" },
            "commit": { "author": { "date": "2021-03-04T05:06:07Z" } }
        }]))
        .unwrap();

        let commit = &commits[0];
        assert_eq!(commit.author.as_ref().unwrap().login, "octocat");
        let date = commit.commit.author.as_ref().and_then(|a| a.date).unwrap();
        assert_eq!(date.to_rfc3339(), "2021-03-04T05:06:07+00:00");
    }

    #[test]
    fn fills_missing_repository_fields() {
        let payload: RepositoryPayload = serde_json::from_value(serde_json::json!({
            "name": "widgets",
            "owner": { "login": "acme" }
        }))
        .unwrap();

        let repo = Repository::from(payload);
        assert_eq!(repo.full_name, "acme/widgets");
        assert_eq!(repo.default_branch, "main");
        assert_eq!(repo.clone_url, "https://github.com/acme/widgets.git");
    }
}
