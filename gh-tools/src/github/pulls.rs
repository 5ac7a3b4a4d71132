//! Branch, pull request, reviewer and assignee calls.

use super::client::LoginPayload;
use super::{ApiError, GitHubApi, OctocrabClient, PullRequestApi, Repository};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// An open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,

    /// Web URL.
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    number: u64,
    #[serde(default)]
    html_url: String,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    reference: String,
}

#[derive(Debug, Serialize)]
struct PullListParams<'a> {
    head: String,
    state: &'a str,
    per_page: u8,
}

#[derive(Debug, Deserialize)]
struct RequestedReviewersPayload {
    #[serde(default)]
    users: Vec<LoginPayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    #[serde(default)]
    assignees: Vec<LoginPayload>,
}

#[async_trait]
impl PullRequestApi for OctocrabClient {
    async fn user_exists(&self, login: &str) -> Result<bool, ApiError> {
        match self.resolve_owner(login).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn branch_exists(&self, repo: &Repository, branch: &str) -> Result<bool, ApiError> {
        let route = format!("/repos/{}/branches/{branch}", repo.full_name);
        let result: Result<serde_json::Value, _> = self.octocrab().get(&route, None::<&()>).await;
        match result.map_err(|e| ApiError::from_octocrab(e, &route)) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn find_open_pull(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<PullRequest>, ApiError> {
        let route = format!("/repos/{}/pulls", repo.full_name);
        let params = PullListParams {
            head: format!("{}:{branch}", repo.owner),
            state: "open",
            per_page: 100,
        };
        let pulls: Vec<PullPayload> = self
            .octocrab()
            .get(&route, Some(&params))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;

        Ok(pulls
            .into_iter()
            .find(|pull| pull.head.reference == branch)
            .map(|pull| PullRequest {
                number: pull.number,
                html_url: pull.html_url,
            }))
    }

    async fn create_pull(
        &self,
        repo: &Repository,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/pulls", repo.full_name);
        let payload = json!({
            "title": title,
            "head": head,
            "base": repo.default_branch,
            "body": body,
        });
        self.octocrab()
            .post(&route, Some(&payload))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))
    }

    async fn update_pull(
        &self,
        repo: &Repository,
        number: u64,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<PullRequest, ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/pulls/{number}", repo.full_name);
        let mut payload = serde_json::Map::new();
        if let Some(title) = title {
            payload.insert("title".to_string(), json!(title));
        }
        if let Some(body) = body {
            payload.insert("body".to_string(), json!(body));
        }
        self.octocrab()
            .patch(&route, Some(&payload))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))
    }

    async fn requested_reviewers(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<String>, ApiError> {
        let route = format!(
            "/repos/{}/pulls/{number}/requested_reviewers",
            repo.full_name
        );
        let reviewers: RequestedReviewersPayload = self
            .octocrab()
            .get(&route, None::<&()>)
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        Ok(reviewers.users.into_iter().map(|u| u.login).collect())
    }

    async fn request_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!(
            "/repos/{}/pulls/{number}/requested_reviewers",
            repo.full_name
        );
        let _: serde_json::Value = self
            .octocrab()
            .post(&route, Some(&json!({ "reviewers": logins })))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        Ok(())
    }

    async fn remove_reviewers(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!(
            "/repos/{}/pulls/{number}/requested_reviewers",
            repo.full_name
        );
        self.delete(&route, Some(&json!({ "reviewers": logins })))
            .await
    }

    async fn assignees(&self, repo: &Repository, number: u64) -> Result<Vec<String>, ApiError> {
        let route = format!("/repos/{}/issues/{number}", repo.full_name);
        let issue: IssuePayload = self
            .octocrab()
            .get(&route, None::<&()>)
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        Ok(issue.assignees.into_iter().map(|a| a.login).collect())
    }

    async fn add_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/issues/{number}/assignees", repo.full_name);
        let _: serde_json::Value = self
            .octocrab()
            .post(&route, Some(&json!({ "assignees": logins })))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))?;
        Ok(())
    }

    async fn remove_assignees(
        &self,
        repo: &Repository,
        number: u64,
        logins: &[String],
    ) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/issues/{number}/assignees", repo.full_name);
        self.delete(&route, Some(&json!({ "assignees": logins })))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pull_listing() {
        let pulls: Vec<PullPayload> = serde_json::from_value(json!([
            {
                "number": 7,
                "html_url": "https://github.com/acme/widgets/pull/7",
                "head": { "ref": "bump-deps" }
            }
        ]))
        .unwrap();

        assert_eq!(pulls[0].number, 7);
        assert_eq!(pulls[0].head.reference, "bump-deps");
    }

    #[test]
    fn parses_assignees() {
        let issue: IssuePayload =
            serde_json::from_value(json!({ "assignees": [{ "login": "octocat" }] })).unwrap();
        assert_eq!(issue.assignees[0].login, "octocat");
    }
}
