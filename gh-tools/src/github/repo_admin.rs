//! Subscription and Actions artifact calls.

use super::{ApiError, ArtifactApi, OctocrabClient, Repository, SubscriptionApi};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Notification subscription of the authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    /// Notifications are delivered.
    #[serde(default)]
    pub subscribed: bool,

    /// Notifications are suppressed.
    #[serde(default)]
    pub ignored: bool,
}

/// A GitHub Actions artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// Artifact id.
    pub id: u64,

    /// Artifact name.
    pub name: String,

    /// Size in bytes.
    #[serde(default)]
    pub size_in_bytes: u64,
}

#[derive(Debug, Deserialize)]
struct ArtifactListPayload {
    total_count: u64,
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// Artifacts requested per page.
const ARTIFACTS_PER_PAGE: u8 = 30;

#[async_trait]
impl SubscriptionApi for OctocrabClient {
    async fn subscription(&self, repo: &Repository) -> Result<Option<Subscription>, ApiError> {
        let route = format!("/repos/{}/subscription", repo.full_name);
        let result: Result<Subscription, _> = self.octocrab().get(&route, None::<&()>).await;
        match result.map_err(|e| ApiError::from_octocrab(e, &route)) {
            Ok(subscription) => Ok(Some(subscription)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn watch(&self, repo: &Repository) -> Result<Subscription, ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/subscription", repo.full_name);
        self.octocrab()
            .put(&route, Some(&json!({ "subscribed": true })))
            .await
            .map_err(|e| ApiError::from_octocrab(e, &route))
    }

    async fn unwatch(&self, repo: &Repository) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!("/repos/{}/subscription", repo.full_name);
        self.delete(&route, None).await
    }
}

#[async_trait]
impl ArtifactApi for OctocrabClient {
    async fn artifacts(&self, repo: &Repository) -> Result<Vec<Artifact>, ApiError> {
        let route = format!("/repos/{}/actions/artifacts", repo.full_name);
        let mut artifacts = Vec::new();
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: ARTIFACTS_PER_PAGE,
                page,
            };
            let list: ArtifactListPayload = self
                .octocrab()
                .get(&route, Some(&params))
                .await
                .map_err(|e| ApiError::from_octocrab(e, &route))?;

            let fetched = list.artifacts.len();
            artifacts.extend(list.artifacts);

            if fetched == 0 || artifacts.len() as u64 >= list.total_count {
                break;
            }
            page += 1;
        }

        Ok(artifacts)
    }

    async fn delete_artifact(
        &self,
        repo: &Repository,
        artifact: &Artifact,
    ) -> Result<(), ApiError> {
        ensure_core_rate_limit(self.octocrab()).await?;
        let route = format!(
            "/repos/{}/actions/artifacts/{}",
            repo.full_name, artifact.id
        );
        self.delete(&route, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_artifact_listing() {
        let list: ArtifactListPayload = serde_json::from_value(json!({
            "total_count": 2,
            "artifacts": [
                { "id": 1, "name": "coverage", "size_in_bytes": 1500 },
                { "id": 2, "name": "logs" }
            ]
        }))
        .unwrap();

        assert_eq!(list.total_count, 2);
        assert_eq!(list.artifacts[0].size_in_bytes, 1500);
        assert_eq!(list.artifacts[1].size_in_bytes, 0);
    }

    #[test]
    fn parses_subscription() {
        let sub: Subscription =
            serde_json::from_value(json!({ "subscribed": false, "ignored": true })).unwrap();
        assert!(sub.ignored);
        assert!(!sub.subscribed);
    }
}
