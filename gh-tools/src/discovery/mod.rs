//! Repository discovery.
//!
//! [`RepoFinder`] resolves the owner once, then either fetches the single
//! requested repository or pages through the owner's listing, filtering each
//! page with a [`RepoFilter`] before accumulating it.

mod error;
mod filter;

pub use error::DiscoveryError;
pub use filter::RepoFilter;

use crate::github::{ApiError, GitHubApi, OwnerKind, RepoPage, Repository};
use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument};

/// Repositories requested per listing page.
pub const PER_PAGE: u8 = 30;

/// One paginated listing strategy.
#[async_trait]
pub trait RepoLister: Send + Sync {
    /// Fetches one page of repositories.
    async fn list_page(&self, page: u32, per_page: u8) -> Result<RepoPage, ApiError>;
}

/// Lists the repositories a user owns.
#[derive(Debug)]
pub struct UserRepoLister<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    login: &'a str,
}

impl<'a, A: GitHubApi + ?Sized> UserRepoLister<'a, A> {
    /// Creates a lister for `login`.
    pub fn new(api: &'a A, login: &'a str) -> Self {
        Self { api, login }
    }
}

#[async_trait]
impl<A: GitHubApi + ?Sized> RepoLister for UserRepoLister<'_, A> {
    async fn list_page(&self, page: u32, per_page: u8) -> Result<RepoPage, ApiError> {
        self.api.list_user_repos(self.login, page, per_page).await
    }
}

/// Lists the repositories of an organization.
#[derive(Debug)]
pub struct OrgRepoLister<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    org: &'a str,
}

impl<'a, A: GitHubApi + ?Sized> OrgRepoLister<'a, A> {
    /// Creates a lister for `org`.
    pub fn new(api: &'a A, org: &'a str) -> Self {
        Self { api, org }
    }
}

#[async_trait]
impl<A: GitHubApi + ?Sized> RepoLister for OrgRepoLister<'_, A> {
    async fn list_page(&self, page: u32, per_page: u8) -> Result<RepoPage, ApiError> {
        self.api.list_org_repos(self.org, page, per_page).await
    }
}

/// Finds the repositories selected by a [`RepoFilter`].
#[derive(Debug)]
pub struct RepoFinder<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: GitHubApi + ?Sized> RepoFinder<'a, A> {
    /// Creates a finder on top of an API client.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Returns the repositories admitted by `filter`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the owner can't be resolved, the single
    /// repository can't be read, or any listing page fails.
    pub async fn find(&self, filter: &RepoFilter) -> Result<Vec<Repository>, DiscoveryError> {
        let span = info_span!("find_repositories", owner = %filter.owner);

        async {
            let owner = self
                .api
                .resolve_owner(&filter.owner)
                .await
                .map_err(DiscoveryError::OwnerLookup)?;
            debug!(kind = ?owner.kind, "Resolved owner");

            if let Some(name) = filter.single_repo() {
                return match self.api.get_repository(&owner.login, name).await {
                    Ok(repo) => Ok(vec![repo]),
                    Err(e) if e.is_not_found() => Err(DiscoveryError::RepoNotFound {
                        owner: owner.login.clone(),
                        name: name.to_string(),
                    }),
                    Err(e) => Err(DiscoveryError::Repository(e)),
                };
            }

            if filter.admits_nothing() {
                debug!("Private and public repositories both excluded");
                return Ok(Vec::new());
            }

            let repos = match owner.kind {
                OwnerKind::User => {
                    collect(&UserRepoLister::new(self.api, &owner.login), filter).await?
                }
                OwnerKind::Organization => {
                    collect(&OrgRepoLister::new(self.api, &owner.login), filter).await?
                }
            };

            info!(count = repos.len(), "Discovery complete");
            Ok(repos)
        }
        .instrument(span)
        .await
    }
}

/// Pages through a listing until the cursor is exhausted.
async fn collect(
    lister: &dyn RepoLister,
    filter: &RepoFilter,
) -> Result<Vec<Repository>, DiscoveryError> {
    let mut repos = Vec::new();
    let mut page = 1;

    loop {
        let listing = lister
            .list_page(page, PER_PAGE)
            .await
            .map_err(DiscoveryError::Listing)?;
        debug!(page, fetched = listing.items.len(), "Read repository page");

        repos.extend(filter.apply(listing.items));

        match listing.next_page {
            Some(next) => page = next,
            None => break,
        }
    }

    Ok(repos)
}
