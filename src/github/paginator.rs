use crate::github::{rate_guard::RateGuard, GitHubClient};
use crate::repository::{classify::language_matches, RemoteRepository};
use crate::shutdown::Shutdown;
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Affiliation used when listing every repository the user can administer
pub const AFFILIATION_ALL: &str = "owner,collaborator,organization_member";

/// Affiliation used when only the user's own repositories are wanted
pub const AFFILIATION_OWNER: &str = "owner";

/// A paginated repository collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoListing {
    /// `GET /user/repos`, sorted by full name
    Owned { affiliation: String },

    /// `GET /users/{login}/starred`, newest star first
    Starred { username: String },
}

impl RepoListing {
    pub fn owned(affiliation: &str) -> Self {
        Self::Owned {
            affiliation: affiliation.to_string(),
        }
    }

    pub fn starred(username: &str) -> Self {
        Self::Starred {
            username: username.to_string(),
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Owned { .. } => "/user/repos".to_string(),
            Self::Starred { username } => {
                format!("/users/{}/starred", urlencoding::encode(username))
            }
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Owned { affiliation } => vec![
                ("sort", "full_name".to_string()),
                ("affiliation", affiliation.clone()),
            ],
            Self::Starred { .. } => vec![
                ("sort", "created".to_string()),
                ("direction", "desc".to_string()),
            ],
        }
    }
}

/// Refinements applied to each record while pages are accumulated
#[derive(Debug, Clone, Default)]
pub struct FetchFilter {
    /// Exact, case-insensitive language match
    pub language: Option<String>,

    /// Topic membership; costs one extra request per candidate record
    pub topic: Option<String>,
}

impl FetchFilter {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.topic.is_none()
    }
}

/// Drives page-by-page collection fetches
pub struct Paginator {
    client: GitHubClient,
    guard: RateGuard,
    shutdown: Shutdown,
}

impl Paginator {
    pub fn new(client: GitHubClient, shutdown: Shutdown) -> Self {
        let guard = RateGuard::new(client.config(), shutdown.clone());
        Self {
            client,
            guard,
            shutdown,
        }
    }

    /// Fetch every page of `listing`, keeping records that pass `filter`.
    ///
    /// Stops at the first empty or short page. Any transport or HTTP error
    /// aborts the whole fetch; a failed topic lookup only drops that record.
    pub async fn fetch_all(
        &self,
        listing: &RepoListing,
        filter: &FetchFilter,
    ) -> Result<Vec<RemoteRepository>> {
        let config = self.client.config();
        let page_size = config.page_size;
        let path = listing.path();
        let params = listing.params();

        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            if self.shutdown.is_requested() {
                return Err(Error::Interrupted);
            }

            let quota = self.guard.ensure_quota(&self.client).await;
            debug!("Requests remaining before page {}: {}", page, quota.remaining);

            // A quota wait cut short by shutdown returns early
            if self.shutdown.is_requested() {
                return Err(Error::Interrupted);
            }

            let records = self
                .client
                .get_page(&path, page, page_size, &params)
                .await
                .map_err(|e| {
                    warn!("Failed to fetch page {} of {}: {}", page, path, e.log_safe());
                    e
                })?;
            let count = records.len();
            debug!("Page {} of {}: {} records", page, path, count);

            for record in records {
                let repo = RemoteRepository::from_json(record)?;
                if self.keep(&repo, filter).await {
                    repos.push(repo);
                }
            }

            if count < page_size as usize {
                break;
            }

            page += 1;
            if !self.shutdown.sleep(config.page_pause()).await {
                return Err(Error::Interrupted);
            }
        }

        info!("Fetched {} repositories from {}", repos.len(), path);
        Ok(repos)
    }

    async fn keep(&self, repo: &RemoteRepository, filter: &FetchFilter) -> bool {
        if let Some(language) = &filter.language {
            if !language_matches(repo, language) {
                return false;
            }
        }

        let Some(topic) = &filter.topic else {
            return true;
        };

        match self.client.get_topics(&repo.full_name).await {
            Ok(topics) => topics.iter().any(|t| t.eq_ignore_ascii_case(topic.trim())),
            Err(e) => {
                warn!(
                    "Error fetching topics for {}: {}",
                    repo.full_name,
                    e.log_safe()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_listing_request() {
        let listing = RepoListing::owned(AFFILIATION_OWNER);
        assert_eq!(listing.path(), "/user/repos");
        assert_eq!(
            listing.params(),
            vec![
                ("sort", "full_name".to_string()),
                ("affiliation", "owner".to_string())
            ]
        );
    }

    #[test]
    fn test_starred_listing_request() {
        let listing = RepoListing::starred("octo cat");
        assert_eq!(listing.path(), "/users/octo%20cat/starred");
        assert_eq!(
            listing.params(),
            vec![
                ("sort", "created".to_string()),
                ("direction", "desc".to_string())
            ]
        );
    }
}
