use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /rate_limit` response
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimit,
}

/// GitHub API rate limit information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimit {
    #[serde(default)]
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

/// Authenticated user profile (`GET /user`)
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub total_private_repos: u32,
}

/// Repository record as returned by the list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub full_name: String,
    pub private: bool,
    pub fork: bool,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub description: Option<String>,
    pub html_url: String,
}

/// `GET /repos/{owner}/{repo}/topics` response
#[derive(Debug, Clone, Deserialize)]
pub struct Topics {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Error body returned by the API on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Body of a visibility change request
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityPatch {
    pub visibility: &'static str,
}
