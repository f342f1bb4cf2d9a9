use std::env;
use std::time::Duration;

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API access configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Login the token is expected to belong to
    pub username: Option<String>,

    /// Personal access token sent as a bearer credential
    pub token: Option<String>,

    /// Base API URL (overridable for GitHub Enterprise and tests)
    pub api_base_url: String,

    /// Per-request deadline in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Items requested per page (max 100)
    pub page_size: u32,

    /// Pause between page fetches in milliseconds
    pub page_pause_ms: u64,

    /// Pause between mutation requests in milliseconds
    pub mutation_pause_ms: u64,

    /// Wait for the quota reset when fewer requests than this remain
    pub quota_floor: u32,

    /// Extra seconds added to the quota reset time before resuming
    pub quota_margin_secs: i64,

    /// Maximum number of consecutive quota waits before giving up waiting
    pub quota_max_waits: u32,
}

impl GitHubConfig {
    /// Create a new GitHubConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            username: env::var("GITHUB_USERNAME").ok().filter(|s| !s.is_empty()),
            token: env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty()),
            api_base_url: env::var("GITHUB_API_URL").unwrap_or(defaults.api_base_url),
            request_timeout_secs: env::var("GITHUB_REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            page_size: env::var("GITHUB_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.page_size),
            page_pause_ms: env::var("GITHUB_PAGE_PAUSE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.page_pause_ms),
            mutation_pause_ms: env::var("GITHUB_MUTATION_PAUSE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.mutation_pause_ms),
            quota_floor: env::var("GITHUB_QUOTA_FLOOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quota_floor),
            quota_margin_secs: env::var("GITHUB_QUOTA_MARGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quota_margin_secs),
            quota_max_waits: env::var("GITHUB_QUOTA_MAX_WAITS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quota_max_waits),
        }
    }

    /// Configuration pointed at a local server with no pacing, for tests
    pub fn for_base_url(base_url: &str, username: &str, token: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            token: Some(token.to_string()),
            api_base_url: base_url.trim_end_matches('/').to_string(),
            page_pause_ms: 0,
            mutation_pause_ms: 0,
            ..Self::default()
        }
    }

    /// Get the base API URL without a trailing slash
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_pause(&self) -> Duration {
        Duration::from_millis(self.page_pause_ms)
    }

    pub fn mutation_pause(&self) -> Duration {
        Duration::from_millis(self.mutation_pause_ms)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 10,
            page_size: 100,
            page_pause_ms: 1000,
            mutation_pause_ms: 2000,
            quota_floor: 5,
            quota_margin_secs: 5,
            quota_max_waits: 3,
        }
    }
}
