use crate::github::{
    config::GitHubConfig,
    models::{ApiErrorBody, RateLimitResponse, Topics, User, VisibilityPatch},
    rate_guard::QuotaState,
};
use crate::{Error, Result};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

/// Media type required by the topics endpoint
const TOPICS_MEDIA_TYPE: &str = "application/vnd.github.mercy-preview+json";

/// GitHub API client authenticated with a bearer token
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("repokeeper/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let token = config
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("A GitHub token is required".to_string()))?;
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::Config("GitHub token contains invalid characters".to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url(), path)
    }

    /// Make a GET request and decode the JSON body
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GitHub API request: GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Turn a non-success response into `Error::Api`, keeping the upstream message
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::error_detail(response).await;
        error!("GitHub API error: {} - {}", status, message);
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Upstream-provided detail for a failed response
    pub(crate) async fn error_detail(response: Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        }
    }

    /// Fetch the profile of the token's owner and make sure it is `expected_login`
    pub async fn validate_identity(&self, expected_login: &str) -> Result<User> {
        let user: User = match self.get("/user", &[]).await {
            Ok(user) => user,
            Err(Error::Api { status, .. }) if status == StatusCode::UNAUTHORIZED.as_u16() => {
                error!("Invalid token for user {}", expected_login);
                return Err(Error::Authentication(
                    "Invalid or expired token".to_string(),
                ));
            }
            Err(Error::Api { status, .. }) if status == StatusCode::FORBIDDEN.as_u16() => {
                error!("Insufficient permissions for the token of {}", expected_login);
                return Err(Error::Authentication(
                    "Access denied, check the token's scopes".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        if !user.login.eq_ignore_ascii_case(expected_login) {
            warn!(
                "Token belongs to {} but {} was expected",
                user.login, expected_login
            );
            return Err(Error::Authentication(format!(
                "The token does not belong to user {expected_login}"
            )));
        }

        info!("Credentials validated for user {}", user.login);
        Ok(user)
    }

    /// Current core API quota
    pub async fn rate_limit(&self) -> Result<QuotaState> {
        let response: RateLimitResponse = self.get("/rate_limit", &[]).await?;
        let core = response.resources.core;
        Ok(QuotaState {
            remaining: core.remaining,
            limit: core.limit,
            reset_epoch: core.reset,
        })
    }

    /// Fetch one page of a collection as raw JSON values
    pub async fn get_page(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        params: &[(&str, String)],
    ) -> Result<Vec<serde_json::Value>> {
        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("per_page", per_page.to_string())];
        query.extend(params.iter().cloned());
        self.get(path, &query).await
    }

    /// Topics attached to a repository
    pub async fn get_topics(&self, full_name: &str) -> Result<Vec<String>> {
        let url = self.url(&format!("/repos/{full_name}/topics"));
        debug!("GitHub API request: GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, TOPICS_MEDIA_TYPE)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let topics: Topics = serde_json::from_str(&response.text().await?)?;
        Ok(topics.names)
    }

    /// `DELETE /repos/{full_name}`; returns the raw response for the caller to judge
    pub async fn delete_repository(&self, full_name: &str) -> Result<Response> {
        let url = self.url(&format!("/repos/{full_name}"));
        debug!("GitHub API request: DELETE {}", url);
        Ok(self.client.delete(&url).send().await?)
    }

    /// `PATCH /repos/{full_name}` with the requested visibility
    pub async fn set_visibility(&self, full_name: &str, make_private: bool) -> Result<Response> {
        let url = self.url(&format!("/repos/{full_name}"));
        let body = VisibilityPatch {
            visibility: if make_private { "private" } else { "public" },
        };
        debug!("GitHub API request: PATCH {} ({})", url, body.visibility);
        Ok(self.client.patch(&url).json(&body).send().await?)
    }

    /// `DELETE /user/starred/{full_name}`
    pub async fn unstar(&self, full_name: &str) -> Result<Response> {
        let url = self.url(&format!("/user/starred/{full_name}"));
        debug!("GitHub API request: DELETE {}", url);
        Ok(self.client.delete(&url).send().await?)
    }
}
