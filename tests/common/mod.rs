#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use repokeeper::github::{GitHubClient, GitHubConfig};
use serde_json::json;

pub const USERNAME: &str = "octocat";

pub fn repo_json(full_name: &str, private: bool, fork: bool, language: Option<&str>) -> serde_json::Value {
    json!({
        "full_name": full_name,
        "private": private,
        "fork": fork,
        "stargazers_count": 10,
        "forks_count": 2,
        "language": language,
        "topics": [],
        "updated_at": "2024-03-01T12:00:00Z",
        "description": "A repository",
        "html_url": format!("https://github.com/{full_name}")
    })
}

/// A page of `count` public Rust repositories named `<prefix>-<n>`
pub fn page_body(prefix: &str, count: usize) -> String {
    let records: Vec<_> = (0..count)
        .map(|i| repo_json(&format!("{USERNAME}/{prefix}-{i}"), false, false, Some("Rust")))
        .collect();
    serde_json::Value::Array(records).to_string()
}

pub fn client_for(server: &ServerGuard, page_size: u32) -> GitHubClient {
    client_with(server, |config| config.page_size = page_size)
}

pub fn client_with(server: &ServerGuard, configure: impl FnOnce(&mut GitHubConfig)) -> GitHubClient {
    let mut config = GitHubConfig::for_base_url(&server.url(), USERNAME, "test-token");
    configure(&mut config);
    GitHubClient::new(config).unwrap()
}

pub async fn mock_quota(server: &mut ServerGuard, remaining: u32, reset: i64) -> Mock {
    server
        .mock("GET", "/rate_limit")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "resources": { "core": { "limit": 5000, "remaining": remaining, "reset": reset } }
            })
            .to_string(),
        )
        .create_async()
        .await
}

pub async fn mock_page(server: &mut ServerGuard, path: &str, page: u32, body: String) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
