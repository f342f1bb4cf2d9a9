pub mod classify;

pub use classify::{classify, language_counts, Classification, FilterCriteria, Filtered};

use crate::github::{models::ApiRepository, parser::parse_full_name};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::fmt;

/// Validated snapshot of a remote repository at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepository {
    pub full_name: String,
    pub is_private: bool,
    pub is_fork: bool,
    pub star_count: u64,
    pub fork_count: u64,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub description: Option<String>,
    pub html_url: String,
}

impl RemoteRepository {
    /// Decode and validate one raw API record
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let raw: ApiRepository = serde_json::from_value(value)?;
        Self::try_from(raw)
    }

    /// Repository name without the owner prefix
    pub fn name(&self) -> &str {
        self.full_name
            .split_once('/')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }
}

impl TryFrom<ApiRepository> for RemoteRepository {
    type Error = Error;

    fn try_from(raw: ApiRepository) -> Result<Self> {
        parse_full_name(&raw.full_name)?;

        if raw.html_url.is_empty() {
            return Err(Error::Validation(format!(
                "Repository {} has no html_url",
                raw.full_name
            )));
        }

        Ok(Self {
            full_name: raw.full_name,
            is_private: raw.private,
            is_fork: raw.fork,
            star_count: raw.stargazers_count,
            fork_count: raw.forks_count,
            language: raw.language.filter(|l| !l.is_empty()),
            topics: raw.topics,
            updated_at: raw.updated_at,
            description: raw.description,
            html_url: raw.html_url,
        })
    }
}

/// Bucket an owned repository falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Public,
    Private,
    Fork,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Public, Category::Private, Category::Fork];

    /// Fork status wins over visibility
    pub fn of(repo: &RemoteRepository) -> Self {
        if repo.is_fork {
            Category::Fork
        } else if repo.is_private {
            Category::Private
        } else {
            Category::Public
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Public => write!(f, "public"),
            Category::Private => write!(f, "private"),
            Category::Fork => write!(f, "fork"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(full_name: &str) -> serde_json::Value {
        json!({
            "full_name": full_name,
            "private": false,
            "fork": false,
            "stargazers_count": 3,
            "forks_count": 1,
            "language": "Rust",
            "topics": ["cli"],
            "updated_at": "2024-03-01T10:00:00Z",
            "description": null,
            "html_url": format!("https://github.com/{full_name}")
        })
    }

    #[test]
    fn test_from_json_valid_record() {
        let repo = RemoteRepository::from_json(record("octocat/hello")).unwrap();
        assert_eq!(repo.full_name, "octocat/hello");
        assert_eq!(repo.name(), "hello");
        assert_eq!(repo.language.as_deref(), Some("Rust"));
        assert_eq!(repo.topics, vec!["cli".to_string()]);
        assert_eq!(repo.updated_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_from_json_missing_field_fails() {
        let mut value = record("octocat/hello");
        value.as_object_mut().unwrap().remove("fork");
        assert!(matches!(
            RemoteRepository::from_json(value),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_json_bad_full_name_fails() {
        assert!(matches!(
            RemoteRepository::from_json(record("not-a-full-name")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_topics_default_to_empty() {
        let mut value = record("octocat/hello");
        value.as_object_mut().unwrap().remove("topics");
        let repo = RemoteRepository::from_json(value).unwrap();
        assert!(repo.topics.is_empty());
    }

    #[test]
    fn test_fork_takes_precedence() {
        let mut value = record("octocat/hello");
        value["fork"] = json!(true);
        value["private"] = json!(true);
        let repo = RemoteRepository::from_json(value).unwrap();
        assert_eq!(Category::of(&repo), Category::Fork);
    }
}
