use super::{Category, RemoteRepository};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::warn;

/// Owned repositories partitioned by category, each in fetch order
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub public: Vec<RemoteRepository>,
    pub private: Vec<RemoteRepository>,
    pub forks: Vec<RemoteRepository>,
}

impl Classification {
    pub fn get(&self, category: Category) -> &[RemoteRepository] {
        match category {
            Category::Public => &self.public,
            Category::Private => &self.private,
            Category::Fork => &self.forks,
        }
    }

    pub fn total(&self) -> usize {
        self.public.len() + self.private.len() + self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Single pass partition; every record lands in exactly one category
pub fn classify(records: Vec<RemoteRepository>) -> Classification {
    let mut classification = Classification::default();

    for repo in records {
        match Category::of(&repo) {
            Category::Fork => classification.forks.push(repo),
            Category::Private => classification.private.push(repo),
            Category::Public => classification.public.push(repo),
        }
    }

    classification
}

/// Optional field filters applied to an already-loaded list
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Exact, case-insensitive language match
    pub language: Option<String>,

    /// Inclusive minimum star count
    pub min_stars: Option<u64>,

    /// Inclusive minimum update date, as typed by the user (`YYYY-MM-DD`)
    pub updated_since: Option<String>,
}

/// Result of a filter pass plus notices for inputs that were ignored
#[derive(Debug, Clone, Default)]
pub struct Filtered {
    pub repos: Vec<RemoteRepository>,
    pub notices: Vec<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.min_stars.is_none() && self.updated_since.is_none()
    }

    /// Keep the repositories matching every active criterion, preserving order.
    ///
    /// An unparseable date disables only the date criterion.
    pub fn apply(&self, repos: &[RemoteRepository]) -> Filtered {
        let mut notices = Vec::new();

        let since = self.updated_since.as_deref().and_then(|input| {
            let parsed = parse_date(input);
            if parsed.is_none() {
                warn!("Ignoring invalid date filter: {}", input);
                notices.push(format!(
                    "Invalid date format '{input}' (expected YYYY-MM-DD), date filter not applied"
                ));
            }
            parsed
        });

        let repos = repos
            .iter()
            .filter(|repo| {
                self.language
                    .as_deref()
                    .map_or(true, |lang| language_matches(repo, lang))
            })
            .filter(|repo| self.min_stars.map_or(true, |min| repo.star_count >= min))
            .filter(|repo| since.map_or(true, |date| repo.updated_at.date_naive() >= date))
            .cloned()
            .collect();

        Filtered { repos, notices }
    }
}

/// Exact language match ignoring case; repositories with no language never match
pub fn language_matches(repo: &RemoteRepository, language: &str) -> bool {
    repo.language
        .as_deref()
        .is_some_and(|l| l.eq_ignore_ascii_case(language.trim()))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Languages present in `repos` with their counts, most common first
pub fn language_counts(repos: &[RemoteRepository]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for repo in repos {
        let language = repo.language.as_deref().unwrap_or("Unknown");
        *counts.entry(language).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(language, count)| (language.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn repo(full_name: &str, private: bool, fork: bool) -> RemoteRepository {
        RemoteRepository {
            full_name: full_name.to_string(),
            is_private: private,
            is_fork: fork,
            star_count: 0,
            fork_count: 0,
            language: None,
            topics: Vec::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap(),
            description: None,
            html_url: format!("https://github.com/{full_name}"),
        }
    }

    fn sample() -> Vec<RemoteRepository> {
        let mut a = repo("me/a", false, false);
        a.language = Some("Rust".to_string());
        a.star_count = 10;

        let mut b = repo("me/b", false, false);
        b.language = Some("Python".to_string());
        b.star_count = 2;
        b.updated_at = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

        let mut c = repo("me/c", false, false);
        c.language = Some("rust".to_string());
        c.star_count = 5;

        vec![a, b, c, repo("me/d", false, false)]
    }

    #[test]
    fn test_classify_is_a_partition() {
        let records = vec![
            repo("me/a", false, false),
            repo("me/b", true, false),
            repo("me/c", false, true),
            repo("me/d", true, true),
            repo("me/e", false, false),
        ];
        let classification = classify(records.clone());

        assert_eq!(classification.total(), records.len());
        for record in &records {
            let hits = Category::ALL
                .iter()
                .filter(|c| classification.get(**c).contains(record))
                .count();
            assert_eq!(hits, 1, "{} must be in exactly one category", record.full_name);
        }
    }

    #[test]
    fn test_classify_fork_before_visibility() {
        let classification = classify(vec![repo("me/both", true, true)]);
        assert_eq!(classification.forks.len(), 1);
        assert!(classification.private.is_empty());
        assert!(classification.public.is_empty());
    }

    #[test]
    fn test_classify_preserves_order() {
        let classification = classify(vec![
            repo("me/a", false, false),
            repo("me/x", true, false),
            repo("me/b", false, false),
            repo("me/c", false, false),
        ]);
        let names: Vec<_> = classification.public.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["me/a", "me/b", "me/c"]);
    }

    #[test]
    fn test_filter_language_case_insensitive() {
        let criteria = FilterCriteria {
            language: Some("RUST".to_string()),
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        let names: Vec<_> = filtered.repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["me/a", "me/c"]);
        assert!(filtered.notices.is_empty());
    }

    #[test]
    fn test_filter_min_stars_inclusive() {
        let criteria = FilterCriteria {
            min_stars: Some(5),
            ..Default::default()
        };
        let names: Vec<_> = criteria
            .apply(&sample())
            .repos
            .into_iter()
            .map(|r| r.full_name)
            .collect();
        assert_eq!(names, vec!["me/a", "me/c"]);
    }

    #[test]
    fn test_filter_date_inclusive_by_day() {
        let criteria = FilterCriteria {
            updated_since: Some("2024-01-15".to_string()),
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        assert_eq!(filtered.repos.len(), 3);
        assert!(filtered.repos.iter().all(|r| r.full_name != "me/b"));
    }

    #[test]
    fn test_filter_invalid_date_degrades() {
        let criteria = FilterCriteria {
            updated_since: Some("15/01/2024".to_string()),
            min_stars: Some(5),
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        assert_eq!(filtered.repos.len(), 2);
        assert_eq!(filtered.notices.len(), 1);
        assert!(filtered.notices[0].contains("15/01/2024"));
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(criteria.apply(&sample()).repos.len(), 4);
    }

    #[test]
    fn test_language_counts() {
        let counts = language_counts(&sample());
        assert_eq!(
            counts,
            vec![
                ("Python".to_string(), 1),
                ("Rust".to_string(), 1),
                ("Unknown".to_string(), 1),
                ("rust".to_string(), 1),
            ]
        );
    }
}
