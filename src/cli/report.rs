//! Plain-text rendering of fetched lists and batch results.

use crate::batch::{BatchOutcome, ItemOutcome, Operation};
use crate::export::truncate;
use crate::github::QuotaState;
use crate::repository::{Category, Classification, RemoteRepository};

pub fn print_classification(classification: &Classification) {
    if classification.is_empty() {
        println!("No repositories found");
        return;
    }

    println!("\nTotal repositories: {}", classification.total());
    println!(
        "Public: {} | Private: {} | Forks: {}",
        classification.public.len(),
        classification.private.len(),
        classification.forks.len()
    );

    for category in Category::ALL {
        let repos = classification.get(category);
        if repos.is_empty() {
            continue;
        }
        println!("\n=== {} REPOSITORIES ===", category.to_string().to_uppercase());
        print_repo_list(repos, category);
    }
}

/// Numbered list; the numbers are the ones a selection refers to
pub fn print_repo_list(repos: &[RemoteRepository], category: Category) {
    let label = category.to_string().to_uppercase();
    for (i, repo) in repos.iter().enumerate() {
        println!(
            "{:>3}. {:<40} [{}] ★ {:<5} forks {}",
            i + 1,
            truncate(repo.name(), 40),
            label,
            repo.star_count,
            repo.fork_count
        );
    }
}

pub fn print_starred_table(repos: &[RemoteRepository], details: bool) {
    if repos.is_empty() {
        println!("\nNo starred repositories found");
        return;
    }

    println!();
    print!(
        "{:>4} {:<45} {:>7} {:>6} {:<14} {:<10}",
        "#", "Repository", "Stars", "Forks", "Language", "Updated"
    );
    if details {
        print!(" {:<50} Topics", "Description");
    }
    println!();
    println!("{}", "-".repeat(if details { 150 } else { 90 }));

    for (i, repo) in repos.iter().enumerate() {
        print!(
            "{:>4} {:<45} {:>7} {:>6} {:<14} {:<10}",
            i + 1,
            truncate(&repo.full_name, 45),
            repo.star_count,
            repo.fork_count,
            truncate(repo.language.as_deref().unwrap_or("N/A"), 14),
            repo.updated_at.format("%Y-%m-%d").to_string()
        );
        if details {
            let description = repo
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("No description");
            print!(" {:<50} {}", truncate(description, 50), topic_summary(&repo.topics));
        }
        println!();
    }

    println!("\nTotal: {} repositories", repos.len());
}

/// First three topics, then a count of the rest
pub fn topic_summary(topics: &[String]) -> String {
    if topics.is_empty() {
        return "N/A".to_string();
    }

    let mut summary = topics
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if topics.len() > 3 {
        summary.push_str(&format!(" +{} more", topics.len() - 3));
    }
    summary
}

pub fn print_languages(counts: &[(String, usize)]) {
    println!("\nAvailable languages:");
    for (i, (language, count)) in counts.iter().enumerate() {
        println!("{:>3}. {} ({} repos)", i + 1, language, count);
    }
}

pub fn print_item(position: usize, total: usize, operation: Operation, item: &ItemOutcome) {
    let mark = if item.succeeded { "✓" } else { "✗" };
    match &item.detail {
        Some(detail) => println!(
            "  [{position}/{total}] {operation} {} ... {mark} ({detail})",
            item.full_name
        ),
        None => println!(
            "  [{position}/{total}] {operation} {} ... {mark}",
            item.full_name
        ),
    }
}

pub fn print_outcome(outcome: &BatchOutcome, operation: Operation) {
    println!(
        "\nOperation '{}' completed: {} successful, {} failed",
        operation, outcome.success_count, outcome.failure_count
    );

    for item in outcome.failed() {
        println!(
            "  ✗ {}: {}",
            item.full_name,
            item.detail.as_deref().unwrap_or("unknown error")
        );
    }

    if outcome.interrupted {
        println!("Interrupted: remaining repositories were not processed");
    }
}

pub fn print_quota(quota: &QuotaState) {
    println!("\nGitHub API rate limit");
    println!("  Remaining: {}/{}", quota.remaining, quota.limit);
    println!(
        "  Resets at: {}",
        quota.reset_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn print_notices(notices: &[String]) {
    for notice in notices {
        println!("Note: {notice}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_summary() {
        let topics: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(topic_summary(&topics), "a, b, c +2 more");
        assert_eq!(topic_summary(&topics[..2]), "a, b");
        assert_eq!(topic_summary(&[]), "N/A");
    }
}
