use crate::batch::{BatchMutator, Operation};
use crate::cli::{report, FilterArgs, StarFilterArgs, TargetArgs, Visibility};
use crate::config::Settings;
use crate::export::{export_repositories, ExportFormat};
use crate::github::{
    models::User,
    paginator::{AFFILIATION_ALL, AFFILIATION_OWNER},
    FetchFilter, GitHubClient, Paginator, RepoListing,
};
use crate::repository::{classify, language_counts, Category, FilterCriteria, RemoteRepository};
use crate::selection::parse_selection;
use crate::shutdown::Shutdown;
use crate::Result;
use std::collections::HashSet;
use std::io::Write;
use std::process::ExitCode;
use tracing::info;

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// Interrupted before any change reached GitHub
    Cancelled,
    /// Interrupted after at least one change reached GitHub
    InterruptedAfterChanges,
}

impl Completion {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Completion::Done | Completion::Cancelled => ExitCode::SUCCESS,
            Completion::InterruptedAfterChanges => ExitCode::FAILURE,
        }
    }
}

/// Authenticated connection shared by every command of one run
pub struct Session {
    client: GitHubClient,
    user: User,
    settings: Settings,
    shutdown: Shutdown,
}

impl Session {
    /// Build the client and check that the token belongs to the configured user
    pub async fn connect(settings: Settings, shutdown: Shutdown) -> Result<Self> {
        let (username, _) = settings.require_credentials()?;
        let client = GitHubClient::new(settings.github.clone())?;
        let user = client.validate_identity(&username).await?;
        println!("✓ Authenticated as {}", user.login);

        Ok(Self {
            client,
            user,
            settings,
            shutdown,
        })
    }

    fn paginator(&self) -> Paginator {
        Paginator::new(self.client.clone(), self.shutdown.clone())
    }

    fn mutator(&self) -> BatchMutator {
        BatchMutator::new(self.client.clone(), self.shutdown.clone())
    }

    async fn fetch(&self, listing: &RepoListing, filter: &FetchFilter) -> Result<Vec<RemoteRepository>> {
        println!("Fetching repositories...");
        self.paginator().fetch_all(listing, filter).await
    }

    fn export(&self, repos: &[RemoteRepository], format: ExportFormat, label: &str, title: &str) -> Result<()> {
        let path = export_repositories(repos, format, &self.settings.export.directory, label, title)?;
        println!("\n✓ Exported {} repositories to {}", repos.len(), path.display());
        Ok(())
    }
}

/// List owned repositories by category
pub async fn list(
    session: &Session,
    filters: &FilterArgs,
    export: Option<ExportFormat>,
) -> Result<Completion> {
    println!(
        "User: {} | Repos: {} (Public: {} | Private: {})",
        session.user.login,
        session.user.public_repos + session.user.total_private_repos,
        session.user.public_repos,
        session.user.total_private_repos
    );

    let repos = session
        .fetch(&RepoListing::owned(AFFILIATION_ALL), &FetchFilter::default())
        .await?;
    let filtered = FilterCriteria::from(filters).apply(&repos);
    report::print_notices(&filtered.notices);

    let classification = classify(filtered.repos);
    report::print_classification(&classification);

    if let Some(format) = export {
        let all: Vec<RemoteRepository> = Category::ALL
            .iter()
            .flat_map(|c| classification.get(*c).iter().cloned())
            .collect();
        session.export(&all, format, "repos", "GitHub Repositories")?;
    }

    Ok(Completion::Done)
}

/// Delete forks owned by the user
pub async fn forks(session: &Session, target: &TargetArgs) -> Result<Completion> {
    let repos = session
        .fetch(&RepoListing::owned(AFFILIATION_OWNER), &FetchFilter::default())
        .await?;
    let forks = classify(repos).forks;

    if forks.is_empty() {
        println!("You have no forks.");
        return Ok(Completion::Done);
    }

    println!("\nForks found: {}", forks.len());
    report::print_repo_list(&forks, Category::Fork);

    let selected = choose(&forks, target, &session.shutdown).await?;
    if selected.is_empty() {
        return Ok(Completion::Done);
    }

    let question = format!(
        "Delete {} fork(s)? This cannot be undone.",
        selected.len()
    );
    if !confirm(target, &question, Confirmation::Skippable, &session.shutdown).await? {
        println!("Cancelled.");
        return Ok(Completion::Cancelled);
    }

    run_batch(session, &selected, Operation::Delete).await
}

/// Switch public repositories to private or private ones to public
pub async fn visibility(
    session: &Session,
    to: Visibility,
    target: &TargetArgs,
) -> Result<Completion> {
    let repos = session
        .fetch(&RepoListing::owned(AFFILIATION_ALL), &FetchFilter::default())
        .await?;
    let classification = classify(repos);

    let (category, make_private) = match to {
        Visibility::Private => (Category::Public, true),
        Visibility::Public => (Category::Private, false),
    };
    let candidates = classification.get(category);

    if candidates.is_empty() {
        println!("No {category} repositories to modify.");
        return Ok(Completion::Done);
    }

    println!("\n=== {} REPOSITORIES ===", category.to_string().to_uppercase());
    report::print_repo_list(candidates, category);

    let selected = choose(candidates, target, &session.shutdown).await?;
    if selected.is_empty() {
        return Ok(Completion::Done);
    }

    let operation = Operation::SetVisibility { make_private };
    let question = format!("{} {} repositories?", capitalize(&operation.to_string()), selected.len());
    if !confirm(target, &question, Confirmation::Skippable, &session.shutdown).await? {
        println!("Cancelled.");
        return Ok(Completion::Cancelled);
    }

    if !make_private
        && !confirm(
            target,
            "WARNING: this makes the code visible to everyone. Confirm again",
            Confirmation::Explicit,
            &session.shutdown,
        )
        .await?
    {
        println!("Cancelled.");
        return Ok(Completion::Cancelled);
    }

    run_batch(session, &selected, operation).await
}

async fn fetch_starred(session: &Session, filters: &StarFilterArgs) -> Result<Vec<RemoteRepository>> {
    let fetch_filter = FetchFilter {
        language: filters.language.clone(),
        topic: filters.topic.clone(),
    };
    let starred = session
        .fetch(&RepoListing::starred(&session.user.login), &fetch_filter)
        .await?;
    println!("Total starred repositories: {}", starred.len());

    let criteria = FilterCriteria {
        language: None,
        min_stars: filters.min_stars,
        updated_since: filters.updated_since.clone(),
    };
    if criteria.is_empty() {
        return Ok(starred);
    }

    let filtered = criteria.apply(&starred);
    report::print_notices(&filtered.notices);
    println!("Filter applied: {} repositories match", filtered.repos.len());
    Ok(filtered.repos)
}

/// Show starred repositories
pub async fn stars_list(
    session: &Session,
    filters: &StarFilterArgs,
    details: bool,
    languages: bool,
    export: Option<ExportFormat>,
) -> Result<Completion> {
    let starred = fetch_starred(session, filters).await?;
    report::print_starred_table(&starred, details);

    if languages {
        report::print_languages(&language_counts(&starred));
    }

    if let Some(format) = export {
        if starred.is_empty() {
            println!("No repositories to export.");
        } else {
            session.export(&starred, format, "stars", "Starred GitHub Repositories")?;
        }
    }

    Ok(Completion::Done)
}

/// Remove stars from selected repositories
pub async fn stars_unstar(
    session: &Session,
    filters: &StarFilterArgs,
    target: &TargetArgs,
) -> Result<Completion> {
    let starred = fetch_starred(session, filters).await?;
    report::print_starred_table(&starred, false);
    if starred.is_empty() {
        return Ok(Completion::Done);
    }

    let selected = choose(&starred, target, &session.shutdown).await?;
    if selected.is_empty() {
        return Ok(Completion::Done);
    }

    let question = format!("Remove the star from {} repositories?", selected.len());
    if !confirm(target, &question, Confirmation::Skippable, &session.shutdown).await? {
        println!("Cancelled.");
        return Ok(Completion::Cancelled);
    }

    let mutator = session.mutator();
    println!("\nRemoving stars from {} repositories:", selected.len());
    let outcome = mutator
        .apply_with_progress(&selected, Operation::Unstar, |position, total, item| {
            report::print_item(position, total, Operation::Unstar, item)
        })
        .await;
    report::print_outcome(&outcome, Operation::Unstar);

    let removed: HashSet<&str> = outcome.succeeded().collect();
    let remaining = starred
        .iter()
        .filter(|repo| !removed.contains(repo.full_name.as_str()))
        .count();
    println!("{remaining} starred repositories remain in the list");

    Ok(batch_completion(outcome.interrupted, outcome.any_sent()))
}

/// Show the current API quota
pub async fn limits(session: &Session) -> Result<Completion> {
    let quota = session.client.rate_limit().await?;
    report::print_quota(&quota);
    Ok(Completion::Done)
}

async fn run_batch(
    session: &Session,
    selected: &[&RemoteRepository],
    operation: Operation,
) -> Result<Completion> {
    println!("\n{}: {} repositories", capitalize(&operation.to_string()), selected.len());
    let outcome = session
        .mutator()
        .apply_with_progress(selected, operation, |position, total, item| {
            report::print_item(position, total, operation, item)
        })
        .await;
    report::print_outcome(&outcome, operation);
    info!(
        "{} finished: {} ok, {} failed",
        operation, outcome.success_count, outcome.failure_count
    );

    Ok(batch_completion(outcome.interrupted, outcome.any_sent()))
}

fn batch_completion(interrupted: bool, any_sent: bool) -> Completion {
    match (interrupted, any_sent) {
        (false, _) => Completion::Done,
        (true, false) => Completion::Cancelled,
        (true, true) => Completion::InterruptedAfterChanges,
    }
}

/// Resolve the target arguments to items of the displayed list
async fn choose<'a>(
    repos: &'a [RemoteRepository],
    target: &TargetArgs,
    shutdown: &Shutdown,
) -> Result<Vec<&'a RemoteRepository>> {
    if target.all {
        return Ok(repos.iter().collect());
    }

    let text = match &target.select {
        Some(text) => text.clone(),
        None => prompt("\nSelect numbers (e.g. 1 3 5-7): ", shutdown).await?,
    };

    let selection = parse_selection(&text, repos.len());
    report::print_notices(&selection.notices());
    if selection.is_empty() {
        println!("No repositories selected.");
    }

    Ok(selection.pick(repos))
}

/// Whether a confirmation may be skipped or must be typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    /// Answered by `--yes`
    Skippable,
    /// Always asked, even with `--yes`
    Explicit,
}

fn answered_by_flag(target: &TargetArgs, kind: Confirmation) -> bool {
    target.yes && kind == Confirmation::Skippable
}

async fn confirm(
    target: &TargetArgs,
    question: &str,
    kind: Confirmation,
    shutdown: &Shutdown,
) -> Result<bool> {
    if answered_by_flag(target, kind) {
        return Ok(true);
    }

    let answer = prompt(&format!("{question} (y/n): "), shutdown).await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Read one line from stdin, giving up when shutdown is requested
async fn prompt(message: &str, shutdown: &Shutdown) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;

    let line = shutdown
        .run_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await??;
    Ok(line.trim().to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_completion() {
        assert_eq!(batch_completion(false, true), Completion::Done);
        assert_eq!(batch_completion(true, false), Completion::Cancelled);
        assert_eq!(
            batch_completion(true, true),
            Completion::InterruptedAfterChanges
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("make private"), "Make private");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_choose_all_ignores_selection() {
        let target = TargetArgs {
            select: None,
            all: true,
            yes: false,
        };
        let repos: Vec<RemoteRepository> = Vec::new();
        let chosen = choose(&repos, &target, &Shutdown::new()).await.unwrap();
        assert!(chosen.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_skipped_with_yes() {
        let target = TargetArgs {
            select: None,
            all: false,
            yes: true,
        };
        assert!(confirm(&target, "Sure?", Confirmation::Skippable, &Shutdown::new())
            .await
            .unwrap());
    }

    #[test]
    fn test_going_public_needs_typed_answer() {
        let target = TargetArgs {
            select: None,
            all: true,
            yes: true,
        };
        assert!(answered_by_flag(&target, Confirmation::Skippable));
        assert!(!answered_by_flag(&target, Confirmation::Explicit));

        let interactive = TargetArgs::default();
        assert!(!answered_by_flag(&interactive, Confirmation::Skippable));
    }
}
