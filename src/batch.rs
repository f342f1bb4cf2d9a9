use crate::github::GitHubClient;
use crate::repository::RemoteRepository;
use crate::shutdown::Shutdown;
use reqwest::StatusCode;
use std::fmt;
use tracing::{error, info, warn};

/// A single state-changing operation applied to every item of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    SetVisibility { make_private: bool },
    Unstar,
}

impl Operation {
    /// Whether `status` means the operation took effect
    pub fn is_success(&self, status: StatusCode) -> bool {
        match self {
            Operation::Delete => status == StatusCode::NO_CONTENT,
            Operation::SetVisibility { .. } => status == StatusCode::OK,
            Operation::Unstar => status == StatusCode::NO_CONTENT || status == StatusCode::OK,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete => write!(f, "delete"),
            Operation::SetVisibility { make_private: true } => write!(f, "make private"),
            Operation::SetVisibility { make_private: false } => write!(f, "make public"),
            Operation::Unstar => write!(f, "unstar"),
        }
    }
}

/// Terminal state of one batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub full_name: String,
    pub succeeded: bool,
    /// Upstream status or error detail for failures
    pub detail: Option<String>,
}

/// Per-item ledger of one bulk mutation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub items: Vec<ItemOutcome>,
    /// Set when a shutdown request stopped the batch before the last item
    pub interrupted: bool,
}

impl BatchOutcome {
    fn record(&mut self, item: ItemOutcome) {
        if item.succeeded {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.items.push(item);
    }

    /// Full names of the items that succeeded
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| item.succeeded)
            .map(|item| item.full_name.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|item| !item.succeeded)
    }

    /// Whether any request of the batch was actually sent
    pub fn any_sent(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Applies one operation to each repository in order, never aborting on failure
pub struct BatchMutator {
    client: GitHubClient,
    shutdown: Shutdown,
}

impl BatchMutator {
    pub fn new(client: GitHubClient, shutdown: Shutdown) -> Self {
        Self { client, shutdown }
    }

    pub async fn apply_to_all(
        &self,
        items: &[&RemoteRepository],
        operation: Operation,
    ) -> BatchOutcome {
        self.apply_with_progress(items, operation, |_, _, _| {}).await
    }

    /// Like [`apply_to_all`](Self::apply_to_all), reporting each finished item
    /// as `(position, total, outcome)` with a 1-based position.
    pub async fn apply_with_progress<F>(
        &self,
        items: &[&RemoteRepository],
        operation: Operation,
        mut on_item: F,
    ) -> BatchOutcome
    where
        F: FnMut(usize, usize, &ItemOutcome),
    {
        let total = items.len();
        let pause = self.client.config().mutation_pause();
        let mut outcome = BatchOutcome::default();

        info!("Starting batch '{}' over {} repositories", operation, total);

        for (i, repo) in items.iter().enumerate() {
            if self.shutdown.is_requested() {
                warn!(
                    "Batch '{}' interrupted after {} of {} repositories",
                    operation, i, total
                );
                outcome.interrupted = true;
                break;
            }

            let item = self.apply_one(repo, operation).await;
            on_item(i + 1, total, &item);
            outcome.record(item);

            if i + 1 < total && !self.shutdown.sleep(pause).await {
                warn!(
                    "Batch '{}' interrupted after {} of {} repositories",
                    operation,
                    i + 1,
                    total
                );
                outcome.interrupted = true;
                break;
            }
        }

        info!(
            "Batch '{}' complete: {} successful, {} failed",
            operation, outcome.success_count, outcome.failure_count
        );
        outcome
    }

    async fn apply_one(&self, repo: &RemoteRepository, operation: Operation) -> ItemOutcome {
        let full_name = repo.full_name.as_str();

        let response = match operation {
            Operation::Delete => self.client.delete_repository(full_name).await,
            Operation::SetVisibility { make_private } => {
                self.client.set_visibility(full_name, make_private).await
            }
            Operation::Unstar => self.client.unstar(full_name).await,
        };

        let (succeeded, detail) = match response {
            Ok(response) if operation.is_success(response.status()) => (true, None),
            Ok(response) => {
                let status = response.status();
                let message = GitHubClient::error_detail(response).await;
                (false, Some(format!("HTTP {}: {}", status.as_u16(), message)))
            }
            Err(e) => (false, Some(e.log_safe())),
        };

        match &detail {
            None => info!("{}: {} succeeded", full_name, operation),
            Some(detail) => error!("{}: {} failed: {}", full_name, operation, detail),
        }

        ItemOutcome {
            full_name: full_name.to_string(),
            succeeded,
            detail,
        }
    }
}
