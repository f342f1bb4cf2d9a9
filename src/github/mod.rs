pub mod client;
pub mod config;
pub mod models;
pub mod paginator;
pub mod parser;
pub mod rate_guard;

pub use client::GitHubClient;
pub use config::GitHubConfig;
pub use paginator::{FetchFilter, Paginator, RepoListing};
pub use parser::parse_full_name;
pub use rate_guard::{QuotaState, RateGuard};
