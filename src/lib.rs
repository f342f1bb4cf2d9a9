pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod github;
pub mod repository;
pub mod selection;
pub mod shutdown;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
