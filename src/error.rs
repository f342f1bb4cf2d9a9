use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors that end the process instead of being reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::Config(_))
    }

    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // reqwest errors carry the full request URL
            Error::Http(e) => {
                if e.is_timeout() {
                    "GitHub request timed out".to_string()
                } else if e.is_connect() {
                    "Could not connect to GitHub".to_string()
                } else {
                    "GitHub request failed".to_string()
                }
            }

            Error::Internal(msg) | Error::Config(msg) | Error::Authentication(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("bearer") || lower.contains("ghp_") || lower.contains("secret") {
                    "Error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Api { .. }
            | Error::Json(_)
            | Error::Io(_)
            | Error::Validation(_)
            | Error::Interrupted => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_and_config_are_fatal() {
        assert!(Error::Authentication("bad token".to_string()).is_fatal());
        assert!(Error::Config("missing".to_string()).is_fatal());
        assert!(!Error::Interrupted.is_fatal());
        assert!(!Error::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_log_safe_redacts_tokens() {
        let err = Error::Internal("Invalid header value Bearer ghp_abc".to_string());
        assert_eq!(err.log_safe(), "Error (details redacted)");

        let err = Error::Validation("bad selection".to_string());
        assert_eq!(err.log_safe(), "Validation error: bad selection");
    }
}
