use crate::error::{Error, Result};
use crate::github::GitHubConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GitHubConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Durable diagnostic log, kept apart from the interactive output
    pub log_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let log_file = match std::env::var("REPOKEEPER_LOG_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_log_file()?,
        };

        let directory = std::env::var("EXPORT_DIR")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        Ok(Settings {
            github: GitHubConfig::from_env(),
            logging: LoggingConfig { log_file },
            export: ExportConfig { directory },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let github = &self.github;

        url::Url::parse(github.api_base_url())
            .map_err(|e| Error::Config(format!("Invalid GITHUB_API_URL: {e}")))?;

        if github.page_size == 0 || github.page_size > 100 {
            return Err(Error::Config(
                "GITHUB_PAGE_SIZE must be between 1 and 100".to_string(),
            ));
        }

        if github.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if github.quota_margin_secs < 0 {
            return Err(Error::Config(
                "GITHUB_QUOTA_MARGIN must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that both halves of the credential pair are present
    pub fn require_credentials(&self) -> Result<(String, String)> {
        match (&self.github.username, &self.github.token) {
            (Some(username), Some(token)) => Ok((username.clone(), token.clone())),
            (None, _) => Err(Error::Config(
                "No GitHub username configured (set GITHUB_USERNAME or pass --username)"
                    .to_string(),
            )),
            (_, None) => Err(Error::Config(
                "No GitHub token configured (set GITHUB_TOKEN or pass --token)".to_string(),
            )),
        }
    }
}

fn default_log_file() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("github_manager.log"))
        .ok_or_else(|| Error::Config("Could not determine home directory for log file".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            github: GitHubConfig::default(),
            logging: LoggingConfig {
                log_file: "/tmp/repokeeper.log".into(),
            },
            export: ExportConfig {
                directory: ".".into(),
            },
        }
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = settings();
        assert!(settings.validate().is_ok());

        settings.github.page_size = 0;
        assert!(settings.validate().is_err());

        settings.github.page_size = 101;
        assert!(settings.validate().is_err());

        settings.github.page_size = 50;
        settings.github.api_base_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_require_credentials() {
        let mut settings = settings();
        assert!(matches!(
            settings.require_credentials(),
            Err(Error::Config(msg)) if msg.contains("username")
        ));

        settings.github.username = Some("octocat".to_string());
        assert!(matches!(
            settings.require_credentials(),
            Err(Error::Config(msg)) if msg.contains("token")
        ));

        settings.github.token = Some("secret".to_string());
        let (user, token) = settings.require_credentials().unwrap();
        assert_eq!(user, "octocat");
        assert_eq!(token, "secret");
    }
}
