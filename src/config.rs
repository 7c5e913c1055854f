use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required Jira setting: {0}")]
    Missing(&'static str),
}

/// Top-level configuration loaded from .release-board.toml. Every field is
/// optional in the file; the environment can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraSettings {
    /// Jira site base URL (e.g., https://company.atlassian.net).
    pub base_url: Option<String>,
    /// Account email for basic auth.
    pub email: Option<String>,
    /// API token paired with the email.
    pub api_token: Option<String>,
}

/// Validated credentials; all three fields are required before the server
/// will start.
#[derive(Debug, Clone)]
pub struct JiraCredentials {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl Config {
    /// Load configuration from .release-board.toml in the current
    /// directory, falling back to defaults when the file is absent, then
    /// overlay JIRA_BASE_URL / JIRA_EMAIL / JIRA_API_TOKEN from the
    /// environment.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".release-board.toml");
        let config = if path.exists() {
            Self::read_file(path)?
        } else {
            Config::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Load from a specific path (used with --config and in tests).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        Ok(Self::read_file(path)?.with_env_overrides())
    }

    fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn with_env_overrides(mut self) -> Config {
        if let Ok(value) = std::env::var("JIRA_BASE_URL") {
            self.jira.base_url = Some(value);
        }
        if let Ok(value) = std::env::var("JIRA_EMAIL") {
            self.jira.email = Some(value);
        }
        if let Ok(value) = std::env::var("JIRA_API_TOKEN") {
            self.jira.api_token = Some(value);
        }
        self
    }

    /// Resolve the full credential set, failing on the first missing field.
    pub fn jira_credentials(&self) -> Result<JiraCredentials, ConfigError> {
        Ok(JiraCredentials {
            base_url: self
                .jira
                .base_url
                .clone()
                .ok_or(ConfigError::Missing("jira.base_url (JIRA_BASE_URL)"))?,
            email: self
                .jira
                .email
                .clone()
                .ok_or(ConfigError::Missing("jira.email (JIRA_EMAIL)"))?,
            api_token: self
                .jira
                .api_token
                .clone()
                .ok_or(ConfigError::Missing("jira.api_token (JIRA_API_TOKEN)"))?,
        })
    }
}
