//! Configuration for the jobboard client
//!
//! Configuration is read from, in order of precedence:
//! - Environment variables (`JOBBOARD_API_URL`, `JOBBOARD_CHAT_URL`,
//!   `JOBBOARD_SESSION`, `JOBBOARD_LOG`), including a `.env` file
//! - The file passed with `--config`
//! - `jobboard.toml` in the current directory
//! - Built-in defaults

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "jobboard.toml";

/// Root configuration loaded from jobboard.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobBoardConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

// ============= API Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the job-board server, without the `/api` prefix
    pub base_url: String,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: None,
        }
    }
}

// ============= Session Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File holding the access token, refresh token and role
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".jobboard/session.json"),
        }
    }
}

// ============= Chat Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the HR chat bot service
    pub base_url: String,

    /// `user_id` sent with every prompt
    pub user_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            user_id: "new".to_string(),
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,

    /// Emit JSON lines instead of human-readable logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl JobBoardConfig {
    /// Load configuration from file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file only
    pub fn load_file(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)
                    .map_err(|e| AppError::Config(format!("{} ({})", e, path.display())))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse TOML: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `JOBBOARD_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("JOBBOARD_API_URL") {
            self.api.base_url = url;
        }
        if let Some(url) = lookup("JOBBOARD_CHAT_URL") {
            self.chat.base_url = url;
        }
        if let Some(path) = lookup("JOBBOARD_SESSION") {
            self.session.path = PathBuf::from(path);
        }
        if let Some(level) = lookup("JOBBOARD_LOG") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("api.base_url", &self.api.base_url), ("chat.base_url", &self.chat.base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!(
                    "{} must start with http:// or https://, got '{}'",
                    name, url
                )));
            }
        }
        if self.api.timeout_secs == Some(0) {
            return Err(AppError::Config("api.timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}
