use std::path::Path;
use std::time::Duration;

use seo_audit::LinkCheckConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PROBE_USER_AGENT: &str = "Mozilla/5.0 (compatible; SEOAuditTool/1.0)";
pub const DEFAULT_PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    pub max_links_to_check: usize,
    pub probe_concurrency: usize,
    pub probe_timeout_secs: u64,
    pub probe_user_agent: String,
    pub page_timeout_secs: u64,
    pub page_user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_links_to_check: 20,
            probe_concurrency: 10,
            probe_timeout_secs: 5,
            probe_user_agent: DEFAULT_PROBE_USER_AGENT.to_string(),
            page_timeout_secs: 60,
            page_user_agent: DEFAULT_PAGE_USER_AGENT.to_string(),
        }
    }
}

impl AuditConfig {
    /// Reads a JSON config; keys left out keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "probe_concurrency must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 || self.page_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn link_check(&self) -> LinkCheckConfig {
        LinkCheckConfig {
            max_links_to_check: self.max_links_to_check,
            concurrency: self.probe_concurrency,
            probe_timeout: self.probe_timeout(),
        }
    }
}
