//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backend;
mod dispatch;
mod logging;
mod output;
mod repl;

pub use backend::{FileBackendConfig, FileRetryConfig};
pub use dispatch::FileDispatchConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;

use crate::backend::transport::HttpTransportConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A configured path with a leading `~/` expanded; blank means unset
pub(crate) fn expand_home(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(raw)),
    }
}

/// Problems detected in a loaded configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("backend.base_url '{url}' is not a valid http(s) URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("backend.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("retry.max_attempts cannot be 0")]
    InvalidMaxAttempts,

    #[error("dispatch.default_target: unknown target '{0}' (expected all, llama3, mixtral or tinyllama)")]
    UnknownTarget(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend location and timeout
    pub backend: FileBackendConfig,
    /// Retry and backoff settings
    pub retry: FileRetryConfig,
    /// Routing defaults
    pub dispatch: FileDispatchConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        match Url::parse(self.backend.base_url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => issues.push(ConfigValidationError::InvalidBaseUrl {
                url: self.backend.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => issues.push(ConfigValidationError::InvalidBaseUrl {
                url: self.backend.base_url.clone(),
                reason: e.to_string(),
            }),
        }

        if self.backend.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }

        if self.retry.max_attempts == 0 {
            issues.push(ConfigValidationError::InvalidMaxAttempts);
        }

        if self.dispatch.parse_target().is_err() {
            issues.push(ConfigValidationError::UnknownTarget(
                self.dispatch.default_target.clone(),
            ));
        }

        issues
    }

    /// Transport settings derived from `[backend]` and `[retry]`
    pub fn transport_config(&self) -> HttpTransportConfig {
        let timeout = match self.backend.timeout_seconds {
            0 => None,
            _ => Some(self.backend.timeout()),
        };
        HttpTransportConfig::new(self.backend.base_url.trim())
            .with_timeout(timeout)
            .with_retry(self.retry.to_policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use switchboard_application::AggregateStrategy;
    use switchboard_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
base_url = "http://models.internal:8080"
timeout_seconds = 30

[retry]
max_attempts = 4
base_delay_ms = 500
max_jitter_ms = 100

[dispatch]
default_target = "llama3"
aggregate = "fan_out"

[output]
format = "json"
color = false

[repl]
show_progress = false
history_file = "~/.local/share/llm-switchboard/history.txt"

[logging]
conversation_log = "switchboard.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://models.internal:8080");
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.dispatch.aggregate, AggregateStrategy::FanOut);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(!config.repl.show_progress);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("switchboard.jsonl")
        );
        assert!(config.validate().is_empty());

        let transport = config.transport_config();
        assert_eq!(transport.timeout, Some(Duration::from_secs(30)));
        assert_eq!(transport.retry.max_attempts, 4);
        assert_eq!(transport.retry.max_jitter, Duration::from_millis(100));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[backend]
base_url = "http://localhost:9000"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:9000");
        // Defaults should apply
        assert_eq!(config.backend.timeout_seconds, 120);
        assert_eq!(config.retry, FileRetryConfig::default());
        assert!(config.output.color);
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[backend]
base_url = "localhost"
timeout_seconds = 0

[retry]
max_attempts = 0

[dispatch]
default_target = "gpt4"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert_eq!(issues.len(), 4);
        assert!(matches!(issues[0], ConfigValidationError::InvalidBaseUrl { .. }));
        assert_eq!(issues[1], ConfigValidationError::InvalidTimeout);
        assert_eq!(issues[2], ConfigValidationError::InvalidMaxAttempts);
        assert_eq!(issues[3], ConfigValidationError::UnknownTarget("gpt4".into()));
    }

    #[test]
    fn test_zero_timeout_disables_client_timeout() {
        let mut config = FileConfig::default();
        config.backend.timeout_seconds = 0;
        assert!(config.transport_config().timeout.is_none());
    }
}
