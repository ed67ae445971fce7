//! Logging configuration from TOML (`[logging]` section)

use super::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every dispatch; disabled when unset
    pub conversation_log: Option<String>,
}

impl FileLoggingConfig {
    /// Transcript path with a leading `~/` expanded to the home directory
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().and_then(expand_home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_means_disabled() {
        assert!(FileLoggingConfig::default().conversation_log_path().is_none());
        let blank = FileLoggingConfig {
            conversation_log: Some("  ".to_string()),
        };
        assert!(blank.conversation_log_path().is_none());
    }

    #[test]
    fn test_plain_path_is_kept() {
        let config = FileLoggingConfig {
            conversation_log: Some("logs/chat.jsonl".to_string()),
        };
        assert_eq!(
            config.conversation_log_path(),
            Some(PathBuf::from("logs/chat.jsonl"))
        );
    }
}
