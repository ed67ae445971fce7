//! `[repl]` section for chat mode

use super::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Spinner while a question is in flight
    pub show_progress: bool,
    /// Line-editor history; the per-user data dir when unset
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl FileReplConfig {
    /// `--quiet` overrides the file setting
    pub fn progress_enabled(&self, quiet: bool) -> bool {
        self.show_progress && !quiet
    }

    pub fn history_file_path(&self) -> Option<PathBuf> {
        self.history_file.as_deref().and_then(expand_home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_show_progress() {
        let config = FileReplConfig::default();
        assert!(config.progress_enabled(false));
        assert!(!config.progress_enabled(true));
    }

    #[test]
    fn test_history_file_expands_home() {
        let config = FileReplConfig {
            history_file: Some("~/chat/history.txt".to_string()),
            ..FileReplConfig::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.history_file_path(),
                Some(home.join("chat/history.txt"))
            );
        }
        assert!(FileReplConfig::default().history_file_path().is_none());
    }
}
