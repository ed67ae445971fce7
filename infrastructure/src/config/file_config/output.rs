//! `[output]` section: how replies are printed

use serde::{Deserialize, Serialize};
use switchboard_domain::OutputFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `text` or `json`; unset means text
    pub format: Option<OutputFormat>,
    /// Colored text output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    pub fn resolved_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Progress output would interleave with machine-readable stdout,
    /// so it is limited to the text format.
    pub fn allows_progress(&self) -> bool {
        self.resolved_format() == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_disables_progress() {
        let config: super::super::FileConfig = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.resolved_format(), OutputFormat::Json);
        assert!(!config.output.allows_progress());
        assert!(config.output.color);
    }

    #[test]
    fn test_unset_format_is_text() {
        let config = FileOutputConfig::default();
        assert_eq!(config.resolved_format(), OutputFormat::Text);
        assert!(config.allows_progress());
    }
}
