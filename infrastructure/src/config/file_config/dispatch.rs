//! Dispatch configuration from TOML (`[dispatch]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use switchboard_application::{AggregateStrategy, DispatchParams};
use switchboard_domain::{DomainError, TargetMode};

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// `all` or a backend id
    pub default_target: String,
    /// `remote` or `fan_out`
    pub aggregate: AggregateStrategy,
    /// Upper bound on one whole dispatch, retries included
    pub deadline_seconds: Option<u64>,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            default_target: TargetMode::All.to_string(),
            aggregate: AggregateStrategy::default(),
            deadline_seconds: None,
        }
    }
}

impl FileDispatchConfig {
    pub fn parse_target(&self) -> Result<TargetMode, DomainError> {
        self.default_target.parse()
    }

    pub fn to_params(&self) -> DispatchParams {
        let params = DispatchParams::default().with_aggregate(self.aggregate);
        match self.deadline_seconds {
            Some(secs) if secs > 0 => params.with_deadline(Duration::from_secs(secs)),
            _ => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_domain::Backend;

    #[test]
    fn test_default_targets_all_backends() {
        let config = FileDispatchConfig::default();
        assert_eq!(config.parse_target(), Ok(TargetMode::All));
        assert_eq!(config.to_params().aggregate, AggregateStrategy::Remote);
        assert!(config.to_params().deadline.is_none());
    }

    #[test]
    fn test_dispatch_section() {
        let toml_str = r#"
[dispatch]
default_target = "mixtral"
aggregate = "fan_out"
deadline_seconds = 30
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.dispatch.parse_target(),
            Ok(TargetMode::Single(Backend::Mixtral))
        );
        let params = config.dispatch.to_params();
        assert_eq!(params.aggregate, AggregateStrategy::FanOut);
        assert_eq!(params.deadline, Some(Duration::from_secs(30)));
    }
}
